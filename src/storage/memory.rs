/// In-memory implementation of the habit storage interface
///
/// Holds habits and completions in plain collections behind a mutex. Used
/// by tests and by callers that want the streak rules without a database.
/// A write scope snapshots the whole state and restores it on rollback.
///
/// The store is single-actor. Opening a second write scope fails instead of
/// waiting, and writes made from other threads while a scope is open are
/// discarded if that scope rolls back.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::domain::{CompletionRecord, Habit, Periodicity};
use crate::storage::{HabitStorage, StorageError};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    habits: BTreeMap<String, Habit>,
    completions: Vec<CompletionRecord>,
}

/// Non-durable storage backed by process memory
///
/// Single-actor: only one write scope may be open at a time, and a rollback
/// also undoes writes other threads made while the scope was open.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
    snapshot: Mutex<Option<MemoryState>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|_| StorageError::Connection("in-memory store lock poisoned".to_string()))
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_habit<F>(&self, title: &str, update: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Habit),
    {
        let mut state = lock(&self.state)?;
        match state.habits.get_mut(title) {
            Some(habit) => {
                update(habit);
                Ok(())
            }
            None => Err(StorageError::HabitNotFound {
                title: title.to_string(),
            }),
        }
    }
}

impl HabitStorage for MemoryStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut state = lock(&self.state)?;
        if state.habits.contains_key(&habit.title) {
            return Err(StorageError::DuplicateKey {
                title: habit.title.clone(),
            });
        }

        let stored = Habit::from_existing(
            habit.title.clone(),
            habit.description.clone(),
            habit.periodicity,
            habit.creation_date,
            0,
            0,
        );
        state.habits.insert(habit.title.clone(), stored);
        Ok(())
    }

    fn get_habit(&self, title: &str) -> Result<Option<Habit>, StorageError> {
        Ok(lock(&self.state)?.habits.get(title).cloned())
    }

    fn delete_habit(&self, title: &str) -> Result<(), StorageError> {
        let mut state = lock(&self.state)?;
        state.completions.retain(|c| c.habit_title != title);
        state.habits.remove(title);
        Ok(())
    }

    fn list_habits(&self, periodicity: Option<Periodicity>) -> Result<Vec<Habit>, StorageError> {
        let state = lock(&self.state)?;
        Ok(state
            .habits
            .values()
            .filter(|h| periodicity.map_or(true, |p| h.periodicity == p))
            .cloned()
            .collect())
    }

    fn add_completion(&self, title: &str, date: NaiveDate) -> Result<(), StorageError> {
        let mut state = lock(&self.state)?;
        if !state.habits.contains_key(title) {
            return Err(StorageError::HabitNotFound {
                title: title.to_string(),
            });
        }
        state.completions.push(CompletionRecord::new(title, date));
        Ok(())
    }

    fn get_completions(&self, title: &str) -> Result<Vec<CompletionRecord>, StorageError> {
        let state = lock(&self.state)?;
        let mut records: Vec<CompletionRecord> = state
            .completions
            .iter()
            .filter(|c| c.habit_title == title)
            .cloned()
            .collect();
        records.sort_by_key(|c| c.date);
        Ok(records)
    }

    fn latest_completion_date(&self, title: &str) -> Result<Option<NaiveDate>, StorageError> {
        let state = lock(&self.state)?;
        Ok(state
            .completions
            .iter()
            .filter(|c| c.habit_title == title)
            .map(|c| c.date)
            .max())
    }

    fn update_streak(&self, title: &str, streak_count: u32) -> Result<(), StorageError> {
        self.with_habit(title, |habit| habit.streak_count = streak_count)
    }

    fn update_longest_streak(&self, title: &str, longest_streak: u32) -> Result<(), StorageError> {
        self.with_habit(title, |habit| habit.longest_streak = longest_streak)
    }

    fn begin_write(&self) -> Result<(), StorageError> {
        let mut snapshot = lock(&self.snapshot)?;
        if snapshot.is_some() {
            return Err(StorageError::Connection(
                "a write scope is already open".to_string(),
            ));
        }
        *snapshot = Some(lock(&self.state)?.clone());
        Ok(())
    }

    fn commit_write(&self) -> Result<(), StorageError> {
        lock(&self.snapshot)?.take();
        Ok(())
    }

    fn rollback_write(&self) -> Result<(), StorageError> {
        if let Some(saved) = lock(&self.snapshot)?.take() {
            *lock(&self.state)? = saved;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_create_resets_counters_and_rejects_duplicates() {
        let storage = MemoryStorage::new();
        let mut habit = Habit::new("stretch".to_string(), String::new(), Periodicity::Daily, date(2023, 8, 1)).unwrap();
        habit.streak_count = 4;
        storage.create_habit(&habit).unwrap();

        assert_eq!(storage.get_habit("stretch").unwrap().unwrap().streak_count, 0);
        assert!(matches!(
            storage.create_habit(&habit),
            Err(StorageError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_rollback_restores_snapshot() {
        let storage = MemoryStorage::new();
        let habit = Habit::new("stretch".to_string(), String::new(), Periodicity::Daily, date(2023, 8, 1)).unwrap();
        storage.create_habit(&habit).unwrap();

        storage.begin_write().unwrap();
        storage.update_streak("stretch", 2).unwrap();
        storage.add_completion("stretch", date(2023, 8, 2)).unwrap();
        storage.rollback_write().unwrap();

        assert_eq!(storage.get_habit("stretch").unwrap().unwrap().streak_count, 0);
        assert_eq!(storage.latest_completion_date("stretch").unwrap(), None);
    }

    #[test]
    fn test_write_scopes_do_not_nest() {
        let storage = MemoryStorage::new();
        storage.begin_write().unwrap();
        assert!(matches!(storage.begin_write(), Err(StorageError::Connection(_))));

        storage.commit_write().unwrap();
        storage.begin_write().unwrap();
        storage.rollback_write().unwrap();
    }

    #[test]
    fn test_delete_removes_completions() {
        let storage = MemoryStorage::new();
        let habit = Habit::new("stretch".to_string(), String::new(), Periodicity::Weekly, date(2023, 8, 1)).unwrap();
        storage.create_habit(&habit).unwrap();
        storage.add_completion("stretch", date(2023, 8, 8)).unwrap();

        storage.delete_habit("stretch").unwrap();

        assert!(storage.get_habit("stretch").unwrap().is_none());
        assert!(storage.get_completions("stretch").unwrap().is_empty());
    }
}
