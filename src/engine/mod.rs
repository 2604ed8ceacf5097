/// Streak engine for recording habit completions
///
/// The engine loads a habit's streak state from the store, lets the domain
/// rule decide what the new completion means, and writes the result back.
/// The whole read-compute-write sequence runs inside one exclusive write
/// scope so that concurrent completions cannot interleave.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{StreakNotification, StreakState, StreakStep, StreakTransition};
use crate::storage::{HabitStorage, StorageError};

/// Errors returned by `StreakEngine::record_completion`
#[derive(Error, Debug)]
pub enum StreakError {
    #[error("Habit not found: {title}")]
    HabitNotFound { title: String },

    #[error("The habit '{title}' was already completed on {date}")]
    AlreadyCompleted { title: String, date: NaiveDate },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a successful completion did to the habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionOutcome {
    pub title: String,
    pub date: NaiveDate,
    pub streak_count: u32,
    pub longest_streak: u32,
    pub transition: StreakTransition,
    /// The streak passed the previous longest streak
    pub new_record: bool,
    /// Notifications in the order they should be shown
    pub notifications: Vec<StreakNotification>,
}

impl CompletionOutcome {
    /// All notifications joined into one user-facing message
    pub fn message(&self) -> String {
        self.notifications
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Streak engine
///
/// Stateless; every call takes the store it should work against.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreakEngine;

impl StreakEngine {
    /// Create a new streak engine
    pub fn new() -> Self {
        Self
    }

    /// Record that `title` was completed on `completion_date`
    ///
    /// The caller guarantees that `completion_date` is neither before the
    /// habit's creation date nor in the future. A completion on the
    /// reference date itself is rejected with `AlreadyCompleted` and
    /// changes nothing.
    pub fn record_completion<S: HabitStorage + ?Sized>(
        &self,
        storage: &S,
        title: &str,
        completion_date: NaiveDate,
    ) -> Result<CompletionOutcome, StreakError> {
        storage.begin_write()?;

        match self.apply_completion(storage, title, completion_date) {
            Ok(outcome) => {
                storage.commit_write()?;
                Ok(outcome)
            }
            Err(e) => {
                if let Err(rollback_err) = storage.rollback_write() {
                    warn!("Rollback after failed completion of '{}' failed: {}", title, rollback_err);
                }
                Err(e)
            }
        }
    }

    fn apply_completion<S: HabitStorage + ?Sized>(
        &self,
        storage: &S,
        title: &str,
        completion_date: NaiveDate,
    ) -> Result<CompletionOutcome, StreakError> {
        let habit = storage
            .get_habit(title)?
            .ok_or_else(|| StreakError::HabitNotFound {
                title: title.to_string(),
            })?;

        let reference_date = storage
            .latest_completion_date(title)?
            .unwrap_or(habit.creation_date);

        debug!(
            "Completing '{}' on {} (reference {}, streak {}, longest {})",
            title, completion_date, reference_date, habit.streak_count, habit.longest_streak
        );

        let state = StreakState::new(habit.streak_count, habit.longest_streak, reference_date);

        let decision = match state.advance(habit.periodicity, completion_date) {
            StreakStep::AlreadyCompleted => {
                warn!("'{}' was already completed on {}", title, completion_date);
                return Err(StreakError::AlreadyCompleted {
                    title: title.to_string(),
                    date: completion_date,
                });
            }
            StreakStep::Advanced(decision) => decision,
        };

        storage.update_streak(title, decision.streak_count)?;
        if decision.longest_streak != habit.longest_streak {
            storage.update_longest_streak(title, decision.longest_streak)?;
        }
        storage.add_completion(title, completion_date)?;

        match decision.transition {
            StreakTransition::Continued if decision.new_record => info!(
                "Streak of '{}' continued: {}, a new record",
                title, decision.streak_count
            ),
            StreakTransition::Continued => info!(
                "Streak of '{}' continued: {} (longest {})",
                title, decision.streak_count, decision.longest_streak
            ),
            StreakTransition::Broken => info!(
                "Streak of '{}' broken, skipped more than {} day(s)",
                title,
                habit.periodicity.window_days()
            ),
        }

        Ok(CompletionOutcome {
            title: habit.title,
            date: completion_date,
            streak_count: decision.streak_count,
            longest_streak: decision.longest_streak,
            transition: decision.transition,
            new_record: decision.new_record,
            notifications: decision.notifications,
        })
    }
}
