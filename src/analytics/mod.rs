/// Analytics over stored habits
///
/// Read-only queries used by the reporting tools: longest streaks and the
/// habits the user is struggling with. Everything is served
/// from Habit Store reads; nothing here touches the streak engine.

use serde::Serialize;

use crate::domain::{Habit, Periodicity};
use crate::storage::{HabitStorage, StorageError};

/// One habit's position in a streak ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakStanding {
    pub title: String,
    pub periodicity: Periodicity,
    pub streak: u32,
}

/// Habits of one periodicity ranked by longest streak, best first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodLeaderboard {
    pub periodicity: Periodicity,
    pub standings: Vec<StreakStanding>,
}

/// Analytics engine for reporting queries
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self
    }

    /// Longest streak ever reached by one habit
    pub fn longest_streak<S: HabitStorage + ?Sized>(
        &self,
        storage: &S,
        title: &str,
    ) -> Result<u32, StorageError> {
        storage
            .get_habit(title)?
            .map(|h| h.longest_streak)
            .ok_or_else(|| StorageError::HabitNotFound {
                title: title.to_string(),
            })
    }

    /// Longest streaks of all habits, one leaderboard per periodicity
    ///
    /// Ties are broken by title so the ordering is stable.
    pub fn longest_streaks<S: HabitStorage + ?Sized>(
        &self,
        storage: &S,
    ) -> Result<Vec<PeriodLeaderboard>, StorageError> {
        let mut boards = Vec::with_capacity(Periodicity::ALL.len());

        for periodicity in Periodicity::ALL {
            let mut standings: Vec<StreakStanding> = storage
                .list_habits(Some(periodicity))?
                .into_iter()
                .map(|h| standing(h, |h| h.longest_streak))
                .collect();
            standings.sort_by(|a, b| b.streak.cmp(&a.streak).then_with(|| a.title.cmp(&b.title)));

            boards.push(PeriodLeaderboard {
                periodicity,
                standings,
            });
        }

        Ok(boards)
    }

    /// The habit with the lowest current streak for each periodicity
    ///
    /// Periodicities without any habits are left out.
    pub fn weakest_habits<S: HabitStorage + ?Sized>(
        &self,
        storage: &S,
    ) -> Result<Vec<StreakStanding>, StorageError> {
        let mut weakest = Vec::new();

        for periodicity in Periodicity::ALL {
            let lowest = storage
                .list_habits(Some(periodicity))?
                .into_iter()
                .min_by(|a, b| {
                    a.streak_count
                        .cmp(&b.streak_count)
                        .then_with(|| a.title.cmp(&b.title))
                });

            if let Some(habit) = lowest {
                weakest.push(standing(habit, |h| h.streak_count));
            }
        }

        Ok(weakest)
    }
}

fn standing(habit: Habit, streak: impl Fn(&Habit) -> u32) -> StreakStanding {
    StreakStanding {
        streak: streak(&habit),
        periodicity: habit.periodicity,
        title: habit.title,
    }
}
