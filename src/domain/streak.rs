/// Streak continuation rule
///
/// This module decides what a newly reported completion does to a habit's
/// streak counters. It is pure: the engine loads a `StreakState`, asks it to
/// advance, and persists whatever comes back.
///
/// A completion is judged against the reference date, which is the latest
/// recorded completion or, for a habit that was never completed, its
/// creation date. The comparison is always against the maximum recorded
/// date, so completions reported out of chronological order can produce
/// the wrong transition. Backfilling is not supported.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Periodicity;

/// Streak counters plus the date new completions are measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub streak_count: u32,
    pub longest_streak: u32,
    pub reference_date: NaiveDate,
}

/// Whether a completion extended the current run or started a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTransition {
    Continued,
    Broken,
}

/// User-facing events produced while recording a completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreakNotification {
    /// The current streak was written back
    StreakUpdated { streak_count: u32 },
    /// The current streak overtook the longest streak
    NewRecord { longest_streak: u32 },
    /// More than one period passed since the reference date
    HabitBroken { window_days: i64 },
}

impl fmt::Display for StreakNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreakNotification::StreakUpdated { streak_count } => {
                write!(f, "The streak count was updated to {}.", streak_count)
            }
            StreakNotification::NewRecord { longest_streak } => {
                write!(f, "You have a new record! Your longest streak is now {}.", longest_streak)
            }
            StreakNotification::HabitBroken { window_days } => {
                write!(f, "You broke your habit! You skipped more than {} day(s).", window_days)
            }
        }
    }
}

/// New counters and the notifications explaining them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakDecision {
    pub streak_count: u32,
    pub longest_streak: u32,
    pub transition: StreakTransition,
    pub new_record: bool,
    pub notifications: Vec<StreakNotification>,
}

/// Result of offering a completion date to a `StreakState`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreakStep {
    /// The date equals the reference date; nothing may change
    AlreadyCompleted,
    Advanced(StreakDecision),
}

impl StreakState {
    pub fn new(streak_count: u32, longest_streak: u32, reference_date: NaiveDate) -> Self {
        Self {
            streak_count,
            longest_streak,
            reference_date,
        }
    }

    /// Apply a completion on `completion_date`
    ///
    /// The window is inclusive: a completion exactly one period after the
    /// reference date continues the streak. A break restarts the streak at 1
    /// because the breaking completion is itself the first of the new run.
    pub fn advance(&self, periodicity: Periodicity, completion_date: NaiveDate) -> StreakStep {
        if completion_date == self.reference_date {
            return StreakStep::AlreadyCompleted;
        }

        let mut notifications = Vec::new();

        // Day gap rather than date arithmetic, which overflows at the edges of
        // the calendar
        let gap_days = (completion_date - self.reference_date).num_days();

        if gap_days <= periodicity.window_days() {
            let streak_count = self.streak_count + 1;
            let new_record = streak_count > self.longest_streak;
            let longest_streak = if new_record { streak_count } else { self.longest_streak };

            if new_record {
                notifications.push(StreakNotification::NewRecord { longest_streak });
            }
            notifications.push(StreakNotification::StreakUpdated { streak_count });

            StreakStep::Advanced(StreakDecision {
                streak_count,
                longest_streak,
                transition: StreakTransition::Continued,
                new_record,
                notifications,
            })
        } else {
            notifications.push(StreakNotification::HabitBroken {
                window_days: periodicity.window_days(),
            });
            notifications.push(StreakNotification::StreakUpdated { streak_count: 1 });

            StreakStep::Advanced(StreakDecision {
                streak_count: 1,
                // streak_count <= longest_streak, even when the very first completion breaks
                longest_streak: self.longest_streak.max(1),
                transition: StreakTransition::Broken,
                new_record: false,
                notifications,
            })
        }
    }
}
