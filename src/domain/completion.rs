/// CompletionRecord entity
///
/// One row per day a habit was checked off. Records are written only by
/// the streak engine and removed only when their habit is deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A record of completing a habit on a specific day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Title of the habit this completion belongs to
    pub habit_title: String,
    /// Day the habit was completed
    pub date: NaiveDate,
}

impl CompletionRecord {
    pub fn new(habit_title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            habit_title: habit_title.into(),
            date,
        }
    }
}
