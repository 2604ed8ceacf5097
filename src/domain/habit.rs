/// Habit entity
///
/// A Habit is an immutable value. Persistence lives behind the
/// `HabitStorage` trait; the streak counters only change through the
/// streak engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Periodicity};

/// A recurring obligation the user wants to keep up
///
/// Habits are identified by their title, which never changes once the
/// habit is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique title (primary key)
    pub title: String,
    /// Free-form description, may be empty
    pub description: String,
    /// Required completion cadence
    pub periodicity: Periodicity,
    /// Day the habit was created
    pub creation_date: NaiveDate,
    /// Length of the current run of on-time completions
    pub streak_count: u32,
    /// Highest `streak_count` ever reached
    pub longest_streak: u32,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// New habits start with both streak counters at zero.
    pub fn new(
        title: String,
        description: String,
        periodicity: Periodicity,
        creation_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        let title = Self::validate_title(&title)?;

        Ok(Self {
            title,
            description: description.trim().to_string(),
            periodicity,
            creation_date,
            streak_count: 0,
            longest_streak: 0,
        })
    }

    /// Create a habit from existing data (used when loading from storage)
    pub fn from_existing(
        title: String,
        description: String,
        periodicity: Periodicity,
        creation_date: NaiveDate,
        streak_count: u32,
        longest_streak: u32,
    ) -> Self {
        Self {
            title,
            description,
            periodicity,
            creation_date,
            streak_count,
            longest_streak,
        }
    }

    /// Validate a title and return its trimmed form
    pub fn validate_title(title: &str) -> Result<String, DomainError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle(
                "Habit title cannot be empty".to_string(),
            ));
        }

        Ok(trimmed.to_string())
    }
}
