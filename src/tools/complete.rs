/// Tool for checking off a habit
///
/// This module implements the habit_complete MCP tool. It owns the date
/// validation the streak engine trusts: the completion date must be a real
/// date, not in the future and not before the habit was created.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::DomainError;
use crate::engine::{CompletionOutcome, StreakEngine};
use crate::storage::{HabitStorage, StorageError};
use crate::tools::{date_or_today, ToolError};

/// Parameters for completing a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompleteHabitParams {
    /// Title of the habit to check off
    pub title: String,
    /// Completion date (YYYY-MM-DD), defaults to today
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Complete a habit and report what happened to its streak
pub fn complete_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    engine: &StreakEngine,
    params: CompleteHabitParams,
    today: NaiveDate,
) -> Result<CompletionOutcome, ToolError> {
    let title = params.title.trim();

    let habit = storage
        .get_habit(title)?
        .ok_or_else(|| StorageError::HabitNotFound {
            title: title.to_string(),
        })?;

    let completed_at = date_or_today(params.completed_at.as_deref(), today)?;
    if completed_at < habit.creation_date {
        return Err(DomainError::InvalidDate(format!(
            "{} is before the habit was created ({})",
            completed_at, habit.creation_date
        ))
        .into());
    }

    Ok(engine.record_completion(storage, &habit.title, completed_at)?)
}
