/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, Periodicity};
use crate::storage::{HabitStorage, StorageError};
use crate::tools::{date_or_today, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Unique title of the habit
    pub title: String,
    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// How often the habit is due: "daily" or "weekly"
    pub periodicity: String,
    /// Creation date (YYYY-MM-DD), defaults to today; cannot be in the future
    #[serde(default)]
    pub creation_date: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub habit: Habit,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    params: CreateHabitParams,
    today: NaiveDate,
) -> Result<CreateHabitResponse, ToolError> {
    let title = Habit::validate_title(&params.title)?;
    let periodicity: Periodicity = params.periodicity.parse()?;
    let creation_date = date_or_today(params.creation_date.as_deref(), today)?;

    if storage.get_habit(&title)?.is_some() {
        return Err(StorageError::DuplicateKey { title }.into());
    }

    let habit = Habit::new(
        title,
        params.description.unwrap_or_default(),
        periodicity,
        creation_date,
    )?;

    storage.create_habit(&habit)?;
    tracing::info!("Created {} habit '{}' on {}", habit.periodicity, habit.title, habit.creation_date);

    let message = format!(
        "The habit with the title `{}` was successfully added ({}, created {}).",
        habit.title, habit.periodicity, habit.creation_date
    );

    Ok(CreateHabitResponse { habit, message })
}
