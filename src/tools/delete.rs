/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::{HabitStorage, StorageError};
use crate::tools::ToolError;

/// Parameters for deleting a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// Title of the habit to delete together with its completion history
    pub title: String,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub title: String,
    pub removed_completions: usize,
    pub message: String,
}

/// Delete a habit and every completion recorded for it
pub fn delete_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let title = params.title.trim();

    if storage.get_habit(title)?.is_none() {
        return Err(StorageError::HabitNotFound {
            title: title.to_string(),
        }
        .into());
    }

    let removed_completions = storage.get_completions(title)?.len();
    storage.delete_habit(title)?;
    tracing::info!("Deleted habit '{}' and {} completions", title, removed_completions);

    Ok(DeleteHabitResponse {
        title: title.to_string(),
        removed_completions,
        message: format!(
            "The habit with the title `{}` and its {} completed task(s) were successfully deleted.",
            title, removed_completions
        ),
    })
}
