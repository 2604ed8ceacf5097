/// MCP tools for habit management
///
/// Each tool validates raw input from the client (titles, periodicities,
/// dates), enforces the preconditions the streak engine relies on, and
/// renders a text reply.

pub mod create;
pub mod complete;
pub mod delete;
pub mod list;
pub mod streaks;

// Re-export tool functions for easy access
pub use create::*;
pub use complete::*;
pub use delete::*;
pub use list::*;
pub use streaks::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{parse_date, DomainError};
use crate::engine::StreakError;
use crate::storage::StorageError;

/// Errors a tool call can report back to the client
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Streak(#[from] StreakError),
}

/// Parse an optional date argument, defaulting to `today`
///
/// Dates after `today` are rejected.
pub(crate) fn date_or_today(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, DomainError> {
    let date = match raw {
        Some(s) if !s.trim().is_empty() => parse_date(s)?,
        _ => today,
    };

    if date > today {
        return Err(DomainError::InvalidDate(format!(
            "{} is in the future (today is {})",
            date, today
        )));
    }

    Ok(date)
}
