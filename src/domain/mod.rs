/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, CompletionRecord) and the
/// streak-continuation rule. Nothing here touches storage.

pub mod habit;
pub mod completion;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use completion::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid habit title: {0}")]
    InvalidTitle(String),

    #[error("Invalid periodicity: {0}")]
    InvalidPeriodicity(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
