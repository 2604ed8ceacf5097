/// Storage layer for persisting habit data
///
/// This module defines the Habit Store interface and its two backends:
/// SQLite for durable storage and an in-memory map for tests and embedding.
/// The store holds no business logic; streak rules live in the engine.

pub mod sqlite;
pub mod memory;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;
pub use memory::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{CompletionRecord, Habit, Periodicity};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {title}")]
    HabitNotFound { title: String },

    #[error("A habit titled '{title}' already exists")]
    DuplicateKey { title: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the Habit Store interface
///
/// Every mutating call is durable before it returns, except inside a write
/// scope opened with `begin_write`, where changes become durable on
/// `commit_write` and are discarded by `rollback_write`.
pub trait HabitStorage {
    /// Insert a new habit with both streak counters at zero
    ///
    /// Fails with `DuplicateKey` if the title is taken.
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by title, `None` if it does not exist
    fn get_habit(&self, title: &str) -> Result<Option<Habit>, StorageError>;

    /// Delete a habit's completions, then the habit itself
    ///
    /// Deleting a missing habit is a no-op.
    fn delete_habit(&self, title: &str) -> Result<(), StorageError>;

    /// List habits ordered by title, optionally filtered by periodicity
    fn list_habits(&self, periodicity: Option<Periodicity>) -> Result<Vec<Habit>, StorageError>;

    /// Append a completion record; no duplicate check at this layer
    fn add_completion(&self, title: &str, date: NaiveDate) -> Result<(), StorageError>;

    /// All completions of a habit, oldest first
    fn get_completions(&self, title: &str) -> Result<Vec<CompletionRecord>, StorageError>;

    /// The latest completion date, `None` if the habit was never completed
    fn latest_completion_date(&self, title: &str) -> Result<Option<NaiveDate>, StorageError>;

    /// Overwrite the current streak counter
    fn update_streak(&self, title: &str, streak_count: u32) -> Result<(), StorageError>;

    /// Overwrite the longest streak counter
    fn update_longest_streak(&self, title: &str, longest_streak: u32) -> Result<(), StorageError>;

    /// Open an exclusive write scope
    fn begin_write(&self) -> Result<(), StorageError>;

    /// Make every change since `begin_write` durable
    fn commit_write(&self) -> Result<(), StorageError>;

    /// Discard every change since `begin_write`
    fn rollback_write(&self) -> Result<(), StorageError>;
}
