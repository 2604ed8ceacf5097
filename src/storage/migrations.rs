/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has the `habit` and `completed_task` tables.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        let tx = conn.unchecked_transaction()?;
        run_migrations(&tx, current_version)?;
        set_version(&tx, CURRENT_VERSION)?;
        tx.commit()?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let result = conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
        row.get::<_, i32>(0)
    });

    match result {
        Ok(version) => Ok(version),
        // Fresh database
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(StorageError::Migration(format!(
            "Failed to read schema version: {}",
            e
        ))),
    }
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    Ok(())
}

/// Migration to version 1: Create initial tables
///
/// `completed_task` has no uniqueness constraint on (habit_title, date);
/// same-day dedup happens in the streak engine.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habit (
            title TEXT PRIMARY KEY,
            description TEXT NOT NULL DEFAULT '',
            periodicity TEXT NOT NULL,
            streak_count INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0,
            creation_date TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS completed_task (
            date TEXT NOT NULL,
            habit_title TEXT NOT NULL,
            FOREIGN KEY (habit_title) REFERENCES habit (title)
        )",
        [],
    )?;

    // Latest-date lookups and cascade deletes both filter on habit_title
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_completed_task_habit_date
         ON completed_task (habit_title, date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habit_periodicity
         ON habit (periodicity)",
        [],
    )?;

    tracing::info!("Applied migration v1: Created habit and completed_task tables");
    Ok(())
}
