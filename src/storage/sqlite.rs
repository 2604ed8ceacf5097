/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habits and their completions. It handles all SQL queries
/// and row conversion.

use std::path::PathBuf;

use chrono::NaiveDate;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

use crate::domain::{CompletionRecord, Habit, Periodicity};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str =
    "title, description, periodicity, streak_count, longest_streak, creation_date";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Convert a `habit` row into a Habit
    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        let periodicity_str: String = row.get(2)?;
        let periodicity = periodicity_str.parse::<Periodicity>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Habit::from_existing(
            row.get(0)?, // title
            row.get(1)?, // description
            periodicity,
            row.get(5)?, // creation_date
            row.get(3)?, // streak_count
            row.get(4)?, // longest_streak
        ))
    }

    fn delete_rows(conn: &Connection, title: &str) -> Result<(), StorageError> {
        let completions = conn.execute(
            "DELETE FROM completed_task WHERE habit_title = ?1",
            params![title],
        )?;
        let habits = conn.execute("DELETE FROM habit WHERE title = ?1", params![title])?;

        tracing::debug!(
            "Deleted habit '{}' ({} row, {} completions)",
            title,
            habits,
            completions
        );
        Ok(())
    }
}

/// Map a failed habit insert; only a primary-key clash is a duplicate title
fn insert_error(err: rusqlite::Error, title: &str) -> StorageError {
    match err {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            StorageError::DuplicateKey {
                title: title.to_string(),
            }
        }
        other => StorageError::Query(other),
    }
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let result = self.conn.execute(
            "INSERT INTO habit (
                title, description, periodicity, streak_count, longest_streak, creation_date
            ) VALUES (?1, ?2, ?3, 0, 0, ?4)",
            params![
                habit.title,
                habit.description,
                habit.periodicity.as_str(),
                habit.creation_date
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!("Created habit: {} ({})", habit.title, habit.periodicity);
                Ok(())
            }
            Err(e) => Err(insert_error(e, &habit.title)),
        }
    }

    fn get_habit(&self, title: &str) -> Result<Option<Habit>, StorageError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM habit WHERE title = ?1", HABIT_COLUMNS))?;

        let habit = stmt
            .query_row(params![title], Self::habit_from_row)
            .optional()?;

        Ok(habit)
    }

    fn delete_habit(&self, title: &str) -> Result<(), StorageError> {
        if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            Self::delete_rows(&tx, title)?;
            tx.commit()?;
            Ok(())
        } else {
            // Already inside a write scope; the caller commits.
            Self::delete_rows(&self.conn, title)
        }
    }

    fn list_habits(&self, periodicity: Option<Periodicity>) -> Result<Vec<Habit>, StorageError> {
        let mut habits = Vec::new();

        match periodicity {
            Some(p) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {} FROM habit WHERE periodicity = ?1 ORDER BY title",
                    HABIT_COLUMNS
                ))?;
                for habit in stmt.query_map(params![p.as_str()], Self::habit_from_row)? {
                    habits.push(habit?);
                }
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("SELECT {} FROM habit ORDER BY title", HABIT_COLUMNS))?;
                for habit in stmt.query_map([], Self::habit_from_row)? {
                    habits.push(habit?);
                }
            }
        }

        Ok(habits)
    }

    fn add_completion(&self, title: &str, date: NaiveDate) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO completed_task (date, habit_title) VALUES (?1, ?2)",
            params![date, title],
        )?;

        tracing::debug!("Recorded completion of '{}' on {}", title, date);
        Ok(())
    }

    fn get_completions(&self, title: &str) -> Result<Vec<CompletionRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT habit_title, date FROM completed_task
             WHERE habit_title = ?1
             ORDER BY date ASC",
        )?;

        let record_iter = stmt.query_map(params![title], |row| {
            Ok(CompletionRecord {
                habit_title: row.get(0)?,
                date: row.get(1)?,
            })
        })?;

        let mut records = Vec::new();
        for record in record_iter {
            records.push(record?);
        }

        Ok(records)
    }

    fn latest_completion_date(&self, title: &str) -> Result<Option<NaiveDate>, StorageError> {
        // ISO dates sort lexicographically, so MAX(date) is the latest day
        let latest = self.conn.query_row(
            "SELECT MAX(date) FROM completed_task WHERE habit_title = ?1",
            params![title],
            |row| row.get::<_, Option<NaiveDate>>(0),
        )?;

        Ok(latest)
    }

    fn update_streak(&self, title: &str, streak_count: u32) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habit SET streak_count = ?2 WHERE title = ?1",
            params![title, streak_count],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                title: title.to_string(),
            });
        }

        Ok(())
    }

    fn update_longest_streak(&self, title: &str, longest_streak: u32) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habit SET longest_streak = ?2 WHERE title = ?1",
            params![title, longest_streak],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                title: title.to_string(),
            });
        }

        Ok(())
    }

    fn begin_write(&self) -> Result<(), StorageError> {
        // IMMEDIATE takes the write lock up front, so no other connection can
        // interleave between our reads and writes.
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    fn commit_write(&self) -> Result<(), StorageError> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback_write(&self) -> Result<(), StorageError> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}
