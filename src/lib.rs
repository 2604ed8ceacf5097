/// Public library interface for the habit streak tracker
///
/// The crate is organised around two components: the Habit Store
/// (`storage`), which persists habits and their completions, and the Streak
/// Engine (`engine`), which decides how each new completion moves a habit's
/// streak. The MCP server and the tools on top of them are the interactive
/// surface.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod engine;
mod analytics;
mod tools;
mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{HabitStorage, MemoryStorage, SqliteStorage, StorageError};
pub use engine::{CompletionOutcome, StreakEngine, StreakError};
pub use analytics::{AnalyticsEngine, PeriodLeaderboard, StreakStanding};
pub use tools::{
    complete_habit, create_habit, delete_habit, list_habits, streak_report, CompleteHabitParams,
    CreateHabitParams, CreateHabitResponse, DeleteHabitParams, DeleteHabitResponse, HabitSummary,
    ListHabitsParams, ListHabitsResponse, StreakReport, StreakReportData, StreaksParams,
    StreaksResponse, ToolError,
};
pub use mcp::McpServer;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit tracker server: a store plus the engines that work on it
///
/// The store is passed explicitly to every engine call; nothing here is
/// global.
pub struct HabitTrackerServer {
    storage: SqliteStorage,
    engine: StreakEngine,
    analytics: AnalyticsEngine,
}

impl HabitTrackerServer {
    /// Create a new habit tracker server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing habit tracker with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::with_storage(storage))
    }

    /// Build a server around an already opened store
    pub fn with_storage(storage: SqliteStorage) -> Self {
        Self {
            storage,
            engine: StreakEngine::new(),
            analytics: AnalyticsEngine::new(),
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        let habits = self.storage.list_habits(None)?;
        tracing::info!("Server started, found {} existing habits", habits.len());

        let mut mcp_server = McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn engine(&self) -> &StreakEngine {
        &self.engine
    }

    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }
}
