/// Main entry point for the habit streak MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use habit_streaks::HabitTrackerServer;

/// Find a writable directory for the database
///
/// Tries the home directory first, then the platform data and config
/// directories, then the working directory, and finally the temp dir.
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".habit_streaks")),
        dirs::data_dir().map(|p| p.join("habit_streaks")),
        dirs::config_dir().map(|p| p.join("habit_streaks")),
        std::env::current_dir().ok().map(|p| p.join(".habit_streaks")),
    ];

    for dir in candidates.iter().flatten() {
        if std::fs::create_dir_all(dir).is_err() {
            continue;
        }

        let probe = dir.join(".write_probe");
        if std::fs::write(&probe, b"ok").is_ok() {
            let _ = std::fs::remove_file(&probe);
            return Ok(dir.join("habits.db"));
        }
    }

    let temp_dir = std::env::temp_dir().join("habit_streaks");
    std::fs::create_dir_all(&temp_dir)?;

    tracing::warn!("Using temporary directory for database: {}", temp_dir.display());
    Ok(temp_dir.join("habits.db"))
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable info logging
    #[arg(short, long)]
    debug: bool,

    /// Enable debug logging (implies --debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    // RUST_LOG wins over the flags when it is set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("habit_streaks={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // stdout carries protocol traffic
        .init();

    info!("Starting habit streak MCP server");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = HabitTrackerServer::new(db_path).await?;
    server.run().await?;

    info!("Habit streak MCP server shutdown complete");
    Ok(())
}
