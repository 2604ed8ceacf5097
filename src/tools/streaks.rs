/// Tool for streak reports
///
/// This module implements the habit_streaks MCP tool on top of the
/// analytics engine.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsEngine, PeriodLeaderboard, StreakStanding};
use crate::domain::DomainError;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Which streak report to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StreakReport {
    /// Longest streak of one habit (requires `title`)
    Longest,
    /// Longest streaks of all habits, grouped by periodicity
    #[default]
    Leaderboard,
    /// The habit with the lowest current streak per periodicity
    Weakest,
}

/// Parameters for the streak report tool
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StreaksParams {
    /// Report kind, defaults to "leaderboard"
    #[serde(default)]
    pub report: StreakReport,
    /// Habit title, only used by the "longest" report
    #[serde(default)]
    pub title: Option<String>,
}

/// Structured data behind a streak report
#[derive(Debug, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum StreakReportData {
    Longest { title: String, longest_streak: u32 },
    Leaderboard { boards: Vec<PeriodLeaderboard> },
    Weakest { habits: Vec<StreakStanding> },
}

/// Response from the streak report tool
#[derive(Debug, Serialize)]
pub struct StreaksResponse {
    pub data: StreakReportData,
    pub message: String,
}

/// Produce a streak report
pub fn streak_report<S: HabitStorage + ?Sized>(
    storage: &S,
    analytics: &AnalyticsEngine,
    params: StreaksParams,
) -> Result<StreaksResponse, ToolError> {
    match params.report {
        StreakReport::Longest => {
            let title = params
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    DomainError::InvalidTitle("the longest report needs a habit title".to_string())
                })?;

            let longest_streak = analytics.longest_streak(storage, title)?;
            Ok(StreaksResponse {
                message: format!("Your longest streak of the habit `{}` is: {}", title, longest_streak),
                data: StreakReportData::Longest {
                    title: title.to_string(),
                    longest_streak,
                },
            })
        }
        StreakReport::Leaderboard => {
            let boards = analytics.longest_streaks(storage)?;

            let mut message = String::from("The longest streaks of all habits are:");
            for board in &boards {
                message.push_str(&format!("\n{}", board.periodicity));
                if board.standings.is_empty() {
                    message.push_str("\nNone");
                }
                for (idx, s) in board.standings.iter().enumerate() {
                    message.push_str(&format!("\n{}. {} - {}", idx + 1, s.title, s.streak));
                }
            }

            Ok(StreaksResponse {
                data: StreakReportData::Leaderboard { boards },
                message,
            })
        }
        StreakReport::Weakest => {
            let habits = analytics.weakest_habits(storage)?;

            let message = if habits.is_empty() {
                "No habits to compare yet.".to_string()
            } else {
                let lines = habits
                    .iter()
                    .map(|s| format!("{}: {} - {}", s.periodicity, s.title, s.streak))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("Lately you struggled the most with these habits:\n{}", lines)
            };

            Ok(StreaksResponse {
                data: StreakReportData::Weakest { habits },
                message,
            })
        }
    }
}
