/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Periodicity;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Only list habits with this periodicity ("daily" or "weekly")
    #[serde(default)]
    pub periodicity: Option<String>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub title: String,
    pub description: String,
    pub periodicity: Periodicity,
    pub creation_date: String,
    pub streak_count: u32,
    pub longest_streak: u32,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub message: String,
}

/// List habits using the provided storage
pub fn list_habits<S: HabitStorage + ?Sized>(
    storage: &S,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let periodicity = params
        .periodicity
        .as_deref()
        .map(str::parse::<Periodicity>)
        .transpose()?;

    let habits: Vec<HabitSummary> = storage
        .list_habits(periodicity)?
        .into_iter()
        .map(|habit| HabitSummary {
            title: habit.title,
            description: habit.description,
            periodicity: habit.periodicity,
            creation_date: habit.creation_date.to_string(),
            streak_count: habit.streak_count,
            longest_streak: habit.longest_streak,
        })
        .collect();

    let heading = match periodicity {
        Some(p) => format!("The habits of the period `{}` are:", p),
        None => "Habit titles are:".to_string(),
    };

    let message = if habits.is_empty() {
        format!("{}\nNone", heading)
    } else {
        let lines = habits
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                format!(
                    "{}. {} ({}) - streak {}, longest {}",
                    idx + 1,
                    h.title,
                    h.periodicity,
                    h.streak_count,
                    h.longest_streak
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n{}", heading, lines)
    };

    Ok(ListHabitsResponse { habits, message })
}
