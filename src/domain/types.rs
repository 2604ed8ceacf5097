/// Core types used throughout the domain layer
///
/// Periodicity is the only scheduling concept a habit has: it decides how
/// long a streak may go without a completion before it breaks.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Date format used for parsing user input and for storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How often a habit should be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    /// Once per calendar day
    Daily,
    /// Once per seven days
    Weekly,
}

impl Periodicity {
    /// Every periodicity, in reporting order
    pub const ALL: [Periodicity; 2] = [Periodicity::Daily, Periodicity::Weekly];

    /// Length of one period in days
    pub fn window_days(&self) -> i64 {
        match self {
            Periodicity::Daily => 1,
            Periodicity::Weekly => 7,
        }
    }

    /// Storage/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Daily => "daily",
            Periodicity::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Periodicity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Periodicity::Daily),
            "weekly" => Ok(Periodicity::Weekly),
            other => Err(DomainError::InvalidPeriodicity(format!(
                "'{}' is not supported. Valid options: daily, weekly",
                other
            ))),
        }
    }
}

/// Parse a calendar date in `YYYY-MM-DD` form
///
/// Rejects strings that are not real calendar dates (e.g. 2023-02-30).
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
        DomainError::InvalidDate(format!("'{}' is not a valid YYYY-MM-DD date", s.trim()))
    })
}
