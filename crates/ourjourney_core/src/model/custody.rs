//! Custody schedule value types.
//!
//! # Responsibility
//! - Define the per-day custody record returned by the cycle engine.
//! - Define the free-evening projection used for date-night suggestions.
//!
//! # Invariants
//! - `handoff_from`/`handoff_to` are both set or both `None`.
//! - `is_transition_day` is `true` exactly when a handoff is recorded.
//! - All dates are civil dates serialized as `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One of the two parties sharing custody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    You,
    Mom,
}

impl Party {
    /// Returns the party on the other side of the arrangement.
    pub fn other(self) -> Self {
        match self {
            Self::You => Self::Mom,
            Self::Mom => Self::You,
        }
    }

    /// Stable lowercase label used on the wire and in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::You => "you",
            Self::Mom => "mom",
        }
    }
}

impl Display for Party {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Party {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "you" => Ok(Self::You),
            "mom" => Ok(Self::Mom),
            other => Err(format!("unknown party `{other}`; expected you|mom")),
        }
    }
}

/// Custody information for one calendar day.
///
/// Computed on demand by [`crate::schedule::assignment_for_date`]; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAssignment {
    pub date: NaiveDate,
    /// Party holding custody for the evening of `date`.
    pub custody_holder: Party,
    /// Offset into the 14-day cycle, `0..=13`.
    pub cycle_position: u8,
    /// `1` or `2`.
    pub week_in_cycle: u8,
    /// Offset into the current cycle week, `0..=6`.
    pub day_position: u8,
    /// `0` = Sunday through `6` = Saturday.
    pub day_of_week: u8,
    pub is_weekend: bool,
    /// Weekend day assigned whole, including the overnight, to one party.
    pub is_overnight_boundary: bool,
    /// Who brings the child in the morning on split days.
    pub dropoff: Option<Party>,
    /// Who collects the child in the afternoon on split days.
    pub pickup: Option<Party>,
    pub handoff_from: Option<Party>,
    pub handoff_to: Option<Party>,
    pub is_transition_day: bool,
}

/// A day on which the querying party does not have custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeEvening {
    pub date: NaiveDate,
    /// English weekday name, e.g. `Monday`.
    pub day_name: String,
    pub is_weekend: bool,
    /// Offset in days from the first scanned date; `0` for the start date.
    pub days_away: u32,
}
