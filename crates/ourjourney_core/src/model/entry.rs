//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the canonical record stored in the `entries` table.
//! - Validate calendar fields before they reach storage or callers.
//!
//! # Invariants
//! - `id` is a non-nil UUID and never reused.
//! - `title` is never blank.
//! - `end_date` requires `target_date` and is never earlier than it.
//! - `target_time` is `HH:MM` on a 24-hour clock when set.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static TARGET_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid target time regex"));

/// Stable identifier for every entry.
pub type EntryId = Uuid;

/// Entry category as shown by the journal views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Goal,
    Event,
    Memory,
    Ritual,
    Feeling,
    Idea,
    /// Date night scheduled from the calendar.
    Date,
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Event => "event",
            Self::Memory => "memory",
            Self::Ritual => "ritual",
            Self::Feeling => "feeling",
            Self::Idea => "idea",
            Self::Date => "date",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "goal" => Some(Self::Goal),
            "event" => Some(Self::Event),
            "memory" => Some(Self::Memory),
            "ritual" => Some(Self::Ritual),
            "feeling" => Some(Self::Feeling),
            "idea" => Some(Self::Idea),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

/// Entry lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Active,
    Completed,
    Archived,
    Cancelled,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Repeat rule for calendar entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    #[default]
    None,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Validation failures for [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    NilId,
    BlankTitle,
    InvalidTargetTime(String),
    EndWithoutStart,
    InvalidDateWindow { start: NaiveDate, end: NaiveDate },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "entry id must not be nil"),
            Self::BlankTitle => write!(f, "entry title must not be blank"),
            Self::InvalidTargetTime(value) => {
                write!(f, "target_time `{value}` must use HH:MM (24h)")
            }
            Self::EndWithoutStart => write!(f, "end_date requires target_date"),
            Self::InvalidDateWindow { start, end } => {
                write!(f, "end_date ({end}) must be >= target_date ({start})")
            }
        }
    }
}

impl Error for EntryValidationError {}

/// Canonical journal entry.
///
/// Calendar events use `target_date`/`target_time`, multi-day entries also
/// carry `end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EntryWire")]
pub struct Entry {
    pub id: EntryId,
    /// Serialized as `type` to match the journal schema naming.
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub target_time: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub recurrence: Recurrence,
    pub reminder_minutes: u32,
    pub status: EntryStatus,
}

impl Entry {
    /// Creates a new active entry with a generated id.
    pub fn new(kind: EntryType, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            content: None,
            category: None,
            target_date: None,
            target_time: None,
            end_date: None,
            location: None,
            recurrence: Recurrence::None,
            reminder_minutes: 0,
            status: EntryStatus::Active,
        }
    }

    /// Creates an entry with a caller-provided id.
    ///
    /// # Errors
    /// - Returns [`EntryValidationError::NilId`] for `Uuid::nil()`.
    pub fn with_id(
        id: EntryId,
        kind: EntryType,
        title: impl Into<String>,
    ) -> Result<Self, EntryValidationError> {
        if id.is_nil() {
            return Err(EntryValidationError::NilId);
        }
        let mut entry = Self::new(kind, title);
        entry.id = id;
        Ok(entry)
    }

    /// Checks the invariants listed in the module docs.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.is_nil() {
            return Err(EntryValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(EntryValidationError::BlankTitle);
        }
        if let Some(time) = self.target_time.as_deref() {
            if !TARGET_TIME_RE.is_match(time) {
                return Err(EntryValidationError::InvalidTargetTime(time.to_string()));
            }
        }
        match (self.target_date, self.end_date) {
            (None, Some(_)) => Err(EntryValidationError::EndWithoutStart),
            (Some(start), Some(end)) if end < start => {
                Err(EntryValidationError::InvalidDateWindow { start, end })
            }
            _ => Ok(()),
        }
    }

    /// Returns whether this entry spans more than its target date.
    pub fn is_multi_day(&self) -> bool {
        matches!((self.target_date, self.end_date), (Some(start), Some(end)) if end > start)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryWire {
    id: EntryId,
    #[serde(rename = "type")]
    kind: EntryType,
    title: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    target_date: Option<NaiveDate>,
    #[serde(default)]
    target_time: Option<String>,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    recurrence: Recurrence,
    #[serde(default)]
    reminder_minutes: u32,
    status: EntryStatus,
}

impl TryFrom<EntryWire> for Entry {
    type Error = EntryValidationError;

    fn try_from(wire: EntryWire) -> Result<Self, Self::Error> {
        let entry = Entry {
            id: wire.id,
            kind: wire.kind,
            title: wire.title,
            content: wire.content,
            category: wire.category,
            target_date: wire.target_date,
            target_time: wire.target_time,
            end_date: wire.end_date,
            location: wire.location,
            recurrence: wire.recurrence,
            reminder_minutes: wire.reminder_minutes,
            status: wire.status,
        };
        entry.validate()?;
        Ok(entry)
    }
}
