//! Custody cycle engine.
//!
//! # Responsibility
//! - Map any civil date onto the repeating 14-day custody pattern.
//! - Provide range, month and free-evening views over that mapping.
//! - Parse boundary date strings strictly.
//!
//! # Invariants
//! - Every operation is a pure function of its inputs and the fixed
//!   epoch/pattern constants.
//! - The cycle position is closed-form arithmetic; nothing iterates from the
//!   epoch to the query date.
//! - The only failures are `InvalidRange` and `InvalidDate`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod cycle;
mod pattern;

pub use cycle::{
    assignment_for_date, assignments_for_month, assignments_for_range, cycle_epoch,
    cycle_position, next_free_evenings, next_free_evenings_for, CYCLE_LENGTH_DAYS,
    DEFAULT_FREE_EVENING_COUNT, DEFAULT_FREE_EVENING_HORIZON_DAYS,
};

static CIVIL_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid civil date regex"));

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Error for schedule queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Range query with `end < start`.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// Unparseable date input or out-of-range month/day.
    InvalidDate(String),
}

impl ScheduleError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "invalid_range",
            Self::InvalidDate(_) => "invalid_date",
        }
    }
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange { start, end } => {
                write!(f, "invalid range: end date {end} is before start date {start}")
            }
            Self::InvalidDate(message) => write!(f, "invalid date: {message}"),
        }
    }
}

impl Error for ScheduleError {}

/// Parses a strict `YYYY-MM-DD` civil date.
///
/// Only ASCII digits are accepted and surrounding whitespace is rejected.
///
/// # Errors
/// - Returns [`ScheduleError::InvalidDate`] when the text is not exactly
///   `YYYY-MM-DD` or names a day that does not exist.
pub fn parse_civil_date(value: &str) -> ScheduleResult<NaiveDate> {
    let caps = CIVIL_DATE_RE.captures(value).ok_or_else(|| {
        ScheduleError::InvalidDate(format!("`{value}` is not a YYYY-MM-DD date"))
    })?;

    let year: i32 = parse_group(value, &caps[1])?;
    let month: u32 = parse_group(value, &caps[2])?;
    let day: u32 = parse_group(value, &caps[3])?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ScheduleError::InvalidDate(format!("`{value}` is not a calendar day"))
    })
}

fn parse_group<T: std::str::FromStr>(value: &str, group: &str) -> ScheduleResult<T> {
    group.parse().map_err(|_| {
        ScheduleError::InvalidDate(format!("`{value}` has a non-numeric component `{group}`"))
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_civil_date, ScheduleError};
    use chrono::NaiveDate;

    #[test]
    fn parse_accepts_iso_dates() {
        assert_eq!(
            parse_civil_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            parse_civil_date("0001-01-01").unwrap(),
            NaiveDate::from_ymd_opt(1, 1, 1).unwrap()
        );
    }

    #[test]
    fn parse_rejects_surrounding_whitespace() {
        for raw in [" 2025-08-17", "2025-08-17 ", "2025-08-17\n"] {
            assert!(parse_civil_date(raw).is_err(), "input {raw:?}");
        }
    }

    #[test]
    fn parse_rejects_non_ascii_digits() {
        for raw in [
            "\u{0662}\u{0660}\u{0662}\u{0665}-08-17",
            "\u{FF12}\u{FF10}\u{FF12}\u{FF15}-08-18",
            "2025-0\u{0668}-17",
            "2025-08-1\u{0667}",
        ] {
            let err = parse_civil_date(raw).unwrap_err();
            assert_eq!(err.kind(), "invalid_date", "input {raw:?}");
        }
    }

    #[test]
    fn parse_rejects_loose_formats() {
        for raw in ["2025-8-17", "17/08/2025", "2025-08-17T00:00:00Z", "", "today"] {
            let err = parse_civil_date(raw).unwrap_err();
            assert_eq!(err.kind(), "invalid_date", "input {raw:?}");
        }
    }

    #[test]
    fn parse_rejects_nonexistent_days() {
        for raw in ["2023-02-29", "2025-13-01", "2025-00-10", "2025-04-31"] {
            assert!(matches!(
                parse_civil_date(raw),
                Err(ScheduleError::InvalidDate(_))
            ));
        }
    }
}
