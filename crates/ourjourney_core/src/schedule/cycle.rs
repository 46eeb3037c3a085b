//! Cycle arithmetic and derived schedule views.

use super::pattern::pattern_at;
use super::{ScheduleError, ScheduleResult};
use crate::model::custody::{DayAssignment, FreeEvening, Party};
use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;

/// Length of the repeating custody pattern.
pub const CYCLE_LENGTH_DAYS: i64 = 14;
/// Free evenings returned when a caller does not ask for a count.
pub const DEFAULT_FREE_EVENING_COUNT: usize = 5;
/// How far ahead free-evening searches look by default.
pub const DEFAULT_FREE_EVENING_HORIZON_DAYS: u32 = 60;

// Day 0 of the cycle: Sunday of week 1, "you" have the weekend.
static CYCLE_EPOCH: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2025, 8, 17).expect("valid cycle epoch"));

/// Returns the fixed reference date for cycle position 0.
pub fn cycle_epoch() -> NaiveDate {
    *CYCLE_EPOCH
}

/// Returns the position of `date` in the 14-day cycle, `0..=13`.
///
/// Dates before the epoch wrap with a non-negative modulo, so exactly one
/// cycle before the epoch is position 0 again.
pub fn cycle_position(date: NaiveDate) -> u8 {
    let days_since_epoch = day_number(date) - day_number(cycle_epoch());
    // rem_euclid keeps the result in 0..14 for negative offsets.
    days_since_epoch.rem_euclid(CYCLE_LENGTH_DAYS) as u8
}

/// Computes custody information for one civil date.
///
/// Total over every representable date; the same date always yields the
/// same assignment.
pub fn assignment_for_date(date: NaiveDate) -> DayAssignment {
    let position = cycle_position(date);
    let pattern = pattern_at(position);
    let weekday = date.weekday();
    let is_weekend = is_weekend(weekday);
    let handoff = pattern.handoff();

    DayAssignment {
        date,
        custody_holder: pattern.custody,
        cycle_position: position,
        week_in_cycle: if position < 7 { 1 } else { 2 },
        day_position: position % 7,
        day_of_week: weekday.num_days_from_sunday() as u8,
        is_weekend,
        is_overnight_boundary: is_weekend && pattern.is_overnight(),
        dropoff: pattern.exchange.map(|(dropoff, _)| dropoff),
        pickup: pattern.exchange.map(|(_, pickup)| pickup),
        handoff_from: handoff.map(|(from, _)| from),
        handoff_to: handoff.map(|(_, to)| to),
        is_transition_day: handoff.is_some(),
    }
}

/// Returns one assignment per day in `[start, end]`, ascending.
///
/// # Errors
/// - Returns [`ScheduleError::InvalidRange`] when `end < start`; no partial
///   result is produced.
pub fn assignments_for_range(
    start: NaiveDate,
    end: NaiveDate,
) -> ScheduleResult<Vec<DayAssignment>> {
    if end < start {
        return Err(ScheduleError::InvalidRange { start, end });
    }

    Ok(start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(assignment_for_date)
        .collect())
}

/// Returns the assignments for every day of a month.
///
/// `month` is 1-based (`1` = January).
///
/// # Errors
/// - Returns [`ScheduleError::InvalidDate`] when `month` is outside `1..=12`
///   or `year` is outside the supported calendar.
pub fn assignments_for_month(year: i32, month: u32) -> ScheduleResult<Vec<DayAssignment>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        ScheduleError::InvalidDate(format!("{year}-{month:02} is not a calendar month"))
    })?;
    let last = (28..=31)
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .unwrap_or(first);

    assignments_for_range(first, last)
}

/// Finds upcoming evenings on which "you" do not have custody.
///
/// See [`next_free_evenings_for`].
pub fn next_free_evenings(from: NaiveDate, count: usize, horizon_days: u32) -> Vec<FreeEvening> {
    next_free_evenings_for(Party::You, from, count, horizon_days)
}

/// Finds upcoming evenings on which `side` does not have custody.
///
/// Scans forward from `from` (inclusive) for at most `horizon_days` days and
/// stops once `count` evenings are found. A short result means the horizon
/// ran out first.
pub fn next_free_evenings_for(
    side: Party,
    from: NaiveDate,
    count: usize,
    horizon_days: u32,
) -> Vec<FreeEvening> {
    let mut evenings = Vec::with_capacity(count.min(horizon_days as usize));

    for (days_away, date) in (0..horizon_days).zip(from.iter_days()) {
        if evenings.len() >= count {
            break;
        }

        let assignment = assignment_for_date(date);
        if assignment.custody_holder == side {
            continue;
        }

        evenings.push(FreeEvening {
            date,
            day_name: weekday_name(date.weekday()).to_string(),
            is_weekend: assignment.is_weekend,
            days_away,
        });
    }

    evenings
}

fn day_number(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
