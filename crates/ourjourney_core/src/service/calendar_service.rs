//! Calendar use-case service.
//!
//! # Responsibility
//! - Schedule calendar entries (date nights) with calendar defaults.
//! - Merge stored events with custody assignments for month and day views.
//!
//! # Invariants
//! - Month views cover exactly the requested month, 1-based.
//! - A view is returned whole or not at all.

use crate::model::custody::DayAssignment;
use crate::model::entry::{Entry, EntryId, EntryType, Recurrence};
use crate::repo::entry_repo::{EntryRepository, RepoError};
use crate::schedule::{assignment_for_date, assignments_for_month, ScheduleError};
use chrono::NaiveDate;
use log::{debug, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const CALENDAR_CATEGORY: &str = "Calendar";

/// Service error for calendar use-cases.
#[derive(Debug)]
pub enum CalendarServiceError {
    /// Bad date/month input or reversed range.
    Schedule(ScheduleError),
    /// Persistence-layer failure, including validation.
    Repo(RepoError),
    /// Internal mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for CalendarServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schedule(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent calendar state: {details}")
            }
        }
    }
}

impl Error for CalendarServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Schedule(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<ScheduleError> for CalendarServiceError {
    fn from(value: ScheduleError) -> Self {
        Self::Schedule(value)
    }
}

impl From<RepoError> for CalendarServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Request model for scheduling a calendar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEventRequest {
    pub title: String,
    pub content: Option<String>,
    pub target_date: NaiveDate,
    /// `HH:MM`, 24-hour clock.
    pub target_time: Option<String>,
    /// Last day of a multi-day entry.
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub reminder_minutes: Option<u32>,
}

/// Stored events merged with custody for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub events: Vec<Entry>,
    pub custody: Vec<DayAssignment>,
}

/// Stored events merged with custody for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayView {
    pub events: Vec<Entry>,
    pub custody: DayAssignment,
}

/// Calendar service facade over repository implementations.
pub struct CalendarService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> CalendarService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a `date` entry in the `Calendar` category and reads it back.
    pub fn schedule_event(
        &self,
        request: &ScheduleEventRequest,
    ) -> Result<Entry, CalendarServiceError> {
        let mut entry = Entry::new(EntryType::Date, request.title.trim());
        entry.content = request.content.clone();
        entry.category = Some(CALENDAR_CATEGORY.to_string());
        entry.target_date = Some(request.target_date);
        entry.target_time = request.target_time.clone();
        entry.end_date = request.end_date;
        entry.location = request.location.clone();
        entry.recurrence = request.recurrence.unwrap_or_default();
        entry.reminder_minutes = request.reminder_minutes.unwrap_or(0);

        let id = self.repo.create_entry(&entry)?;
        info!(
            "event=calendar_schedule module=service status=ok target_date={} multi_day={}",
            request.target_date,
            entry.is_multi_day()
        );
        self.read_back(id)
    }

    /// Returns the month's events alongside its custody assignments.
    ///
    /// `month` is 1-based.
    pub fn month_view(&self, year: i32, month: u32) -> Result<MonthView, CalendarServiceError> {
        let custody = assignments_for_month(year, month)?;
        let (first, last) = match (custody.first(), custody.last()) {
            (Some(first), Some(last)) => (first.date, last.date),
            _ => return Err(CalendarServiceError::InconsistentState("empty month")),
        };

        let events = self.repo.list_month_events(first, last)?;
        debug!(
            "event=calendar_month module=service status=ok year={} month={} events={} days={}",
            year,
            month,
            events.len(),
            custody.len()
        );
        Ok(MonthView { events, custody })
    }

    /// Returns the day's events alongside its custody assignment.
    pub fn day_view(&self, date: NaiveDate) -> Result<DayView, CalendarServiceError> {
        let events = self.repo.list_day_events(date)?;
        Ok(DayView {
            events,
            custody: assignment_for_date(date),
        })
    }

    fn read_back(&self, id: EntryId) -> Result<Entry, CalendarServiceError> {
        self.repo
            .get_entry(id)?
            .ok_or(CalendarServiceError::InconsistentState(
                "entry missing in read-back",
            ))
    }
}
