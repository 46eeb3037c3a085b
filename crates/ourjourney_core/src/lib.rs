//! Core domain logic for OurJourney.
//! This crate is the single source of truth for the custody schedule and the
//! calendar store.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogLevel, LogTarget,
    LoggingError,
};
pub use model::custody::{DayAssignment, FreeEvening, Party};
pub use model::entry::{Entry, EntryId, EntryStatus, EntryType, EntryValidationError, Recurrence};
pub use repo::entry_repo::{
    EntryListQuery, EntryRepository, RepoError, RepoResult, SqliteEntryRepository,
};
pub use schedule::{
    assignment_for_date, assignments_for_month, assignments_for_range, cycle_epoch,
    next_free_evenings, next_free_evenings_for, parse_civil_date, ScheduleError, ScheduleResult,
};
pub use service::calendar_service::{
    CalendarService, CalendarServiceError, DayView, MonthView, ScheduleEventRequest,
};
pub use service::entry_service::{
    CreateEntryRequest, EntryListResult, EntryPatch, EntryService, EntryServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
