//! Journal entry use-case service.
//!
//! # Responsibility
//! - Create, list, patch and complete journal entries of every type.
//!
//! # Invariants
//! - Every write is read back before it is returned.
//! - A patch is applied to the stored entry and validated as a whole, so a
//!   partial update can never leave an invalid row behind.

use crate::model::entry::{Entry, EntryId, EntryStatus, EntryType, Recurrence};
use crate::repo::entry_repo::{normalize_entry_limit, EntryListQuery, EntryRepository, RepoError};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for entry use-cases.
#[derive(Debug)]
pub enum EntryServiceError {
    /// Target entry does not exist.
    EntryNotFound(EntryId),
    /// Persistence-layer failure, including validation.
    Repo(RepoError),
    /// Internal mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for EntryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent entry state: {details}"),
        }
    }
}

impl Error for EntryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for EntryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EntryNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Request model for creating an entry of any type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEntryRequest {
    pub kind: EntryType,
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub target_time: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub reminder_minutes: Option<u32>,
}

impl CreateEntryRequest {
    pub fn new(kind: EntryType, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: None,
            category: None,
            target_date: None,
            target_time: None,
            end_date: None,
            location: None,
            recurrence: None,
            reminder_minutes: None,
        }
    }
}

/// Partial update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub kind: Option<EntryType>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub target_time: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub reminder_minutes: Option<u32>,
    pub status: Option<EntryStatus>,
}

impl EntryPatch {
    fn apply_to(&self, entry: &mut Entry) {
        if let Some(kind) = self.kind {
            entry.kind = kind;
        }
        if let Some(title) = self.title.as_deref() {
            entry.title = title.trim().to_string();
        }
        if let Some(content) = &self.content {
            entry.content = Some(content.clone());
        }
        if let Some(category) = &self.category {
            entry.category = Some(category.clone());
        }
        if let Some(date) = self.target_date {
            entry.target_date = Some(date);
        }
        if let Some(time) = &self.target_time {
            entry.target_time = Some(time.clone());
        }
        if let Some(date) = self.end_date {
            entry.end_date = Some(date);
        }
        if let Some(location) = &self.location {
            entry.location = Some(location.clone());
        }
        if let Some(recurrence) = self.recurrence {
            entry.recurrence = recurrence;
        }
        if let Some(minutes) = self.reminder_minutes {
            entry.reminder_minutes = minutes;
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
    }
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryListResult {
    /// Newest first.
    pub items: Vec<Entry>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Entry service facade over repository implementations.
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one entry and returns the stored record.
    pub fn create_entry(&self, request: &CreateEntryRequest) -> Result<Entry, EntryServiceError> {
        let mut entry = Entry::new(request.kind, request.title.trim());
        entry.content = request.content.clone();
        entry.category = request.category.clone();
        entry.target_date = request.target_date;
        entry.target_time = request.target_time.clone();
        entry.end_date = request.end_date;
        entry.location = request.location.clone();
        entry.recurrence = request.recurrence.unwrap_or_default();
        entry.reminder_minutes = request.reminder_minutes.unwrap_or(0);

        let id = self.repo.create_entry(&entry)?;
        info!(
            "event=entry_create module=service status=ok type={}",
            entry.kind.as_str()
        );
        self.read_back(id)
    }

    pub fn get_entry(&self, id: EntryId) -> Result<Option<Entry>, EntryServiceError> {
        Ok(self.repo.get_entry(id)?)
    }

    /// Lists entries newest first with optional type/status/category filters.
    pub fn list_entries(
        &self,
        query: &EntryListQuery,
    ) -> Result<EntryListResult, EntryServiceError> {
        let applied_limit = normalize_entry_limit(query.limit);
        let query = EntryListQuery {
            limit: Some(applied_limit),
            ..query.clone()
        };
        let items = self.repo.list_entries(&query)?;
        Ok(EntryListResult {
            items,
            applied_limit,
        })
    }

    /// Applies `patch` to the stored entry and returns the result.
    pub fn update_entry(
        &self,
        id: EntryId,
        patch: &EntryPatch,
    ) -> Result<Entry, EntryServiceError> {
        let mut entry = self
            .repo
            .get_entry(id)?
            .ok_or(EntryServiceError::EntryNotFound(id))?;
        patch.apply_to(&mut entry);

        self.repo.update_entry(&entry)?;
        info!(
            "event=entry_update module=service status=ok type={} entry_status={}",
            entry.kind.as_str(),
            entry.status.as_str()
        );
        self.read_back(id)
    }

    /// Marks an entry completed and returns the stored result.
    pub fn complete_entry(&self, id: EntryId) -> Result<Entry, EntryServiceError> {
        self.repo.complete_entry(id)?;
        info!("event=entry_complete module=service status=ok");
        self.read_back(id)
    }

    fn read_back(&self, id: EntryId) -> Result<Entry, EntryServiceError> {
        self.repo
            .get_entry(id)?
            .ok_or(EntryServiceError::InconsistentState(
                "entry missing in read-back",
            ))
    }
}
