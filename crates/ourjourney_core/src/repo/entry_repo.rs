//! Entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist journal entries and answer the journal list and calendar window
//!   queries.
//! - Keep SQL and date encoding inside the persistence boundary.
//!
//! # Invariants
//! - Writes call `Entry::validate()` before touching SQL.
//! - Reads reject invalid persisted rows instead of masking them.
//! - Dates are stored as `YYYY-MM-DD` text so lexical order is date order.

use crate::db::DbError;
use crate::model::entry::{
    Entry, EntryId, EntryStatus, EntryType, EntryValidationError, Recurrence,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row, ToSql};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    type,
    title,
    content,
    category,
    target_date,
    target_time,
    end_date,
    location,
    recurrence,
    reminder_minutes,
    status
FROM entries";

const DATE_FORMAT: &str = "%Y-%m-%d";
const ENTRIES_DEFAULT_LIMIT: u32 = 50;
const ENTRIES_LIMIT_MAX: u32 = 200;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    NotFound(EntryId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filters for the journal list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListQuery {
    pub kind: Option<EntryType>,
    pub status: Option<EntryStatus>,
    /// Exact category match.
    pub category: Option<String>,
    /// Maximum rows to return. Defaults to 50 and clamps to 200.
    pub limit: Option<u32>,
}

/// Repository interface for journal entries.
pub trait EntryRepository {
    fn create_entry(&self, entry: &Entry) -> RepoResult<EntryId>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    /// Newest entries first, narrowed by the query filters.
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>>;
    /// Replaces every mutable column of an existing entry.
    fn update_entry(&self, entry: &Entry) -> RepoResult<()>;
    /// Calendar entries (`event`/`date`) dated inside `[first, last]`, plus
    /// any multi-day entry overlapping that window.
    fn list_month_events(&self, first: NaiveDate, last: NaiveDate) -> RepoResult<Vec<Entry>>;
    /// Entries (`event`/`date`/`goal`) dated on `date`, plus multi-day
    /// entries spanning it.
    fn list_day_events(&self, date: NaiveDate) -> RepoResult<Vec<Entry>>;
    fn complete_entry(&self, id: EntryId) -> RepoResult<()>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_entries(&self, sql: &str, params: &[&dyn ToSql]) -> RepoResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&self, entry: &Entry) -> RepoResult<EntryId> {
        entry.validate()?;

        self.conn.execute(
            "INSERT INTO entries (
                id,
                type,
                title,
                content,
                category,
                target_date,
                target_time,
                end_date,
                location,
                recurrence,
                reminder_minutes,
                status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                entry.id.to_string(),
                entry.kind.as_str(),
                entry.title.as_str(),
                entry.content.as_deref(),
                entry.category.as_deref(),
                entry.target_date.map(format_date),
                entry.target_time.as_deref(),
                entry.end_date.map(format_date),
                entry.location.as_deref(),
                entry.recurrence.as_str(),
                entry.reminder_minutes,
                entry.status.as_str(),
            ],
        )?;

        Ok(entry.id)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let sql = format!("{ENTRY_SELECT_SQL} WHERE id = ?1;");
        let id_text = id.to_string();
        Ok(self.query_entries(&sql, &[&id_text])?.into_iter().next())
    }

    fn list_month_events(&self, first: NaiveDate, last: NaiveDate) -> RepoResult<Vec<Entry>> {
        let sql = format!(
            "{ENTRY_SELECT_SQL}
             WHERE (type IN ('event', 'date') AND target_date BETWEEN ?1 AND ?2)
                OR (end_date IS NOT NULL AND target_date <= ?2 AND end_date >= ?1)
             ORDER BY target_date ASC, target_time ASC, id ASC;"
        );
        let first = format_date(first);
        let last = format_date(last);
        self.query_entries(&sql, &[&first, &last])
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>> {
        let mut sql = format!("{ENTRY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = query.kind {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }
        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(category) = query.category.as_ref() {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.clone()));
        }

        // created_at has second resolution; rowid orders rows within a second.
        sql.push_str(" ORDER BY created_at DESC, rowid DESC LIMIT ?");
        bind_values.push(Value::Integer(i64::from(normalize_entry_limit(
            query.limit,
        ))));

        let bind_refs = bind_values
            .iter()
            .map(|value| value as &dyn ToSql)
            .collect::<Vec<_>>();
        self.query_entries(&sql, &bind_refs)
    }

    fn update_entry(&self, entry: &Entry) -> RepoResult<()> {
        entry.validate()?;

        let changed = self.conn.execute(
            "UPDATE entries
             SET
                type = ?2,
                title = ?3,
                content = ?4,
                category = ?5,
                target_date = ?6,
                target_time = ?7,
                end_date = ?8,
                location = ?9,
                recurrence = ?10,
                reminder_minutes = ?11,
                status = ?12,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                entry.id.to_string(),
                entry.kind.as_str(),
                entry.title.as_str(),
                entry.content.as_deref(),
                entry.category.as_deref(),
                entry.target_date.map(format_date),
                entry.target_time.as_deref(),
                entry.end_date.map(format_date),
                entry.location.as_deref(),
                entry.recurrence.as_str(),
                entry.reminder_minutes,
                entry.status.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(entry.id));
        }
        Ok(())
    }

    fn list_day_events(&self, date: NaiveDate) -> RepoResult<Vec<Entry>> {
        let sql = format!(
            "{ENTRY_SELECT_SQL}
             WHERE (type IN ('event', 'date', 'goal') AND target_date = ?1)
                OR (end_date IS NOT NULL AND ?1 BETWEEN target_date AND end_date)
             ORDER BY target_time ASC, id ASC;"
        );
        let date = format_date(date);
        self.query_entries(&sql, &[&date])
    }

    fn complete_entry(&self, id: EntryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE entries
             SET
                status = 'completed',
                completed_at = (strftime('%s', 'now') * 1000),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

/// Normalizes the list limit: unset or zero means the default.
pub fn normalize_entry_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => ENTRIES_DEFAULT_LIMIT,
        Some(value) => value.min(ENTRIES_LIMIT_MAX),
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in entries.id"))
    })?;

    let type_text: String = row.get("type")?;
    let kind = EntryType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid entry type `{type_text}` in entries.type"))
    })?;

    let recurrence_text: String = row.get("recurrence")?;
    let recurrence = Recurrence::parse(&recurrence_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid recurrence `{recurrence_text}` in entries.recurrence"
        ))
    })?;

    let status_text: String = row.get("status")?;
    let status = EntryStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in entries.status"))
    })?;

    let reminder_minutes = u32::try_from(row.get::<_, i64>("reminder_minutes")?)
        .map_err(|err| RepoError::InvalidData(format!("entries.reminder_minutes: {err}")))?;

    let entry = Entry {
        id,
        kind,
        title: row.get("title")?,
        content: row.get("content")?,
        category: row.get("category")?,
        target_date: parse_date_column(row, "target_date")?,
        target_time: row.get("target_time")?,
        end_date: parse_date_column(row, "end_date")?,
        location: row.get("location")?,
        recurrence,
        reminder_minutes,
        status,
    };
    entry.validate()?;
    Ok(entry)
}

fn parse_date_column(row: &Row<'_>, column: &str) -> RepoResult<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(column)? {
        Some(text) => NaiveDate::parse_from_str(&text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                RepoError::InvalidData(format!("invalid date `{text}` in entries.{column}"))
            }),
        None => Ok(None),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
