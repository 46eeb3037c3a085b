//! Route handlers.
//!
//! # Responsibility
//! - Parse path/query/body input into core types.
//! - Call the custody engine inline and the entry/calendar services on the
//!   blocking pool.
//!
//! # Invariants
//! - Malformed input is a 4xx, never silently defaulted.
//! - One SQLite connection per request; none is shared across tasks.

use crate::error::{ApiError, ApiErrorCode};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use ourjourney_core::db::open_db;
use ourjourney_core::{
    assignment_for_date, assignments_for_range, next_free_evenings_for, parse_civil_date,
    CalendarService, CreateEntryRequest, DayAssignment, DayView, Entry, EntryListQuery,
    EntryPatch, EntryService, EntryStatus, EntryType, FreeEvening, MonthView, Recurrence,
    ScheduleEventRequest, SqliteEntryRepository,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub async fn healthz() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": ourjourney_core::core_version(),
    }))
}

pub async fn custody_status(Path(date): Path<String>) -> Result<Json<DayAssignment>, ApiError> {
    let date = parse_civil_date(&date)?;
    Ok(Json(assignment_for_date(date)))
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

pub async fn custody_range(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Vec<DayAssignment>>, ApiError> {
    let start = required_date("start", params.start.as_deref())?;
    let end = required_date("end", params.end.as_deref())?;

    let max_days = i64::from(state.config.custody.max_range_days);
    if end >= start && (end - start).num_days() + 1 > max_days {
        return Err(ApiError::new(
            ApiErrorCode::RangeTooLarge,
            format!("range {start}..={end} exceeds {max_days} days"),
        ));
    }

    Ok(Json(assignments_for_range(start, end)?))
}

#[derive(Debug, Default, Deserialize)]
pub struct FreeEveningParams {
    pub from: Option<String>,
    pub count: Option<String>,
}

pub async fn next_date_nights(
    State(state): State<AppState>,
    Query(params): Query<FreeEveningParams>,
) -> Result<Json<Vec<FreeEvening>>, ApiError> {
    let custody = &state.config.custody;
    let from = match params.from.as_deref() {
        Some(raw) => parse_civil_date(raw)?,
        None => today(),
    };
    let count = match params.count.as_deref() {
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => value,
            _ => return Err(ApiError::invalid_parameter("count", raw)),
        },
        None => custody.default_count,
    };

    Ok(Json(next_free_evenings_for(
        custody.side,
        from,
        count,
        custody.horizon_days,
    )))
}

pub async fn calendar_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(String, String)>,
) -> Result<Json<MonthView>, ApiError> {
    let year = year
        .trim()
        .parse::<i32>()
        .map_err(|_| ApiError::invalid_parameter("year", &year))?;
    let month = month
        .trim()
        .parse::<u32>()
        .map_err(|_| ApiError::invalid_parameter("month", &month))?;

    let view = with_repo(&state, move |repo| {
        CalendarService::new(repo).month_view(year, month)
    })
    .await?;
    Ok(Json(view))
}

pub async fn calendar_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayView>, ApiError> {
    let date = parse_civil_date(&date)?;
    let view = with_repo(&state, move |repo| CalendarService::new(repo).day_view(date)).await?;
    Ok(Json(view))
}

/// Body of `POST /api/calendar/event`. Accepts camelCase and snake_case keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventBody {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(alias = "target_date")]
    pub target_date: String,
    #[serde(default, alias = "target_time")]
    pub target_time: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default, alias = "reminder_minutes")]
    pub reminder_minutes: Option<u32>,
}

pub async fn create_calendar_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventBody>, JsonRejection>,
) -> Result<Json<Entry>, ApiError> {
    let Json(body) = payload.map_err(json_rejection)?;

    let request = ScheduleEventRequest {
        title: body.title,
        content: body.content,
        target_date: parse_civil_date(&body.target_date)?,
        target_time: body.target_time,
        end_date: body.end_date.as_deref().map(parse_civil_date).transpose()?,
        location: body.location,
        recurrence: body.recurrence,
        reminder_minutes: body.reminder_minutes,
    };

    let entry = with_repo(&state, move |repo| {
        CalendarService::new(repo).schedule_event(&request)
    })
    .await?;
    Ok(Json(entry))
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryListParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub limit: Option<String>,
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<EntryListParams>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let query = EntryListQuery {
        kind: params
            .kind
            .as_deref()
            .map(|raw| {
                EntryType::parse(raw).ok_or_else(|| ApiError::invalid_parameter("type", raw))
            })
            .transpose()?,
        status: params
            .status
            .as_deref()
            .map(|raw| {
                EntryStatus::parse(raw).ok_or_else(|| ApiError::invalid_parameter("status", raw))
            })
            .transpose()?,
        category: params.category,
        limit: match params.limit.as_deref() {
            Some(raw) => match raw.parse::<u32>() {
                Ok(value) if value > 0 => Some(value),
                _ => return Err(ApiError::invalid_parameter("limit", raw)),
            },
            None => None,
        },
    };

    let listed =
        with_repo(&state, move |repo| EntryService::new(repo).list_entries(&query)).await?;
    Ok(Json(listed.items))
}

/// Body of `POST /api/entries`. Accepts camelCase and snake_case keys.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEntryBody {
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "target_date")]
    pub target_date: Option<String>,
    #[serde(default, alias = "target_time")]
    pub target_time: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default, alias = "reminder_minutes")]
    pub reminder_minutes: Option<u32>,
}

pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<CreateEntryBody>, JsonRejection>,
) -> Result<Json<Entry>, ApiError> {
    let Json(body) = payload.map_err(json_rejection)?;

    let request = CreateEntryRequest {
        kind: body.kind,
        title: body.title,
        content: body.content,
        category: body.category,
        target_date: optional_date(body.target_date.as_deref())?,
        target_time: body.target_time,
        end_date: optional_date(body.end_date.as_deref())?,
        location: body.location,
        recurrence: body.recurrence,
        reminder_minutes: body.reminder_minutes,
    };

    let entry =
        with_repo(&state, move |repo| EntryService::new(repo).create_entry(&request)).await?;
    Ok(Json(entry))
}

/// Body of `PUT /api/entries/:id`. Absent or `null` fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEntryBody {
    #[serde(default, rename = "type")]
    pub kind: Option<EntryType>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, alias = "target_date")]
    pub target_date: Option<String>,
    #[serde(default, alias = "target_time")]
    pub target_time: Option<String>,
    #[serde(default, alias = "end_date")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default, alias = "reminder_minutes")]
    pub reminder_minutes: Option<u32>,
    #[serde(default)]
    pub status: Option<EntryStatus>,
}

pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEntryBody>, JsonRejection>,
) -> Result<Json<Entry>, ApiError> {
    let id = parse_entry_id(&id)?;
    let Json(body) = payload.map_err(json_rejection)?;

    let patch = EntryPatch {
        kind: body.kind,
        title: body.title,
        content: body.content,
        category: body.category,
        target_date: optional_date(body.target_date.as_deref())?,
        target_time: body.target_time,
        end_date: optional_date(body.end_date.as_deref())?,
        location: body.location,
        recurrence: body.recurrence,
        reminder_minutes: body.reminder_minutes,
        status: body.status,
    };

    let entry = with_repo(&state, move |repo| {
        EntryService::new(repo).update_entry(id, &patch)
    })
    .await?;
    Ok(Json(entry))
}

pub async fn complete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Entry>, ApiError> {
    let id = parse_entry_id(&id)?;
    let entry = with_repo(&state, move |repo| EntryService::new(repo).complete_entry(id)).await?;
    Ok(Json(entry))
}

fn required_date(name: &str, value: Option<&str>) -> Result<NaiveDate, ApiError> {
    match value {
        Some(raw) => Ok(parse_civil_date(raw)?),
        None => Err(ApiError::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("missing `{name}`"),
        )),
    }
}

fn optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    Ok(value.map(parse_civil_date).transpose()?)
}

fn parse_entry_id(value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| ApiError::invalid_parameter("id", value))
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::new(ApiErrorCode::ValidationFailed, rejection.body_text())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Runs `f` on the blocking pool against a fresh journal connection.
async fn with_repo<T, E, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    E: Into<ApiError>,
    F: FnOnce(SqliteEntryRepository<'_>) -> Result<T, E> + Send + 'static,
{
    let db_path = state.config.db_path.clone();
    tokio::task::spawn_blocking(move || {
        let conn = open_db(&db_path)
            .map_err(|err| ApiError::internal(format!("journal DB open failed: {err}")))?;
        f(SqliteEntryRepository::new(&conn)).map_err(Into::into)
    })
    .await
    .map_err(|err| ApiError::internal(format!("blocking task failed: {err}")))?
}
