//! HTTP error envelope.
//!
//! Every failure is rendered as `{"error": {"code": …, "message": …}}` with a
//! status derived from the code. Client input problems are always 4xx.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use ourjourney_core::{CalendarServiceError, EntryServiceError, RepoError, ScheduleError};
use serde::Serialize;
use serde_json::json;

/// Machine-readable error kinds exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    InvalidDate,
    InvalidRange,
    InvalidQueryParameter,
    RangeTooLarge,
    ValidationFailed,
    NotFound,
    Internal,
}

impl ApiErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidDate
            | Self::InvalidRange
            | Self::InvalidQueryParameter
            | Self::RangeTooLarge
            | Self::ValidationFailed => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_parameter(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidQueryParameter,
            format!("invalid value `{value}` for `{name}`"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message)
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        let code = match &value {
            ScheduleError::InvalidRange { .. } => ApiErrorCode::InvalidRange,
            ScheduleError::InvalidDate(_) => ApiErrorCode::InvalidDate,
        };
        Self::new(code, value.to_string())
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::new(ApiErrorCode::ValidationFailed, err.to_string()),
            RepoError::NotFound(id) => {
                Self::new(ApiErrorCode::NotFound, format!("entry not found: {id}"))
            }
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<CalendarServiceError> for ApiError {
    fn from(value: CalendarServiceError) -> Self {
        match value {
            CalendarServiceError::Schedule(err) => err.into(),
            CalendarServiceError::Repo(err) => err.into(),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<EntryServiceError> for ApiError {
    fn from(value: EntryServiceError) -> Self {
        match value {
            EntryServiceError::EntryNotFound(id) => RepoError::NotFound(id).into(),
            EntryServiceError::Repo(err) => err.into(),
            other => Self::internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            error!(
                "event=http_error module=server status=error code={:?} error={}",
                self.code, self.message
            );
        } else {
            warn!(
                "event=http_error module=server status=rejected code={:?}",
                self.code
            );
        }
        (status, Json(json!({ "error": self }))).into_response()
    }
}
