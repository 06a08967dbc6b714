//! Mapping of store and scheduling errors onto HTTP responses.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::core::{AccessDenied, Conflict, ScheduleError};
use crate::models::ErrorResponse;
use crate::services::PostgresError;

/// Error returned by every handler
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed caller identity
    Unauthenticated(String),
    Validation(String),
    Forbidden(String),
    NotFound(String),
    /// Duplicate records and refused state changes
    Conflict(String),
    Schedule(ScheduleError),
    /// Details are logged, never returned
    Internal(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::Validation(_) => "validation_error",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Schedule(ScheduleError::Validation(_)) => "validation_error",
            ApiError::Schedule(ScheduleError::Authorization(_)) => "forbidden",
            ApiError::Schedule(ScheduleError::Conflict(Conflict::NotAvailable)) => "not_available",
            ApiError::Schedule(ScheduleError::Conflict(Conflict::Busy)) => "busy",
            ApiError::Schedule(ScheduleError::InvalidTransition { .. }) => "invalid_transition",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Unauthenticated(m)
            | ApiError::Validation(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m) => m.clone(),
            ApiError::Schedule(e) => e.to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Schedule(e) => match e {
                ScheduleError::Validation(_) => StatusCode::BAD_REQUEST,
                ScheduleError::Authorization(_) => StatusCode::FORBIDDEN,
                ScheduleError::Conflict(Conflict::NotAvailable) => StatusCode::NOT_FOUND,
                ScheduleError::Conflict(Conflict::Busy) => StatusCode::BAD_REQUEST,
                ScheduleError::InvalidTransition { .. } => StatusCode::CONFLICT,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.message(),
            status_code: status.as_u16(),
        })
    }
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        ApiError::Schedule(err)
    }
}

impl From<AccessDenied> for ApiError {
    fn from(err: AccessDenied) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl From<PostgresError> for ApiError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Schedule(e) => ApiError::Schedule(e),
            PostgresError::Access(e) => e.into(),
            PostgresError::NotFound(m) => ApiError::NotFound(m),
            PostgresError::Duplicate(m) => ApiError::Conflict(m),
            PostgresError::InvalidInput(m) => ApiError::Validation(m),
            other => {
                tracing::error!("Store failure: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}
