use thiserror::Error;

use crate::models::MeetingStatus;

/// Why a requested time span cannot be booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Conflict {
    /// No single availability window covers the requested span
    #[error("not available")]
    NotAvailable,

    /// An approved meeting already occupies part of the span
    #[error("busy")]
    Busy,
}

/// Errors raised by the scheduling core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(#[from] Conflict),

    #[error("Meeting status cannot change from {from} to {to}")]
    InvalidTransition {
        from: MeetingStatus,
        to: MeetingStatus,
    },
}

impl ScheduleError {
    pub fn invalid_interval() -> Self {
        ScheduleError::Validation("invalid interval".to_string())
    }

    pub fn not_connected() -> Self {
        ScheduleError::Authorization(
            "no approved connection between this family and babysitter".to_string(),
        )
    }
}
