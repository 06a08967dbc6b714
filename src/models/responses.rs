use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{BabysitterProfile, BookableInterval, ParentProfile};

/// Response for the bookable availability endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub babysitter_id: Uuid,
    pub intervals: Vec<BookableInterval>,
    pub merged: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Plain acknowledgement for operations without a body to return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The caller's own profile, whichever role they hold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "user_type", content = "profile")]
pub enum ProfileResponse {
    Babysitter(BabysitterProfile),
    Parent(ParentProfile),
}
