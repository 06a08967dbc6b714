use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::{MeetingStatus, RequestStatus};

/// Kind of account created at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Babysitter,
    Parent,
}

/// Registration request
///
/// The profile fields required depend on `user_type`; the handler checks
/// that the matching profile block is present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub user_type: UserType,
    #[validate(nested)]
    pub babysitter: Option<NewBabysitter>,
    #[validate(nested)]
    pub parent: Option<NewParent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBabysitter {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0, max = 120))]
    pub age: i32,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(range(min = 0))]
    pub hourly_rate_cents: i64,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 15))]
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewParent {
    #[validate(length(max = 255))]
    pub dad_name: String,
    #[validate(length(max = 255))]
    pub mom_name: String,
    #[validate(length(min = 1, max = 255))]
    pub last_name: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(length(min = 1, max = 15))]
    pub phone_number: String,
}

/// Partial update of the caller's babysitter profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BabysitterPatch {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 120))]
    pub age: Option<i32>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    #[validate(range(min = 0))]
    pub hourly_rate_cents: Option<i64>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 15))]
    pub phone_number: Option<String>,
}

/// Partial update of the caller's family profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ParentPatch {
    #[validate(length(max = 255))]
    pub dad_name: Option<String>,
    #[validate(length(max = 255))]
    pub mom_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 15))]
    pub phone_number: Option<String>,
}

/// Profile update body; only the block matching the caller's role is applied
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfilePatch {
    #[validate(nested)]
    pub babysitter: Option<BabysitterPatch>,
    #[validate(nested)]
    pub parent: Option<ParentPatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewKid {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 30))]
    pub age: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct KidPatch {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 30))]
    pub age: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowPatch {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConnectionRequest {
    pub babysitter_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestStatusUpdate {
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestActiveUpdate {
    pub is_active: bool,
}

/// Meeting request sent by a family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeetingRequest {
    pub babysitter_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingStatusUpdate {
    pub status: MeetingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewReview {
    pub babysitter_id: Uuid,
    #[validate(length(min = 1))]
    pub review_text: String,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
}

fn default_rating() -> i16 {
    5
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReviewPatch {
    #[validate(length(min = 1))]
    pub review_text: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i16>,
}
