use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle of a meeting between a family and a babysitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "meeting_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Pending,
    Approved,
    Declined,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Pending => "pending",
            MeetingStatus::Approved => "approved",
            MeetingStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a connection request sent by a family to a babysitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Declined,
}

/// Open time span declared by a babysitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AvailabilityWindow {
    pub id: Uuid,
    pub babysitter_id: Uuid,
    #[sqlx(rename = "start_time")]
    pub start: DateTime<Utc>,
    #[sqlx(rename = "end_time")]
    pub end: DateTime<Utc>,
}

/// Meeting requested by a family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Meeting {
    pub id: Uuid,
    pub babysitter_id: Uuid,
    pub family_id: Uuid,
    #[sqlx(rename = "start_time")]
    pub start: DateTime<Utc>,
    #[sqlx(rename = "end_time")]
    pub end: DateTime<Utc>,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
}

impl Meeting {
    /// A freshly requested meeting, not yet answered by the babysitter
    pub fn pending(
        babysitter_id: Uuid,
        family_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            babysitter_id,
            family_id,
            start,
            end,
            status: MeetingStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == MeetingStatus::Approved
    }
}

/// Connection between a family and a babysitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConnectionRequest {
    pub id: Uuid,
    pub babysitter_id: Uuid,
    pub family_id: Uuid,
    pub status: RequestStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Free sub-span of an availability window, derived on every query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookableInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Full babysitter profile, visible to its owner
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BabysitterProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub age: i32,
    pub address: String,
    pub hourly_rate_cents: i64,
    pub description: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

/// Babysitter as shown to families browsing the marketplace
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BabysitterListing {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub address: String,
    pub hourly_rate_cents: i64,
    pub description: String,
}

/// Family profile, visible to its owner
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParentProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dad_name: String,
    pub mom_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub kids: Vec<Kid>,
}

/// Family as shown to babysitters
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FamilyListing {
    pub id: Uuid,
    pub dad_name: String,
    pub mom_name: String,
    pub last_name: String,
    pub address: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub kids: Vec<Kid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Kid {
    pub id: Uuid,
    pub family_id: Uuid,
    pub name: String,
    pub age: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub babysitter_id: Uuid,
    pub family_id: Uuid,
    pub review_text: String,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}
