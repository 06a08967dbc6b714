//! Meeting booking and answering.
//!
//! Both writes lock the babysitter's row first, so the checks made by the
//! scheduler and the write that follows them see the same schedule.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::access::{ensure, is_meeting_party, is_meeting_target};
use crate::core::scheduler::{self, BookingSnapshot, MeetingRequest};
use crate::core::{Role, ScheduleError};
use crate::models::{Meeting, MeetingStatus};
use crate::services::availability::{fetch_approved_meetings, fetch_windows, MEETING_COLUMNS};
use crate::services::connections::fetch_pair;
use crate::services::postgres::{classify, lock_babysitter, PostgresClient, PostgresError};

impl PostgresClient {
    /// Request a meeting with a babysitter on behalf of a family.
    ///
    /// On success exactly one pending meeting is stored; on any failed check
    /// the transaction is rolled back and nothing is written.
    pub async fn request_meeting(
        &self,
        family_id: Uuid,
        babysitter_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Meeting, PostgresError> {
        let request = MeetingRequest {
            family_id,
            babysitter_id,
            start,
            end,
        };
        scheduler::validate_interval(&request)?;

        let mut tx = self.pool.begin().await?;

        // An unknown babysitter cannot have approved anyone
        if !lock_babysitter(&mut tx, babysitter_id).await? {
            return Err(ScheduleError::not_connected().into());
        }

        let connections = fetch_pair(&mut *tx, babysitter_id, family_id).await?;
        let windows = fetch_windows(&mut *tx, babysitter_id).await?;
        let meetings = fetch_approved_meetings(&mut *tx, babysitter_id).await?;

        let snapshot = BookingSnapshot {
            connections: &connections,
            windows: &windows,
            meetings: &meetings,
        };
        let meeting = match scheduler::request_meeting(&request, &snapshot) {
            Ok(meeting) => meeting,
            Err(e) => {
                tracing::info!(
                    "Meeting request from family {} to babysitter {} rejected: {}",
                    family_id,
                    babysitter_id,
                    e
                );
                return Err(e.into());
            }
        };

        sqlx::query(
            r#"
            INSERT INTO meetings (id, babysitter_id, family_id, start_time, end_time, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(meeting.id)
        .bind(meeting.babysitter_id)
        .bind(meeting.family_id)
        .bind(meeting.start)
        .bind(meeting.end)
        .bind(meeting.status)
        .bind(meeting.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| classify(e, "Meeting"))?;

        tx.commit().await?;

        tracing::info!(
            "Family {} requested meeting {} with babysitter {} ({} - {})",
            family_id,
            meeting.id,
            babysitter_id,
            meeting.start,
            meeting.end
        );
        Ok(meeting)
    }

    /// Meetings the caller takes part in, newest first
    pub async fn list_meetings(&self, role: &Role) -> Result<Vec<Meeting>, PostgresError> {
        let (column, id) = match role {
            Role::Parent(id) => ("family_id", *id),
            Role::Babysitter(id) => ("babysitter_id", *id),
        };

        let meetings = sqlx::query_as(&format!(
            "SELECT {} FROM meetings WHERE {} = $1 ORDER BY start_time DESC",
            MEETING_COLUMNS, column
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(meetings)
    }

    /// One meeting, visible to the babysitter and the family it involves
    pub async fn get_meeting(&self, role: &Role, meeting_id: Uuid) -> Result<Meeting, PostgresError> {
        let meeting: Meeting = sqlx::query_as(&format!(
            "SELECT {} FROM meetings WHERE id = $1",
            MEETING_COLUMNS
        ))
        .bind(meeting_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PostgresError::not_found("Meeting"))?;

        ensure(is_meeting_party(role, &meeting), "meeting")?;
        Ok(meeting)
    }

    /// Approve or decline a pending meeting; only its babysitter may answer
    pub async fn answer_meeting(
        &self,
        role: &Role,
        meeting_id: Uuid,
        status: MeetingStatus,
    ) -> Result<Meeting, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let meeting: Meeting = sqlx::query_as(&format!(
            "SELECT {} FROM meetings WHERE id = $1",
            MEETING_COLUMNS
        ))
        .bind(meeting_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| PostgresError::not_found("Meeting"))?;

        ensure(is_meeting_target(role, &meeting), "meeting")?;

        lock_babysitter(&mut tx, meeting.babysitter_id).await?;

        // Re-read under the lock: another answer may have landed meanwhile
        let meeting: Meeting = sqlx::query_as(&format!(
            "SELECT {} FROM meetings WHERE id = $1 FOR UPDATE",
            MEETING_COLUMNS
        ))
        .bind(meeting_id)
        .fetch_one(&mut *tx)
        .await?;

        let approved = fetch_approved_meetings(&mut *tx, meeting.babysitter_id).await?;
        let next = scheduler::answer_meeting(&meeting, status, &approved)?;

        let updated: Meeting = sqlx::query_as(&format!(
            "UPDATE meetings SET status = $2 WHERE id = $1 RETURNING {}",
            MEETING_COLUMNS
        ))
        .bind(meeting_id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify(e, "Meeting"))?;

        tx.commit().await?;

        tracing::info!("Meeting {} is now {}", meeting_id, next);
        Ok(updated)
    }
}
