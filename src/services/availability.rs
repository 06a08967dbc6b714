//! Availability windows and the bookable projection over them.

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::core::access::{ensure, owns_window};
use crate::core::availability::{merge_overlapping, Reconciliation};
use crate::core::scheduler::validate_interval;
use crate::core::Role;
use crate::models::{AvailabilityWindow, BookableInterval, Meeting, NewWindow, WindowPatch};
use crate::services::postgres::{classify, PostgresClient, PostgresError};

const WINDOW_COLUMNS: &str = "id, babysitter_id, start_time, end_time";
pub(crate) const MEETING_COLUMNS: &str = "id, babysitter_id, family_id, start_time, end_time, status, created_at";

/// A babysitter's windows in chronological order
pub(crate) async fn fetch_windows<'e, E: PgExecutor<'e>>(
    executor: E,
    babysitter_id: Uuid,
) -> Result<Vec<AvailabilityWindow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {} FROM availability_windows WHERE babysitter_id = $1 ORDER BY start_time, id",
        WINDOW_COLUMNS
    ))
    .bind(babysitter_id)
    .fetch_all(executor)
    .await
}

/// A babysitter's approved meetings, the only ones that occupy time
pub(crate) async fn fetch_approved_meetings<'e, E: PgExecutor<'e>>(
    executor: E,
    babysitter_id: Uuid,
) -> Result<Vec<Meeting>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {} FROM meetings WHERE babysitter_id = $1 AND status = 'approved' ORDER BY start_time",
        MEETING_COLUMNS
    ))
    .bind(babysitter_id)
    .fetch_all(executor)
    .await
}

impl PostgresClient {
    pub async fn create_window(
        &self,
        babysitter_id: Uuid,
        window: &NewWindow,
    ) -> Result<AvailabilityWindow, PostgresError> {
        validate_interval(&BookableInterval::new(window.start, window.end))?;

        let created: AvailabilityWindow = sqlx::query_as(&format!(
            r#"
            INSERT INTO availability_windows (id, babysitter_id, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            WINDOW_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(babysitter_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "Availability window"))?;

        tracing::info!(
            "Babysitter {} declared window {} ({} - {})",
            babysitter_id,
            created.id,
            created.start,
            created.end
        );
        Ok(created)
    }

    pub async fn list_windows(&self, babysitter_id: Uuid) -> Result<Vec<AvailabilityWindow>, PostgresError> {
        Ok(fetch_windows(&self.pool, babysitter_id).await?)
    }

    async fn get_window(&self, window_id: Uuid) -> Result<AvailabilityWindow, PostgresError> {
        sqlx::query_as(&format!(
            "SELECT {} FROM availability_windows WHERE id = $1",
            WINDOW_COLUMNS
        ))
        .bind(window_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PostgresError::not_found("Availability window"))
    }

    /// Move either end of a window the caller owns
    pub async fn update_window(
        &self,
        role: &Role,
        window_id: Uuid,
        patch: &WindowPatch,
    ) -> Result<AvailabilityWindow, PostgresError> {
        let window = self.get_window(window_id).await?;
        ensure(owns_window(role, &window), "availability")?;

        let start = patch.start.unwrap_or(window.start);
        let end = patch.end.unwrap_or(window.end);
        validate_interval(&BookableInterval::new(start, end))?;

        let updated = sqlx::query_as(&format!(
            r#"
            UPDATE availability_windows
            SET start_time = $2, end_time = $3
            WHERE id = $1
            RETURNING {}
            "#,
            WINDOW_COLUMNS
        ))
        .bind(window_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "Availability window"))?;

        Ok(updated)
    }

    pub async fn delete_window(&self, role: &Role, window_id: Uuid) -> Result<(), PostgresError> {
        let window = self.get_window(window_id).await?;
        ensure(owns_window(role, &window), "availability")?;

        sqlx::query("DELETE FROM availability_windows WHERE id = $1")
            .bind(window_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Deleted availability window {}", window_id);
        Ok(())
    }

    /// Bookable intervals of a babysitter, recomputed from current rows.
    ///
    /// Windows and meetings are read in one repeatable-read transaction so
    /// the projection sees a single consistent state.
    pub async fn bookable_intervals(
        &self,
        babysitter_id: Uuid,
        merge: bool,
    ) -> Result<Vec<BookableInterval>, PostgresError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let windows = fetch_windows(&mut *tx, babysitter_id).await?;
        let meetings = fetch_approved_meetings(&mut *tx, babysitter_id).await?;
        tx.commit().await?;

        let reconciliation = Reconciliation::new(&windows, &meetings);
        let intervals = if merge {
            merge_overlapping(reconciliation.iter())
        } else {
            reconciliation.iter().collect()
        };

        tracing::debug!(
            "Babysitter {}: {} windows, {} approved meetings, {} bookable intervals",
            babysitter_id,
            windows.len(),
            meetings.len(),
            intervals.len()
        );
        Ok(intervals)
    }
}
