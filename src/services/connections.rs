//! Connection requests between families and babysitters.

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::core::access::{ensure, is_request_party, is_request_target};
use crate::core::{approval, Role};
use crate::models::{ConnectionRequest, RequestStatus};
use crate::services::postgres::{classify, PostgresClient, PostgresError};

const REQUEST_COLUMNS: &str =
    "id, babysitter_id, family_id, status, is_active, created_at, updated_at";

/// All requests between one babysitter and one family (at most one in practice)
pub(crate) async fn fetch_pair<'e, E: PgExecutor<'e>>(
    executor: E,
    babysitter_id: Uuid,
    family_id: Uuid,
) -> Result<Vec<ConnectionRequest>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {} FROM connection_requests WHERE babysitter_id = $1 AND family_id = $2",
        REQUEST_COLUMNS
    ))
    .bind(babysitter_id)
    .bind(family_id)
    .fetch_all(executor)
    .await
}

impl PostgresClient {
    /// Open a request from a family to a babysitter.
    ///
    /// Rejected when any request already exists for the pair, whatever its
    /// status or activity.
    pub async fn create_request(
        &self,
        family_id: Uuid,
        babysitter_id: Uuid,
    ) -> Result<ConnectionRequest, PostgresError> {
        if !self.babysitter_exists(babysitter_id).await? {
            return Err(PostgresError::not_found("Babysitter"));
        }

        let existing = fetch_pair(&self.pool, babysitter_id, family_id).await?;
        if !approval::can_open_request(&existing, babysitter_id, family_id) {
            tracing::info!(
                "Rejecting duplicate request from family {} to babysitter {}",
                family_id,
                babysitter_id
            );
            return Err(PostgresError::Duplicate("request already exists".to_string()));
        }

        // The unique (babysitter_id, family_id) index catches concurrent duplicates
        let request: ConnectionRequest = sqlx::query_as(&format!(
            r#"
            INSERT INTO connection_requests (id, babysitter_id, family_id)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(babysitter_id)
        .bind(family_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "Request"))?;

        tracing::info!("Family {} sent request {} to babysitter {}", family_id, request.id, babysitter_id);
        Ok(request)
    }

    /// Requests sent by a family, or received by a babysitter
    pub async fn list_requests(&self, role: &Role) -> Result<Vec<ConnectionRequest>, PostgresError> {
        let (column, id) = match role {
            Role::Parent(id) => ("family_id", *id),
            Role::Babysitter(id) => ("babysitter_id", *id),
        };

        let requests = sqlx::query_as(&format!(
            "SELECT {} FROM connection_requests WHERE {} = $1 ORDER BY created_at DESC",
            REQUEST_COLUMNS, column
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn get_request(&self, request_id: Uuid) -> Result<ConnectionRequest, PostgresError> {
        sqlx::query_as(&format!(
            "SELECT {} FROM connection_requests WHERE id = $1",
            REQUEST_COLUMNS
        ))
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| PostgresError::not_found("Request"))
    }

    /// Approve or decline a request; only its babysitter may answer
    pub async fn set_request_status(
        &self,
        role: &Role,
        request_id: Uuid,
        status: RequestStatus,
    ) -> Result<ConnectionRequest, PostgresError> {
        let request = self.get_request(request_id).await?;
        ensure(is_request_target(role, &request), "request")?;

        let updated: ConnectionRequest = sqlx::query_as(&format!(
            r#"
            UPDATE connection_requests
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        ))
        .bind(request_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Request {} is now {:?}", request_id, status);
        Ok(updated)
    }

    /// Activate or deactivate a request; either side of the pair may do so
    pub async fn set_request_active(
        &self,
        role: &Role,
        request_id: Uuid,
        is_active: bool,
    ) -> Result<ConnectionRequest, PostgresError> {
        let request = self.get_request(request_id).await?;
        ensure(is_request_party(role, &request), "request")?;

        let updated: ConnectionRequest = sqlx::query_as(&format!(
            r#"
            UPDATE connection_requests
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        ))
        .bind(request_id)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Request {} active = {}", request_id, is_active);
        Ok(updated)
    }

    /// Connection approval gate backed by the store
    pub async fn is_approved(&self, babysitter_id: Uuid, family_id: Uuid) -> Result<bool, PostgresError> {
        let pair = fetch_pair(&self.pool, babysitter_id, family_id).await?;
        Ok(approval::is_approved(&pair, babysitter_id, family_id))
    }
}
