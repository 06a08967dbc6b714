use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseSettings;
use crate::core::{AccessDenied, Conflict, ScheduleError};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Access(#[from] AccessDenied),
}

impl PostgresError {
    pub fn not_found(entity: &str) -> Self {
        PostgresError::NotFound(format!("{} does not exist", entity))
    }
}

/// Map constraint violations onto domain errors; anything else stays a SQLx error
pub(crate) fn classify(err: sqlx::Error, entity: &str) -> PostgresError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            // unique_violation
            Some("23505") => return PostgresError::Duplicate(format!("{} already exists", entity)),
            // exclusion_violation: overlapping approved meetings
            Some("23P01") => return ScheduleError::from(Conflict::Busy).into(),
            // check_violation
            Some("23514") => return PostgresError::InvalidInput(db.message().to_string()),
            _ => {}
        }
    }
    err.into()
}

/// PostgreSQL-backed entity store
///
/// Holds every marketplace record. Each operation re-reads what it needs;
/// schedule writes for one babysitter are serialised by locking the
/// babysitter's row inside the writing transaction.
pub struct PostgresClient {
    pub(crate) pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, PostgresError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections)",
            settings.max_connections.unwrap_or(10)
        );

        Self::new(
            &settings.url,
            settings.max_connections.unwrap_or(10),
            settings.min_connections.unwrap_or(1),
            Duration::from_secs(settings.acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(settings.idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Take the row lock that serialises schedule writes for one babysitter.
///
/// Returns `false` when the babysitter does not exist.
pub(crate) async fn lock_babysitter(
    tx: &mut Transaction<'_, Postgres>,
    babysitter_id: Uuid,
) -> Result<bool, PostgresError> {
    let row = sqlx::query("SELECT id FROM babysitters WHERE id = $1 FOR UPDATE")
        .bind(babysitter_id)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(row.is_some())
}
