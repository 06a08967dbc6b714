// Route exports
pub mod accounts;
pub mod availability;
pub mod connections;
pub mod error;
pub mod health;
pub mod identity;
pub mod meetings;
pub mod reviews;

use actix_web::web;
use std::sync::Arc;

use crate::config::SchedulingSettings;
use crate::services::PostgresClient;

pub use error::ApiError;
pub use identity::Caller;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub scheduling: SchedulingSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(accounts::configure)
            .configure(availability::configure)
            .configure(connections::configure)
            .configure(meetings::configure)
            .configure(reviews::configure),
    );
}
