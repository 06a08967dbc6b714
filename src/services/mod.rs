// Service exports
pub mod accounts;
pub mod availability;
pub mod connections;
pub mod meetings;
pub mod postgres;
pub mod reviews;

pub use postgres::{PostgresClient, PostgresError};
