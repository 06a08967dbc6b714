//! Nanny Hub - scheduling backend for a babysitting marketplace
//!
//! Families connect with babysitters, browse their bookable time and request
//! meetings. The scheduling rules live in [`core`] and never touch I/O; the
//! [`services`] layer composes them with PostgreSQL and [`routes`] exposes
//! them over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{bookable_intervals, request_meeting, Conflict, Interval, Role, ScheduleError};
pub use models::{AvailabilityWindow, BookableInterval, Meeting, MeetingStatus};
