// Core scheduling exports
pub mod access;
pub mod approval;
pub mod availability;
pub mod error;
pub mod interval;
pub mod scheduler;

pub use access::{AccessDenied, Role};
pub use approval::{can_open_request, is_approved, is_approved_connection};
pub use availability::{bookable_intervals, merge_overlapping, BookableIntervals, Reconciliation};
pub use error::{Conflict, ScheduleError};
pub use interval::{merge_spans, Interval};
pub use scheduler::{answer_meeting, request_meeting, transition, BookingSnapshot, MeetingRequest};
