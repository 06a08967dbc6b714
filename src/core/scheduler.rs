//! Meeting scheduler.
//!
//! Checks a meeting request against a snapshot of the babysitter's
//! connections, windows and meetings. The caller is responsible for taking
//! the snapshot and committing the result under the same lock.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::approval::require_approved;
use crate::core::error::{Conflict, ScheduleError};
use crate::core::interval::Interval;
use crate::models::{AvailabilityWindow, BookableInterval, ConnectionRequest, Meeting, MeetingStatus};

/// A family asking a babysitter for `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeetingRequest {
    pub family_id: Uuid,
    pub babysitter_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval for MeetingRequest {
    fn start(&self) -> DateTime<Utc> {
        self.start
    }
    fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Store rows the scheduler decides on
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingSnapshot<'a> {
    pub connections: &'a [ConnectionRequest],
    pub windows: &'a [AvailabilityWindow],
    pub meetings: &'a [Meeting],
}

pub fn validate_interval<I: Interval + ?Sized>(span: &I) -> Result<(), ScheduleError> {
    if span.is_valid() {
        Ok(())
    } else {
        Err(ScheduleError::invalid_interval())
    }
}

/// The span must fit inside one declared window; coverage stitched
/// together from several windows does not count.
pub fn check_available<I: Interval + ?Sized>(
    span: &I,
    windows: &[AvailabilityWindow],
) -> Result<(), ScheduleError> {
    if windows.iter().any(|w| w.covers(span)) {
        Ok(())
    } else {
        Err(Conflict::NotAvailable.into())
    }
}

/// Fails if any approved meeting other than `ignore` intersects the span
pub fn check_not_busy<I: Interval + ?Sized>(
    span: &I,
    meetings: &[Meeting],
    ignore: Option<Uuid>,
) -> Result<(), ScheduleError> {
    let clash = meetings
        .iter()
        .filter(|m| m.is_approved() && Some(m.id) != ignore)
        .find(|m| m.overlaps(span));

    match clash {
        Some(existing) => {
            tracing::debug!(
                "Requested span {:?} clashes with approved meeting {}",
                BookableInterval::of(span),
                existing.id
            );
            Err(Conflict::Busy.into())
        }
        None => Ok(()),
    }
}

/// Validate a meeting request and build the pending meeting to store.
///
/// Checks run in a fixed order and the first failure wins:
/// 1. `start < end`
/// 2. approved connection between the pair
/// 3. a single window covers the span
/// 4. no approved meeting overlaps the span
pub fn request_meeting(
    request: &MeetingRequest,
    snapshot: &BookingSnapshot<'_>,
) -> Result<Meeting, ScheduleError> {
    validate_interval(request)?;
    require_approved(snapshot.connections, request.babysitter_id, request.family_id)?;
    check_available(request, snapshot.windows)?;
    check_not_busy(request, snapshot.meetings, None)?;

    Ok(Meeting::pending(
        request.babysitter_id,
        request.family_id,
        request.start,
        request.end,
    ))
}

/// Allowed status changes: `pending -> approved` and `pending -> declined`.
pub fn transition(from: MeetingStatus, to: MeetingStatus) -> Result<MeetingStatus, ScheduleError> {
    match (from, to) {
        (MeetingStatus::Pending, MeetingStatus::Approved | MeetingStatus::Declined) => Ok(to),
        _ => Err(ScheduleError::InvalidTransition { from, to }),
    }
}

/// Apply a status change, re-checking for clashes when approving.
///
/// `others` are the babysitter's meetings as currently stored; the meeting
/// being answered may appear among them and is skipped.
pub fn answer_meeting(
    meeting: &Meeting,
    to: MeetingStatus,
    others: &[Meeting],
) -> Result<MeetingStatus, ScheduleError> {
    let next = transition(meeting.status, to)?;
    if next == MeetingStatus::Approved {
        check_not_busy(meeting, others, Some(meeting.id))?;
    }
    Ok(next)
}
