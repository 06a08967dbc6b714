//! Connection approval gate.
//!
//! A family may see a babysitter's bookable time, book a meeting, or write a
//! review only over an approved, active connection request.

use uuid::Uuid;

use crate::core::error::ScheduleError;
use crate::models::{ConnectionRequest, RequestStatus};

#[inline]
pub fn is_approved_connection(request: &ConnectionRequest) -> bool {
    request.status == RequestStatus::Approved && request.is_active
}

/// True iff an approved, active request exists for the pair.
///
/// Absence of any request is simply `false`.
pub fn is_approved(connections: &[ConnectionRequest], babysitter_id: Uuid, family_id: Uuid) -> bool {
    connections.iter().any(|r| {
        r.babysitter_id == babysitter_id && r.family_id == family_id && is_approved_connection(r)
    })
}

pub fn require_approved(
    connections: &[ConnectionRequest],
    babysitter_id: Uuid,
    family_id: Uuid,
) -> Result<(), ScheduleError> {
    if is_approved(connections, babysitter_id, family_id) {
        Ok(())
    } else {
        Err(ScheduleError::not_connected())
    }
}

/// A family may open at most one request per babysitter, ever.
///
/// Declined or deactivated requests still count.
pub fn can_open_request(existing: &[ConnectionRequest], babysitter_id: Uuid, family_id: Uuid) -> bool {
    !existing
        .iter()
        .any(|r| r.babysitter_id == babysitter_id && r.family_id == family_id)
}
