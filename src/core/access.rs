//! Role and ownership predicates shared by every operation.
//!
//! A caller's [`Role`] is resolved once when the request enters the service
//! and then passed explicitly. Nothing here performs I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AvailabilityWindow, ConnectionRequest, Kid, Meeting, Review};

/// Who is making the call, carrying the id of their profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Role {
    /// Family id
    Parent(Uuid),
    /// Babysitter id
    Babysitter(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Only parents may {0}")]
    NotParent(&'static str),

    #[error("Only babysitters may {0}")]
    NotBabysitter(&'static str),

    #[error("You do not have permission to modify this {0}")]
    NotOwner(&'static str),
}

impl Role {
    /// Family id of a parent caller
    pub fn require_parent(&self, action: &'static str) -> Result<Uuid, AccessDenied> {
        match self {
            Role::Parent(id) => Ok(*id),
            Role::Babysitter(_) => Err(AccessDenied::NotParent(action)),
        }
    }

    /// Babysitter id of a babysitter caller
    pub fn require_babysitter(&self, action: &'static str) -> Result<Uuid, AccessDenied> {
        match self {
            Role::Babysitter(id) => Ok(*id),
            Role::Parent(_) => Err(AccessDenied::NotBabysitter(action)),
        }
    }

    fn is_babysitter_id(&self, babysitter_id: Uuid) -> bool {
        *self == Role::Babysitter(babysitter_id)
    }

    fn is_family_id(&self, family_id: Uuid) -> bool {
        *self == Role::Parent(family_id)
    }
}

pub fn owns_window(role: &Role, window: &AvailabilityWindow) -> bool {
    role.is_babysitter_id(window.babysitter_id)
}

pub fn owns_review(role: &Role, review: &Review) -> bool {
    role.is_family_id(review.family_id)
}

pub fn owns_kid(role: &Role, kid: &Kid) -> bool {
    role.is_family_id(kid.family_id)
}

/// Only the babysitter a meeting was requested from may answer it
pub fn is_meeting_target(role: &Role, meeting: &Meeting) -> bool {
    role.is_babysitter_id(meeting.babysitter_id)
}

pub fn is_meeting_party(role: &Role, meeting: &Meeting) -> bool {
    role.is_babysitter_id(meeting.babysitter_id) || role.is_family_id(meeting.family_id)
}

pub fn is_request_target(role: &Role, request: &ConnectionRequest) -> bool {
    role.is_babysitter_id(request.babysitter_id)
}

pub fn is_request_party(role: &Role, request: &ConnectionRequest) -> bool {
    role.is_babysitter_id(request.babysitter_id) || role.is_family_id(request.family_id)
}

/// Turn a failed ownership predicate into an error naming the record kind
#[inline]
pub fn ensure(allowed: bool, record: &'static str) -> Result<(), AccessDenied> {
    if allowed {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner(record))
    }
}
