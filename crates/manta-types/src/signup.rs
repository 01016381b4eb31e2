//! Signup types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EventId, MemberId};

/// Unique signup identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignupId(pub Uuid);

impl SignupId {
    /// Create a new random signup ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SignupId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SignupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SignupId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A member's reservation on an event
///
/// Unique per (member, event); created and deleted only by the reservation
/// transaction manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signup {
    /// Signup ID
    pub id: SignupId,
    /// Booking member
    pub member_id: MemberId,
    /// Booked event
    pub event_id: EventId,
    /// When the booking was made
    pub created_at: DateTime<Utc>,
}
