//! Group membership types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MemberId, SubscriptionId, Tier};

/// Unique group membership identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupMembershipId(pub Uuid);

impl GroupMembershipId {
    /// Create a new random group membership ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupMembershipId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GroupMembershipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for GroupMembershipId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Grant of an access tier to a member, funded by a subscription
///
/// Created alongside the subscription and inheriting its validity window
/// unless explicitly overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMembership {
    /// Membership ID
    pub id: GroupMembershipId,
    /// Member holding the grant
    pub member_id: MemberId,
    /// Subscription funding the grant
    pub subscription_id: SubscriptionId,
    /// Granted tier
    pub tier: Tier,
    /// Validity window start (inclusive)
    pub valid_from: NaiveDate,
    /// Validity window end (exclusive)
    pub valid_to: NaiveDate,
    /// Whether the grant is active
    pub is_active: bool,
}

impl GroupMembership {
    /// Whether the grant applies on the given date
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.valid_from <= date && date < self.valid_to
    }
}
