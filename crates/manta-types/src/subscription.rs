//! Subscription types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MemberId;

/// Unique subscription identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Create a new random subscription ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a subscription ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SubscriptionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Created, awaiting payment confirmation
    Pending,
    /// Active and usable for bookings
    Active,
    /// Past its validity window
    Expired,
    /// Superseded by a newer subscription or administratively cancelled
    Cancelled,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("invalid subscription status: {other}")),
        }
    }
}

/// A member's subscription
///
/// Holds the entry balance debited per booking. At most one subscription per
/// member is ACTIVE at any time; the data layer enforces this with a partial
/// unique index and the activation path supersedes any prior ACTIVE row in
/// the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscription ID
    pub id: SubscriptionId,
    /// Owning member
    pub member_id: MemberId,
    /// Validity window start (inclusive)
    pub starts_on: NaiveDate,
    /// Validity window end (exclusive)
    pub ends_on: NaiveDate,
    /// Price paid, in minor currency units
    pub amount_cents: i64,
    /// ISO 4217 currency code
    pub currency: String,
    /// Remaining entries; never negative
    pub entries_left: i32,
    /// Lifecycle status
    pub status: SubscriptionStatus,
}

impl Subscription {
    /// Whether the validity window contains the given date
    pub fn window_contains(&self, date: NaiveDate) -> bool {
        self.starts_on <= date && date < self.ends_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_half_open() {
        let sub = Subscription {
            id: SubscriptionId::new(),
            member_id: MemberId::new(),
            starts_on: date(2026, 1, 1),
            ends_on: date(2026, 7, 1),
            amount_cents: 25_000,
            currency: "EUR".to_string(),
            entries_left: 10,
            status: SubscriptionStatus::Active,
        };

        assert!(sub.window_contains(date(2026, 1, 1)));
        assert!(sub.window_contains(date(2026, 6, 30)));
        assert!(!sub.window_contains(date(2026, 7, 1)));
        assert!(!sub.window_contains(date(2025, 12, 31)));
    }
}
