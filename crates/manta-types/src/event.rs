//! Event types

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique event identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new random event ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an event ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EventId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Event category code
///
/// Categories are plain codes; the eligibility rule table maps each code to
/// a booking policy, with a default for codes it does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCode(pub String);

impl CategoryCode {
    /// Create a new category code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Event status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Open for booking
    Scheduled,
    /// Cancelled; no new bookings
    Cancelled,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("invalid event status: {other}")),
        }
    }
}

/// A scheduled training event slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event ID
    pub id: EventId,
    /// Category code; keys into the eligibility rule table
    pub category: CategoryCode,
    /// Civil date of the event, in the club's timezone
    pub date: NaiveDate,
    /// Start time
    pub starts_at: NaiveTime,
    /// End time
    pub ends_at: NaiveTime,
    /// Capacity; the count of live signups never exceeds this
    pub max_slots: i32,
    /// Event status
    pub status: EventStatus,
}

/// Typed partial update for an event
///
/// Administrative edits set only the fields they intend to change; `None`
/// leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    /// New event date
    pub date: Option<NaiveDate>,
    /// New start time
    pub starts_at: Option<NaiveTime>,
    /// New end time
    pub ends_at: Option<NaiveTime>,
    /// New capacity
    pub max_slots: Option<i32>,
    /// New status
    pub status: Option<EventStatus>,
}

impl EventPatch {
    /// Whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.starts_at.is_none()
            && self.ends_at.is_none()
            && self.max_slots.is_none()
            && self.status.is_none()
    }
}
