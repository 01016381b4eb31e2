//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.
//! Status and tier columns are stored as text; `TryFrom` conversions parse
//! them into the domain enums and surface bad values as decode errors.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use manta_types::{
    CategoryCode, Event, GroupMembership, Member, Signup, Subscription, Tier,
};

use crate::error::DbError;

/// Member row from the database
#[derive(Debug, Clone, FromRow)]
pub struct MemberRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subscription row from the database
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub amount_cents: i64,
    pub currency: String,
    pub entries_left: i32,
    pub status: String,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Group membership row from the database
#[derive(Debug, Clone, FromRow)]
pub struct GroupMembershipRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub subscription_id: Uuid,
    pub tier: String,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Event row from the database
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub category: String,
    pub event_date: NaiveDate,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub max_slots: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Signup row from the database
#[derive(Debug, Clone, FromRow)]
pub struct SignupRow {
    pub id: Uuid,
    pub member_id: Uuid,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for Member {
    type Error = DbError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Member {
            id: row.id.into(),
            name: row.name,
            email: row.email,
            status: row.status.parse().map_err(DbError::Decode)?,
        })
    }
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DbError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: row.id.into(),
            member_id: row.member_id.into(),
            starts_on: row.starts_on,
            ends_on: row.ends_on,
            amount_cents: row.amount_cents,
            currency: row.currency,
            entries_left: row.entries_left,
            status: row.status.parse().map_err(DbError::Decode)?,
        })
    }
}

impl TryFrom<GroupMembershipRow> for GroupMembership {
    type Error = DbError;

    fn try_from(row: GroupMembershipRow) -> Result<Self, Self::Error> {
        let tier: Tier = row
            .tier
            .parse()
            .map_err(|e: manta_types::TierParseError| DbError::Decode(e.to_string()))?;
        Ok(GroupMembership {
            id: row.id.into(),
            member_id: row.member_id.into(),
            subscription_id: row.subscription_id.into(),
            tier,
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            is_active: row.is_active,
        })
    }
}

impl TryFrom<EventRow> for Event {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Event {
            id: row.id.into(),
            category: CategoryCode::new(row.category),
            date: row.event_date,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            max_slots: row.max_slots,
            status: row.status.parse().map_err(DbError::Decode)?,
        })
    }
}

impl From<SignupRow> for Signup {
    fn from(row: SignupRow) -> Self {
        Signup {
            id: row.id.into(),
            member_id: row.member_id.into(),
            event_id: row.event_id.into(),
            created_at: row.created_at,
        }
    }
}
