//! Repository traits
//!
//! Define async repository interfaces for database operations. These cover
//! the plain read and admin paths; the booking transaction itself bypasses
//! them and runs its queries on a single locked transaction, so signups have
//! a read-only repository on purpose.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use manta_types::{EventPatch, Tier};

use crate::error::DbResult;
use crate::models::*;

/// Member repository trait
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find a member by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<MemberRow>>;

    /// Find a member by email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<MemberRow>>;

    /// Create a new member
    async fn create(&self, member: CreateMember) -> DbResult<MemberRow>;

    /// Update member lifecycle status
    async fn set_status(&self, id: Uuid, status: &str) -> DbResult<()>;
}

/// Create member input
#[derive(Debug, Clone)]
pub struct CreateMember {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Subscription repository trait
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Find a subscription by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriptionRow>>;

    /// Find the member's ACTIVE subscription whose window contains the date
    async fn find_active_on(
        &self,
        member_id: Uuid,
        on_date: NaiveDate,
    ) -> DbResult<Option<SubscriptionRow>>;

    /// All subscriptions for a member, newest first
    async fn find_by_member(&self, member_id: Uuid) -> DbResult<Vec<SubscriptionRow>>;

    /// Create a new PENDING subscription
    async fn create(&self, sub: CreateSubscription) -> DbResult<SubscriptionRow>;

    /// Cancel a subscription administratively
    async fn cancel(&self, id: Uuid) -> DbResult<()>;
}

/// Create subscription input
#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub id: Uuid,
    pub member_id: Uuid,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub amount_cents: i64,
    pub currency: String,
    pub entries: i32,
}

/// Group membership repository trait
#[async_trait]
pub trait GroupMembershipRepository: Send + Sync {
    /// Active memberships for a member whose window contains the date
    async fn find_active_on(
        &self,
        member_id: Uuid,
        on_date: NaiveDate,
    ) -> DbResult<Vec<GroupMembershipRow>>;

    /// All memberships for a member
    async fn find_by_member(&self, member_id: Uuid) -> DbResult<Vec<GroupMembershipRow>>;

    /// Create a new membership grant
    async fn create(&self, membership: CreateGroupMembership) -> DbResult<GroupMembershipRow>;

    /// Deactivate a membership grant
    async fn deactivate(&self, id: Uuid) -> DbResult<()>;
}

/// Create group membership input
#[derive(Debug, Clone)]
pub struct CreateGroupMembership {
    pub id: Uuid,
    pub member_id: Uuid,
    pub subscription_id: Uuid,
    pub tier: Tier,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
}

/// Event repository trait
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find an event by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<EventRow>>;

    /// Events on or after the given date, soonest first
    async fn list_from(&self, from_date: NaiveDate, limit: i64) -> DbResult<Vec<EventRow>>;

    /// Create a new event
    async fn create(&self, event: CreateEvent) -> DbResult<EventRow>;

    /// Apply a typed partial update
    async fn update(&self, id: Uuid, patch: EventPatch) -> DbResult<EventRow>;
}

/// Create event input
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub id: Uuid,
    pub category: String,
    pub event_date: NaiveDate,
    pub starts_at: chrono::NaiveTime,
    pub ends_at: chrono::NaiveTime,
    pub max_slots: i32,
}

/// Signup repository trait (read-only)
///
/// Signups are created and deleted only inside the booking transaction.
#[async_trait]
pub trait SignupRepository: Send + Sync {
    /// Find the signup for a (member, event) pair
    async fn find_by_member_and_event(
        &self,
        member_id: Uuid,
        event_id: Uuid,
    ) -> DbResult<Option<SignupRow>>;

    /// All signups for a member, newest first
    async fn find_by_member(&self, member_id: Uuid) -> DbResult<Vec<SignupRow>>;

    /// All signups for an event, oldest first
    async fn find_by_event(&self, event_id: Uuid) -> DbResult<Vec<SignupRow>>;

    /// Count live signups for an event
    async fn count_for_event(&self, event_id: Uuid) -> DbResult<i64>;
}
