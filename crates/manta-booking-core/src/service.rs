//! Booking service - ties together the cutoff policy, entitlement resolver,
//! eligibility rules, and the reservation transaction manager

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

use manta_db::pg::PgSubscriptionRepository;
use manta_db::{CreateSubscription, DbPool, SubscriptionRepository};
use manta_types::{EventId, MemberId, Signup, Subscription, SubscriptionId, Tier};

use crate::config::BookingConfig;
use crate::enrollment::{EnrollmentManager, TierGrant};
use crate::error::{BookingError, EnrollmentError};
use crate::reservation::ReservationManager;

/// Booking service
///
/// The single entry point the boundary layer talks to. Identity and the
/// request time are trusted inputs supplied by the caller.
#[derive(Clone)]
pub struct BookingService {
    config: BookingConfig,
    reservations: ReservationManager,
    enrollment: EnrollmentManager,
    subscriptions: PgSubscriptionRepository,
    pool: DbPool,
}

impl BookingService {
    /// Create a booking service
    pub fn new(pool: DbPool, config: BookingConfig) -> Self {
        Self {
            reservations: ReservationManager::new(pool.clone(), &config),
            enrollment: EnrollmentManager::new(pool.clone()),
            subscriptions: PgSubscriptionRepository::new(pool.clone()),
            config,
            pool,
        }
    }

    /// The configuration in effect
    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    // =========================================================================
    // Reservations
    // =========================================================================

    /// Book a slot on an event
    pub async fn book(
        &self,
        member_id: MemberId,
        event_id: EventId,
        now: DateTime<Utc>,
    ) -> Result<Signup, BookingError> {
        self.reservations.book(member_id, event_id, now).await
    }

    /// Cancel a signup
    pub async fn cancel(
        &self,
        member_id: MemberId,
        event_id: EventId,
        now: DateTime<Utc>,
    ) -> Result<(), BookingError> {
        self.reservations.cancel(member_id, event_id, now).await
    }

    // =========================================================================
    // Entitlements (advisory)
    // =========================================================================

    /// Resolve the member's current tier set, for advisory display
    ///
    /// The authoritative check happens again inside the booking transaction;
    /// this read takes no locks.
    pub async fn resolve_tiers(
        &self,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<HashSet<Tier>, BookingError> {
        self.reservations
            .resolver()
            .resolve_tiers(&self.pool, member_id, now)
            .await
    }

    // =========================================================================
    // Subscription lifecycle
    // =========================================================================

    /// Create a PENDING subscription
    pub async fn create_subscription(
        &self,
        member_id: MemberId,
        starts_on: NaiveDate,
        ends_on: NaiveDate,
        amount_cents: i64,
        currency: String,
        entries: i32,
    ) -> Result<Subscription, EnrollmentError> {
        let row = self
            .subscriptions
            .create(CreateSubscription {
                id: SubscriptionId::new().0,
                member_id: member_id.0,
                starts_on,
                ends_on,
                amount_cents,
                currency,
                entries,
            })
            .await?;

        row.try_into()
            .map_err(|e: manta_db::DbError| EnrollmentError::TransientStore(e.to_string()))
    }

    /// Activate a PENDING subscription, superseding any prior ACTIVE one
    pub async fn activate_subscription(
        &self,
        subscription_id: SubscriptionId,
        grant: TierGrant,
    ) -> Result<Subscription, EnrollmentError> {
        self.enrollment.activate(subscription_id, grant).await
    }
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
