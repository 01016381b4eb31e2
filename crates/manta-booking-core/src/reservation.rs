//! Reservation transaction manager
//!
//! The only code path allowed to create or delete signups and to move entry
//! balances. Every decision re-reads authoritative state inside a single
//! transaction: the event row and the subscription row are locked with
//! `SELECT ... FOR UPDATE`, the signup count is taken under the event lock,
//! and the signup insert relies on the store's unique constraint rather than
//! a racy pre-check. Concurrent bookings for the same event serialize on the
//! event row lock, so capacity can never be oversubscribed.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use manta_db::models::{EventRow, SignupRow, SubscriptionRow};
use manta_db::DbPool;
use manta_types::{EventId, EventStatus, MemberId, Signup, SignupId, Tier};

use crate::config::BookingConfig;
use crate::cutoff::CutoffPolicy;
use crate::error::BookingError;
use crate::resolver::EntitlementResolver;
use crate::rules::{CategoryRule, EligibilityRules};

/// Reservation transaction manager
#[derive(Clone)]
pub struct ReservationManager {
    pool: DbPool,
    cutoff: CutoffPolicy,
    resolver: EntitlementResolver,
    rules: EligibilityRules,
}

impl ReservationManager {
    /// Create a reservation manager
    pub fn new(pool: DbPool, config: &BookingConfig) -> Self {
        Self {
            pool,
            cutoff: CutoffPolicy::new(config.timezone),
            resolver: EntitlementResolver::new(config.hierarchy(), config.timezone),
            rules: config.rules.clone(),
        }
    }

    /// The cutoff policy in use
    pub fn cutoff(&self) -> &CutoffPolicy {
        &self.cutoff
    }

    /// The entitlement resolver in use
    pub fn resolver(&self) -> &EntitlementResolver {
        &self.resolver
    }

    /// Book a slot on an event for a member
    ///
    /// All preconditions after the cutoff are evaluated inside one
    /// transaction; on success the signup row exists and the subscription's
    /// entry balance is one lower, atomically.
    pub async fn book(
        &self,
        member_id: MemberId,
        event_id: EventId,
        now: DateTime<Utc>,
    ) -> Result<Signup, BookingError> {
        // Cheap advisory read for the cutoff; rejecting here avoids opening
        // a transaction at all. The transaction re-reads the event under lock.
        let event = self
            .fetch_event(event_id)
            .await?
            .ok_or(BookingError::EventNotFound)?;

        if !self.cutoff.can_book(event.event_date, now).allowed {
            return Err(BookingError::CutoffExceeded);
        }

        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, category, event_date, starts_at, ends_at, max_slots,
                   status, created_at, updated_at
            FROM events
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(event_id.0)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BookingError::EventNotFound)?;

        let status: EventStatus = event
            .status
            .parse()
            .map_err(BookingError::TransientStore)?;

        // Stable under the event row lock taken above.
        let signup_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM signups WHERE event_id = $1")
                .bind(event_id.0)
                .fetch_one(&mut *tx)
                .await?;

        let today = self.cutoff.local_date(now);
        let subscription = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, member_id, starts_on, ends_on, amount_cents, currency,
                   entries_left, status, cancelled_at, created_at, updated_at
            FROM subscriptions
            WHERE member_id = $1
              AND status = 'active'
              AND starts_on <= $2 AND $2 < ends_on
            FOR UPDATE
            "#,
        )
        .bind(member_id.0)
        .bind(today)
        .fetch_optional(&mut *tx)
        .await?;

        let tiers = self
            .resolver
            .resolve_tiers(&mut *tx, member_id, now)
            .await?;

        let rule = self.rules.rule_for(&event.category);
        evaluate_book(
            status,
            signup_count,
            event.max_slots,
            subscription.as_ref().map(|s| s.entries_left),
            &tiers,
            rule,
        )?;

        let signup_id = SignupId::new();
        let signup = sqlx::query_as::<_, SignupRow>(
            r#"
            INSERT INTO signups (id, member_id, event_id)
            VALUES ($1, $2, $3)
            RETURNING id, member_id, event_id, created_at
            "#,
        )
        .bind(signup_id.0)
        .bind(member_id.0)
        .bind(event_id.0)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_signup_insert_error)?;

        if let Some(sub) = &subscription {
            // Conditional decrement; the CHECK constraint is the last line of
            // defense, this guard keeps the common path a clean rejection.
            let updated = sqlx::query(
                r#"
                UPDATE subscriptions
                SET entries_left = entries_left - 1, updated_at = now()
                WHERE id = $1 AND entries_left > 0
                "#,
            )
            .bind(sub.id)
            .execute(&mut *tx)
            .await
            .map_err(map_credit_update_error)?;

            if updated.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(BookingError::InsufficientCredit);
            }
        }

        tx.commit().await?;

        tracing::debug!(
            member_id = %member_id,
            event_id = %event_id,
            "Booking confirmed"
        );

        Ok(signup.into())
    }

    /// Cancel a member's signup on an event
    ///
    /// Deletes the signup and refunds one entry to the member's ACTIVE
    /// subscription in the same transaction.
    pub async fn cancel(
        &self,
        member_id: MemberId,
        event_id: EventId,
        now: DateTime<Utc>,
    ) -> Result<(), BookingError> {
        let event = self
            .fetch_event(event_id)
            .await?
            .ok_or(BookingError::EventNotFound)?;

        if !self.cutoff.can_cancel(event.event_date, now).allowed {
            return Err(BookingError::CutoffExceeded);
        }

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM signups WHERE member_id = $1 AND event_id = $2")
            .bind(member_id.0)
            .bind(event_id.0)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(BookingError::SignupNotFound);
        }

        let today = self.cutoff.local_date(now);
        let refunded = sqlx::query(
            r#"
            UPDATE subscriptions
            SET entries_left = entries_left + 1, updated_at = now()
            WHERE member_id = $1
              AND status = 'active'
              AND starts_on <= $2 AND $2 < ends_on
            "#,
        )
        .bind(member_id.0)
        .bind(today)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if refunded.rows_affected() == 0 {
            // Lapsed subscription: the slot is freed but there is no balance
            // to credit.
            tracing::info!(
                member_id = %member_id,
                event_id = %event_id,
                "Signup cancelled without refund, no active subscription"
            );
        } else {
            tracing::debug!(
                member_id = %member_id,
                event_id = %event_id,
                "Signup cancelled, entry refunded"
            );
        }

        Ok(())
    }

    async fn fetch_event(&self, event_id: EventId) -> Result<Option<EventRow>, BookingError> {
        let event = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, category, event_date, starts_at, ends_at, max_slots,
                   status, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("cutoff", &self.cutoff)
            .finish_non_exhaustive()
    }
}

/// Evaluate the booking preconditions over state read under lock
///
/// `entries_left` is `None` when the member has no ACTIVE, in-window
/// subscription. Rejection order follows the operation contract: event
/// status, capacity, credit, then category eligibility.
fn evaluate_book(
    status: EventStatus,
    signup_count: i64,
    max_slots: i32,
    entries_left: Option<i32>,
    tiers: &HashSet<Tier>,
    rule: &CategoryRule,
) -> Result<(), BookingError> {
    if status != EventStatus::Scheduled {
        return Err(BookingError::EventNotScheduled);
    }
    if signup_count >= i64::from(max_slots) {
        return Err(BookingError::EventFull);
    }
    match entries_left {
        // A present subscription is always debited, so it needs balance even
        // for categories that do not require one.
        Some(entries) if entries <= 0 => return Err(BookingError::InsufficientCredit),
        None if rule.requires_active_subscription => {
            return Err(BookingError::InsufficientCredit)
        }
        _ => {}
    }
    if tiers.is_disjoint(&rule.allowed_tiers) {
        return Err(BookingError::NotAuthorized);
    }
    Ok(())
}

fn map_signup_insert_error(err: sqlx::Error) -> BookingError {
    if let sqlx::Error::Database(db) = &err {
        // A concurrent request won the (member, event) uniqueness race.
        if db.is_unique_violation() {
            return BookingError::AlreadyBooked;
        }
    }
    BookingError::from(err)
}

fn map_credit_update_error(err: sqlx::Error) -> BookingError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_check_violation() {
            return BookingError::InsufficientCredit;
        }
    }
    BookingError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tiers() -> HashSet<Tier> {
        Tier::ALL_TIERS.into_iter().collect()
    }

    fn default_rule() -> CategoryRule {
        CategoryRule::default()
    }

    #[test]
    fn test_book_happy_path() {
        let result = evaluate_book(
            EventStatus::Scheduled,
            3,
            8,
            Some(5),
            &all_tiers(),
            &default_rule(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_cancelled_event_rejected() {
        let err = evaluate_book(
            EventStatus::Cancelled,
            0,
            8,
            Some(5),
            &all_tiers(),
            &default_rule(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::EventNotScheduled));
    }

    #[test]
    fn test_full_event_rejected() {
        let err = evaluate_book(
            EventStatus::Scheduled,
            8,
            8,
            Some(5),
            &all_tiers(),
            &default_rule(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::EventFull));
    }

    #[test]
    fn test_capacity_checked_before_credit() {
        // Full and broke: capacity wins, per the precondition order.
        let err = evaluate_book(
            EventStatus::Scheduled,
            8,
            8,
            Some(0),
            &all_tiers(),
            &default_rule(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::EventFull));
    }

    #[test]
    fn test_zero_balance_rejected() {
        let err = evaluate_book(
            EventStatus::Scheduled,
            0,
            8,
            Some(0),
            &all_tiers(),
            &default_rule(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::InsufficientCredit));
    }

    #[test]
    fn test_missing_subscription_rejected_when_required() {
        let err = evaluate_book(
            EventStatus::Scheduled,
            0,
            8,
            None,
            &all_tiers(),
            &default_rule(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::InsufficientCredit));
    }

    #[test]
    fn test_missing_subscription_ok_when_not_required() {
        let rule = CategoryRule {
            requires_active_subscription: false,
            allowed_tiers: all_tiers(),
        };
        let result = evaluate_book(EventStatus::Scheduled, 0, 8, None, &all_tiers(), &rule);
        assert!(result.is_ok());
    }

    #[test]
    fn test_tier_gate_denies_outsider() {
        let rule = CategoryRule {
            requires_active_subscription: true,
            allowed_tiers: [Tier::Deep].into_iter().collect(),
        };
        let member_tiers: HashSet<Tier> = [Tier::Open, Tier::All].into_iter().collect();
        let err = evaluate_book(EventStatus::Scheduled, 0, 8, Some(3), &member_tiers, &rule)
            .unwrap_err();
        assert!(matches!(err, BookingError::NotAuthorized));
    }

    #[test]
    fn test_tier_gate_admits_expanded_deep() {
        let rule = CategoryRule {
            requires_active_subscription: true,
            allowed_tiers: [Tier::Deep].into_iter().collect(),
        };
        let member_tiers: HashSet<Tier> = [Tier::Deep, Tier::All].into_iter().collect();
        let result = evaluate_book(EventStatus::Scheduled, 0, 8, Some(3), &member_tiers, &rule);
        assert!(result.is_ok());
    }

    #[test]
    fn test_credit_checked_before_tier_gate() {
        let rule = CategoryRule {
            requires_active_subscription: true,
            allowed_tiers: [Tier::Deep].into_iter().collect(),
        };
        let member_tiers: HashSet<Tier> = [Tier::Open].into_iter().collect();
        let err = evaluate_book(EventStatus::Scheduled, 0, 8, Some(0), &member_tiers, &rule)
            .unwrap_err();
        assert!(matches!(err, BookingError::InsufficientCredit));
    }
}
