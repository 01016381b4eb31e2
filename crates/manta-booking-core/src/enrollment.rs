//! Subscription lifecycle
//!
//! Creation and activation of subscriptions. Activation enforces the
//! at-most-one-ACTIVE invariant itself: the prior ACTIVE row is cancelled in
//! the same transaction that activates the new one, and the funding group
//! membership is created alongside. The partial unique index on
//! `subscriptions(member_id) WHERE status = 'active'` backs this up at the
//! store level.

use chrono::NaiveDate;
use uuid::Uuid;

use manta_db::models::{GroupMembershipRow, SubscriptionRow};
use manta_db::DbPool;
use manta_types::{Subscription, SubscriptionId, SubscriptionStatus, Tier};

use crate::error::EnrollmentError;

/// Tier grant created when a subscription is activated
#[derive(Debug, Clone)]
pub struct TierGrant {
    /// Granted tier
    pub tier: Tier,
    /// Validity window override; defaults to the subscription's window
    pub window: Option<(NaiveDate, NaiveDate)>,
}

impl TierGrant {
    /// Grant a tier for the subscription's own validity window
    pub fn new(tier: Tier) -> Self {
        Self { tier, window: None }
    }

    /// Override the grant's validity window
    pub fn with_window(mut self, valid_from: NaiveDate, valid_to: NaiveDate) -> Self {
        self.window = Some((valid_from, valid_to));
        self
    }
}

/// Subscription lifecycle manager
#[derive(Clone)]
pub struct EnrollmentManager {
    pool: DbPool,
}

impl EnrollmentManager {
    /// Create an enrollment manager
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Activate a PENDING subscription
    ///
    /// In one transaction: cancels any prior ACTIVE subscription of the same
    /// member, activates the target row, and creates the funding group
    /// membership for the granted tier.
    pub async fn activate(
        &self,
        subscription_id: SubscriptionId,
        grant: TierGrant,
    ) -> Result<Subscription, EnrollmentError> {
        let mut tx = self.pool.begin().await?;

        let sub = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, member_id, starts_on, ends_on, amount_cents, currency,
                   entries_left, status, cancelled_at, created_at, updated_at
            FROM subscriptions
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(subscription_id.0)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EnrollmentError::SubscriptionNotFound)?;

        let status: SubscriptionStatus = sub
            .status
            .parse()
            .map_err(EnrollmentError::TransientStore)?;
        if status != SubscriptionStatus::Pending {
            tx.rollback().await?;
            return Err(EnrollmentError::NotActivatable(status.to_string()));
        }

        // Supersede the prior ACTIVE subscription, if any, before the new
        // row turns active; the partial unique index forbids overlap.
        let superseded = sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = 'cancelled', cancelled_at = now(), updated_at = now()
            WHERE member_id = $1 AND status = 'active'
            "#,
        )
        .bind(sub.member_id)
        .execute(&mut *tx)
        .await?;

        let activated = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            UPDATE subscriptions
            SET status = 'active', updated_at = now()
            WHERE id = $1
            RETURNING id, member_id, starts_on, ends_on, amount_cents, currency,
                      entries_left, status, cancelled_at, created_at, updated_at
            "#,
        )
        .bind(subscription_id.0)
        .fetch_one(&mut *tx)
        .await?;

        let (valid_from, valid_to) = grant
            .window
            .unwrap_or((activated.starts_on, activated.ends_on));

        sqlx::query_as::<_, GroupMembershipRow>(
            r#"
            INSERT INTO group_memberships
                (id, member_id, subscription_id, tier, valid_from, valid_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, member_id, subscription_id, tier, valid_from, valid_to,
                      is_active, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(activated.member_id)
        .bind(activated.id)
        .bind(grant.tier.as_str())
        .bind(valid_from)
        .bind(valid_to)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        if superseded.rows_affected() > 0 {
            tracing::info!(
                member_id = %activated.member_id,
                subscription_id = %subscription_id,
                "Subscription activated, prior active subscription superseded"
            );
        } else {
            tracing::info!(
                member_id = %activated.member_id,
                subscription_id = %subscription_id,
                "Subscription activated"
            );
        }

        activated
            .try_into()
            .map_err(|e: manta_db::DbError| EnrollmentError::TransientStore(e.to_string()))
    }
}

impl std::fmt::Debug for EnrollmentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollmentManager").finish()
    }
}
