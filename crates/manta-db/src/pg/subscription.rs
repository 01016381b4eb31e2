//! PostgreSQL subscription repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::SubscriptionRow;
use crate::repo::{CreateSubscription, SubscriptionRepository};

/// PostgreSQL subscription repository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new subscription repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SubscriptionRow>> {
        let sub = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, member_id, starts_on, ends_on, amount_cents, currency,
                   entries_left, status, cancelled_at, created_at, updated_at
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sub)
    }

    async fn find_active_on(
        &self,
        member_id: Uuid,
        on_date: NaiveDate,
    ) -> DbResult<Option<SubscriptionRow>> {
        // EXPIRED handling is lazy: a past-window row simply stops matching.
        let sub = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, member_id, starts_on, ends_on, amount_cents, currency,
                   entries_left, status, cancelled_at, created_at, updated_at
            FROM subscriptions
            WHERE member_id = $1
              AND status = 'active'
              AND starts_on <= $2 AND $2 < ends_on
            "#,
        )
        .bind(member_id)
        .bind(on_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sub)
    }

    async fn find_by_member(&self, member_id: Uuid) -> DbResult<Vec<SubscriptionRow>> {
        let subs = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, member_id, starts_on, ends_on, amount_cents, currency,
                   entries_left, status, cancelled_at, created_at, updated_at
            FROM subscriptions
            WHERE member_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subs)
    }

    async fn create(&self, sub: CreateSubscription) -> DbResult<SubscriptionRow> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            INSERT INTO subscriptions
                (id, member_id, starts_on, ends_on, amount_cents, currency, entries_left)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, member_id, starts_on, ends_on, amount_cents, currency,
                      entries_left, status, cancelled_at, created_at, updated_at
            "#,
        )
        .bind(sub.id)
        .bind(sub.member_id)
        .bind(sub.starts_on)
        .bind(sub.ends_on)
        .bind(sub.amount_cents)
        .bind(&sub.currency)
        .bind(sub.entries)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn cancel(&self, id: Uuid) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = 'cancelled', cancelled_at = now(), updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
