//! PostgreSQL event repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use manta_types::EventPatch;

use crate::error::{DbError, DbResult};
use crate::models::EventRow;
use crate::repo::{CreateEvent, EventRepository};

/// PostgreSQL event repository
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Create a new event repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<EventRow>> {
        let event = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, category, event_date, starts_at, ends_at, max_slots,
                   status, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn list_from(&self, from_date: NaiveDate, limit: i64) -> DbResult<Vec<EventRow>> {
        let events = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, category, event_date, starts_at, ends_at, max_slots,
                   status, created_at, updated_at
            FROM events
            WHERE event_date >= $1
            ORDER BY event_date, starts_at
            LIMIT $2
            "#,
        )
        .bind(from_date)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn create(&self, event: CreateEvent) -> DbResult<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, category, event_date, starts_at, ends_at, max_slots)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, category, event_date, starts_at, ends_at, max_slots,
                      status, created_at, updated_at
            "#,
        )
        .bind(event.id)
        .bind(&event.category)
        .bind(event.event_date)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(event.max_slots)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: EventPatch) -> DbResult<EventRow> {
        let mut tx = self.pool.begin().await?;

        // Lock the event row first; bookings serialize on the same lock, so
        // a concurrent signup cannot slip in between the count below and
        // the capacity change.
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;

        if let Some(new_slots) = patch.max_slots {
            let signups: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM signups WHERE event_id = $1")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            if i64::from(new_slots) < signups {
                return Err(DbError::CapacityBelowSignups { signups });
            }
        }

        // COALESCE keeps the stored value for every field the patch left unset.
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            UPDATE events
            SET event_date = COALESCE($2, event_date),
                starts_at  = COALESCE($3, starts_at),
                ends_at    = COALESCE($4, ends_at),
                max_slots  = COALESCE($5, max_slots),
                status     = COALESCE($6, status),
                updated_at = now()
            WHERE id = $1
            RETURNING id, category, event_date, starts_at, ends_at, max_slots,
                      status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.date)
        .bind(patch.starts_at)
        .bind(patch.ends_at)
        .bind(patch.max_slots)
        .bind(patch.status.map(|s| s.to_string()))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row)
    }
}
