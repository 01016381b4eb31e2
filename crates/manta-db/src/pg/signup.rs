//! PostgreSQL signup repository implementation (read-only)
//!
//! Signups are written only by the booking transaction; this repository
//! serves the advisory and listing paths.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::SignupRow;
use crate::repo::SignupRepository;

/// PostgreSQL signup repository
#[derive(Clone)]
pub struct PgSignupRepository {
    pool: PgPool,
}

impl PgSignupRepository {
    /// Create a new signup repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SignupRepository for PgSignupRepository {
    async fn find_by_member_and_event(
        &self,
        member_id: Uuid,
        event_id: Uuid,
    ) -> DbResult<Option<SignupRow>> {
        let signup = sqlx::query_as::<_, SignupRow>(
            r#"
            SELECT id, member_id, event_id, created_at
            FROM signups
            WHERE member_id = $1 AND event_id = $2
            "#,
        )
        .bind(member_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(signup)
    }

    async fn find_by_member(&self, member_id: Uuid) -> DbResult<Vec<SignupRow>> {
        let signups = sqlx::query_as::<_, SignupRow>(
            r#"
            SELECT id, member_id, event_id, created_at
            FROM signups
            WHERE member_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(signups)
    }

    async fn find_by_event(&self, event_id: Uuid) -> DbResult<Vec<SignupRow>> {
        let signups = sqlx::query_as::<_, SignupRow>(
            r#"
            SELECT id, member_id, event_id, created_at
            FROM signups
            WHERE event_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(signups)
    }

    async fn count_for_event(&self, event_id: Uuid) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM signups WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
