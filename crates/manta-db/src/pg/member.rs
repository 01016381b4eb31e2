//! PostgreSQL member repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::MemberRow;
use crate::repo::{CreateMember, MemberRepository};

/// PostgreSQL member repository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new member repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<MemberRow>> {
        let member = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, email, status, created_at, updated_at
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<MemberRow>> {
        let member = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT id, name, email, status, created_at, updated_at
            FROM members
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    async fn create(&self, member: CreateMember) -> DbResult<MemberRow> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            INSERT INTO members (id, name, email)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, status, created_at, updated_at
            "#,
        )
        .bind(member.id)
        .bind(&member.name)
        .bind(&member.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn set_status(&self, id: Uuid, status: &str) -> DbResult<()> {
        sqlx::query("UPDATE members SET status = $1, updated_at = now() WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
