//! PostgreSQL group membership repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::GroupMembershipRow;
use crate::repo::{CreateGroupMembership, GroupMembershipRepository};

/// PostgreSQL group membership repository
#[derive(Clone)]
pub struct PgGroupMembershipRepository {
    pool: PgPool,
}

impl PgGroupMembershipRepository {
    /// Create a new group membership repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupMembershipRepository for PgGroupMembershipRepository {
    async fn find_active_on(
        &self,
        member_id: Uuid,
        on_date: NaiveDate,
    ) -> DbResult<Vec<GroupMembershipRow>> {
        let rows = sqlx::query_as::<_, GroupMembershipRow>(
            r#"
            SELECT id, member_id, subscription_id, tier, valid_from, valid_to,
                   is_active, created_at
            FROM group_memberships
            WHERE member_id = $1
              AND is_active
              AND valid_from <= $2 AND $2 < valid_to
            "#,
        )
        .bind(member_id)
        .bind(on_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_member(&self, member_id: Uuid) -> DbResult<Vec<GroupMembershipRow>> {
        let rows = sqlx::query_as::<_, GroupMembershipRow>(
            r#"
            SELECT id, member_id, subscription_id, tier, valid_from, valid_to,
                   is_active, created_at
            FROM group_memberships
            WHERE member_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, membership: CreateGroupMembership) -> DbResult<GroupMembershipRow> {
        let row = sqlx::query_as::<_, GroupMembershipRow>(
            r#"
            INSERT INTO group_memberships
                (id, member_id, subscription_id, tier, valid_from, valid_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, member_id, subscription_id, tier, valid_from, valid_to,
                      is_active, created_at
            "#,
        )
        .bind(membership.id)
        .bind(membership.member_id)
        .bind(membership.subscription_id)
        .bind(membership.tier.as_str())
        .bind(membership.valid_from)
        .bind(membership.valid_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn deactivate(&self, id: Uuid) -> DbResult<()> {
        sqlx::query("UPDATE group_memberships SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
