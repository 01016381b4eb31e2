//! Entitlement resolver
//!
//! Computes the set of access tiers a member holds at a point in time:
//! active group memberships whose validity window contains the local date,
//! expanded through the tier hierarchy table.
//!
//! The resolver is read-only and executor-generic: the boundary calls it
//! with the pool for advisory display, and the reservation manager calls it
//! on the open booking transaction so the authoritative check sees the same
//! snapshot as the writes.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use manta_types::{MemberId, Tier};

use crate::error::BookingError;
use crate::hierarchy::TierHierarchy;

/// Entitlement resolver
#[derive(Debug, Clone)]
pub struct EntitlementResolver {
    hierarchy: TierHierarchy,
    tz: Tz,
}

impl EntitlementResolver {
    /// Create a resolver with the given hierarchy table and club timezone
    pub fn new(hierarchy: TierHierarchy, tz: Tz) -> Self {
        Self { hierarchy, tz }
    }

    /// The hierarchy table in use
    pub fn hierarchy(&self) -> &TierHierarchy {
        &self.hierarchy
    }

    /// Resolve the member's tier set as of the given instant
    pub async fn resolve_tiers<'e, E>(
        &self,
        executor: E,
        member_id: MemberId,
        as_of: DateTime<Utc>,
    ) -> Result<HashSet<Tier>, BookingError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let on_date = as_of.with_timezone(&self.tz).date_naive();

        let granted: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT tier
            FROM group_memberships
            WHERE member_id = $1
              AND is_active
              AND valid_from <= $2 AND $2 < valid_to
            "#,
        )
        .bind(member_id.0)
        .bind(on_date)
        .fetch_all(executor)
        .await?;

        Ok(self.expand_granted(&granted))
    }

    /// Expand raw granted tier strings through the hierarchy table
    ///
    /// Unknown tier strings are skipped with a warning rather than failing
    /// the whole resolution; a bad row must not lock a member out.
    pub fn expand_granted(&self, granted: &[String]) -> HashSet<Tier> {
        let tiers = granted.iter().filter_map(|raw| match raw.parse::<Tier>() {
            Ok(tier) => Some(tier),
            Err(e) => {
                tracing::warn!(tier = %raw, error = %e, "Skipping unparseable tier grant");
                None
            }
        });
        self.hierarchy.expand_all(tiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Europe::Amsterdam;

    fn resolver(hierarchy: TierHierarchy) -> EntitlementResolver {
        EntitlementResolver::new(hierarchy, Amsterdam)
    }

    #[test]
    fn test_expand_granted_chain() {
        let r = resolver(TierHierarchy::chain());
        let tiers = r.expand_granted(&["deep".to_string()]);
        assert_eq!(tiers.len(), 4);
    }

    #[test]
    fn test_expand_granted_skips_bad_rows() {
        let r = resolver(TierHierarchy::chain());
        let tiers = r.expand_granted(&["open".to_string(), "platinum".to_string()]);
        assert!(tiers.contains(&Tier::Open));
        assert!(tiers.contains(&Tier::All));
        assert_eq!(tiers.len(), 2);
    }

    #[test]
    fn test_expand_granted_empty() {
        let r = resolver(TierHierarchy::chain());
        assert!(r.expand_granted(&[]).is_empty());
    }
}
