//! PostgreSQL repository implementations

mod event;
mod member;
mod membership;
mod signup;
mod subscription;

pub use event::PgEventRepository;
pub use member::PgMemberRepository;
pub use membership::PgGroupMembershipRepository;
pub use signup::PgSignupRepository;
pub use subscription::PgSubscriptionRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub members: PgMemberRepository,
    pub subscriptions: PgSubscriptionRepository,
    pub memberships: PgGroupMembershipRepository,
    pub events: PgEventRepository,
    pub signups: PgSignupRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            members: PgMemberRepository::new(pool.clone()),
            subscriptions: PgSubscriptionRepository::new(pool.clone()),
            memberships: PgGroupMembershipRepository::new(pool.clone()),
            events: PgEventRepository::new(pool.clone()),
            signups: PgSignupRepository::new(pool),
        }
    }
}
