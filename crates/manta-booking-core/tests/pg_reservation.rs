//! Postgres-backed reservation tests
//!
//! These exercise the transactional guarantees against a live database and
//! are ignored by default; run them with a scratch Postgres via
//!
//! ```text
//! DATABASE_URL=postgres://localhost/manta_test cargo test -- --ignored
//! ```

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Europe::Amsterdam;
use uuid::Uuid;

use manta_booking_core::{
    BookingConfig, BookingError, BookingService, CategoryRule, EligibilityRules, TierGrant,
};
use manta_db::{CreateEvent, CreateMember, DbError, DbPool, EventRepository, MemberRepository,
    Repositories, SignupRepository, SubscriptionRepository};
use manta_types::{EventId, EventPatch, MemberId, SubscriptionId, Tier};

async fn setup() -> (BookingService, Repositories, DbPool) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for pg tests");
    let pool = manta_db::create_pool(&url).await.expect("connect");
    manta_db::run_migrations(&pool).await.expect("migrate");

    let rules = EligibilityRules::new().with_rule(
        "depth_training",
        CategoryRule {
            requires_active_subscription: true,
            allowed_tiers: [Tier::Deep].into_iter().collect(),
        },
    );
    let config = BookingConfig::new(Amsterdam).with_rules(rules);
    let service = BookingService::new(pool.clone(), config);
    let repos = Repositories::new(pool.clone());

    (service, repos, pool)
}

fn local_today() -> NaiveDate {
    Utc::now().with_timezone(&Amsterdam).date_naive()
}

async fn seed_member(repos: &Repositories) -> MemberId {
    let id = Uuid::new_v4();
    repos
        .members
        .create(CreateMember {
            id,
            name: "Test Diver".to_string(),
            email: format!("{id}@example.com"),
        })
        .await
        .expect("create member");
    MemberId(id)
}

async fn seed_active_subscription(
    service: &BookingService,
    member: MemberId,
    entries: i32,
    tier: Tier,
) -> SubscriptionId {
    let today = local_today();
    let sub = service
        .create_subscription(
            member,
            today - Duration::days(1),
            today + Duration::days(180),
            25_000,
            "EUR".to_string(),
            entries,
        )
        .await
        .expect("create subscription");
    service
        .activate_subscription(sub.id, TierGrant::new(tier))
        .await
        .expect("activate subscription");
    sub.id
}

async fn seed_event(repos: &Repositories, category: &str, max_slots: i32) -> EventId {
    let id = Uuid::new_v4();
    repos
        .events
        .create(CreateEvent {
            id,
            category: category.to_string(),
            event_date: local_today() + Duration::days(2),
            starts_at: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            ends_at: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            max_slots,
        })
        .await
        .expect("create event");
    EventId(id)
}

#[tokio::test]
#[ignore]
async fn test_last_slot_race_has_one_winner() {
    let (service, repos, _pool) = setup().await;

    let m1 = seed_member(&repos).await;
    let m2 = seed_member(&repos).await;
    seed_active_subscription(&service, m1, 5, Tier::Open).await;
    seed_active_subscription(&service, m2, 5, Tier::Open).await;
    let event = seed_event(&repos, "pool_session", 1).await;

    let now = Utc::now();
    let (r1, r2) = tokio::join!(service.book(m1, event, now), service.book(m2, event, now));

    let successes = [&r1, &r2].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one booking must win the last slot");

    let loser = if r1.is_ok() { r2 } else { r1 };
    assert!(
        matches!(loser, Err(BookingError::EventFull)),
        "loser must see EventFull, got {loser:?}"
    );

    let count = repos.signups.count_for_event(event.0).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore]
async fn test_book_then_cancel_round_trip() {
    let (service, repos, _pool) = setup().await;

    let member = seed_member(&repos).await;
    let sub_id = seed_active_subscription(&service, member, 10, Tier::Open).await;
    let event = seed_event(&repos, "pool_session", 8).await;

    let now = Utc::now();
    service.book(member, event, now).await.expect("book");

    let sub = repos.subscriptions.find_by_id(sub_id.0).await.unwrap().unwrap();
    assert_eq!(sub.entries_left, 9);

    service.cancel(member, event, now).await.expect("cancel");

    let sub = repos.subscriptions.find_by_id(sub_id.0).await.unwrap().unwrap();
    assert_eq!(sub.entries_left, 10);
    assert_eq!(repos.signups.count_for_event(event.0).await.unwrap(), 0);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_booking_rejected() {
    let (service, repos, _pool) = setup().await;

    let member = seed_member(&repos).await;
    seed_active_subscription(&service, member, 10, Tier::Open).await;
    let event = seed_event(&repos, "pool_session", 8).await;

    let now = Utc::now();
    service.book(member, event, now).await.expect("first book");
    let second = service.book(member, event, now).await;

    assert!(matches!(second, Err(BookingError::AlreadyBooked)));
    assert_eq!(repos.signups.count_for_event(event.0).await.unwrap(), 1);
}

#[tokio::test]
#[ignore]
async fn test_credit_exhaustion() {
    let (service, repos, _pool) = setup().await;

    let member = seed_member(&repos).await;
    seed_active_subscription(&service, member, 1, Tier::Open).await;
    let e1 = seed_event(&repos, "pool_session", 8).await;
    let e2 = seed_event(&repos, "pool_session", 8).await;

    let now = Utc::now();
    service.book(member, e1, now).await.expect("first book");
    let second = service.book(member, e2, now).await;

    assert!(matches!(second, Err(BookingError::InsufficientCredit)));
}

#[tokio::test]
#[ignore]
async fn test_tier_gate_enforced_in_transaction() {
    let (service, repos, _pool) = setup().await;

    let member = seed_member(&repos).await;
    seed_active_subscription(&service, member, 5, Tier::Open).await;
    let event = seed_event(&repos, "depth_training", 8).await;

    let result = service.book(member, event, Utc::now()).await;
    assert!(matches!(result, Err(BookingError::NotAuthorized)));
}

#[tokio::test]
#[ignore]
async fn test_capacity_shrink_below_signups_rejected() {
    let (service, repos, _pool) = setup().await;

    let m1 = seed_member(&repos).await;
    let m2 = seed_member(&repos).await;
    seed_active_subscription(&service, m1, 5, Tier::Open).await;
    seed_active_subscription(&service, m2, 5, Tier::Open).await;
    let event = seed_event(&repos, "pool_session", 2).await;

    let now = Utc::now();
    service.book(m1, event, now).await.expect("first book");
    service.book(m2, event, now).await.expect("second book");

    let shrink = EventPatch {
        max_slots: Some(1),
        ..Default::default()
    };
    let result = repos.events.update(event.0, shrink).await;
    assert!(
        matches!(result, Err(DbError::CapacityBelowSignups { signups: 2 })),
        "shrink below the live signup count must be rejected, got {result:?}"
    );

    // unchanged capacity after the rejection
    let row = repos.events.find_by_id(event.0).await.unwrap().unwrap();
    assert_eq!(row.max_slots, 2);

    // shrinking to exactly the live count is allowed
    let to_count = EventPatch {
        max_slots: Some(2),
        ..Default::default()
    };
    let updated = repos.events.update(event.0, to_count).await.expect("shrink to count");
    assert_eq!(updated.max_slots, 2);
}

#[tokio::test]
#[ignore]
async fn test_renewal_supersedes_prior_active() {
    let (service, repos, _pool) = setup().await;

    let member = seed_member(&repos).await;
    let first = seed_active_subscription(&service, member, 5, Tier::Open).await;
    let second = seed_active_subscription(&service, member, 10, Tier::Deep).await;

    let subs = repos.subscriptions.find_by_member(member.0).await.unwrap();
    let active: Vec<_> = subs.iter().filter(|s| s.status == "active").collect();
    assert_eq!(active.len(), 1, "at most one ACTIVE subscription");
    assert_eq!(active[0].id, second.0);

    let old = repos.subscriptions.find_by_id(first.0).await.unwrap().unwrap();
    assert_eq!(old.status, "cancelled");
}
