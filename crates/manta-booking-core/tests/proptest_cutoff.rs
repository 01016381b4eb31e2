//! Property-based tests for the cutoff policy
//!
//! These verify the temporal gate of the engine:
//! - past dates are always rejected, future dates always allowed
//! - the same-day decision depends only on the local hour vs the cutoff
//! - booking and cancellation share one rule

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Europe::Amsterdam;
use manta_booking_core::{CutoffPolicy, CutoffReason, CUTOFF_HOUR};
use proptest::prelude::*;

fn policy() -> CutoffPolicy {
    CutoffPolicy::new(Amsterdam)
}

// ============================================================================
// Strategies
// ============================================================================

/// An instant whose Amsterdam-local wall clock is chosen uniformly in 2026
fn arb_local_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (0u32..365, 0u32..24, 0u32..60).prop_map(|(day, hour, minute)| {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(i64::from(day));
        // `earliest()` resolves DST gaps and ambiguities; the skipped hour
        // on the spring-forward day yields None and falls back to noon.
        Amsterdam
            .with_ymd_and_hms(date.year(), date.month(), date.day(), hour, minute, 0)
            .earliest()
            .unwrap_or_else(|| Amsterdam.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap())
            .with_timezone(&Utc)
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: events strictly in the local future (by date) are bookable
    #[test]
    fn prop_future_dates_allowed(now in arb_local_instant(), days_ahead in 1i64..400) {
        let p = policy();
        let event_date = p.local_date(now) + Duration::days(days_ahead);
        prop_assert!(p.can_book(event_date, now).allowed);
    }

    /// Property: events strictly in the local past are never bookable
    #[test]
    fn prop_past_dates_rejected(now in arb_local_instant(), days_behind in 1i64..400) {
        let p = policy();
        let event_date = p.local_date(now) - Duration::days(days_behind);
        let decision = p.can_book(event_date, now);
        prop_assert!(!decision.allowed);
        prop_assert_eq!(decision.reason, Some(CutoffReason::DatePassed));
    }

    /// Property: same-day booking is allowed exactly when the local hour is
    /// below the cutoff hour
    #[test]
    fn prop_same_day_hinges_on_cutoff_hour(now in arb_local_instant()) {
        let p = policy();
        let local_hour = now.with_timezone(&Amsterdam).hour();
        let decision = p.can_book(p.local_date(now), now);
        prop_assert_eq!(decision.allowed, local_hour < CUTOFF_HOUR);
    }

    /// Property: booking and cancellation decisions are identical
    #[test]
    fn prop_book_cancel_symmetric(now in arb_local_instant(), offset in -400i64..400) {
        let p = policy();
        let event_date = p.local_date(now) + Duration::days(offset);
        let book = p.can_book(event_date, now);
        let cancel = p.can_cancel(event_date, now);
        prop_assert_eq!(book.allowed, cancel.allowed);
        prop_assert_eq!(book.reason, cancel.reason);
    }
}
