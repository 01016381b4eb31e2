//! Cutoff policy
//!
//! Booking and cancellation close at the same deadline: a fixed same-day
//! hour in the club's civil timezone. The rule is intentionally symmetric so
//! a member can never cancel an event they could no longer book, which keeps
//! instructor staffing stable against late churn.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

/// Local hour after which same-day booking and cancellation are closed
pub const CUTOFF_HOUR: u32 = 18;

/// Why the cutoff rejected an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffReason {
    /// The event's date is already in the past
    DatePassed,
    /// Same-day request at or after the cutoff hour
    SameDayAfterCutoff,
}

/// Cutoff decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutoffDecision {
    /// Whether the operation is temporally permitted
    pub allowed: bool,
    /// Reason when not allowed
    pub reason: Option<CutoffReason>,
}

impl CutoffDecision {
    const ALLOWED: Self = Self {
        allowed: true,
        reason: None,
    };

    const fn denied(reason: CutoffReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Same-day cutoff policy, evaluated in an explicit civil timezone
///
/// Both sides of the date comparison use the same timezone; converting `now`
/// first avoids off-by-one-day results around DST transitions.
#[derive(Debug, Clone, Copy)]
pub struct CutoffPolicy {
    tz: Tz,
}

impl CutoffPolicy {
    /// Create a cutoff policy for the club's timezone
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The policy's timezone
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// The current civil date in the club's timezone
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    /// Whether booking the event is temporally permitted
    pub fn can_book(&self, event_date: NaiveDate, now: DateTime<Utc>) -> CutoffDecision {
        self.check(event_date, now)
    }

    /// Whether cancelling a signup on the event is temporally permitted
    ///
    /// Same rule as booking.
    pub fn can_cancel(&self, event_date: NaiveDate, now: DateTime<Utc>) -> CutoffDecision {
        self.check(event_date, now)
    }

    fn check(&self, event_date: NaiveDate, now: DateTime<Utc>) -> CutoffDecision {
        let local = now.with_timezone(&self.tz);
        let today = local.date_naive();

        if event_date < today {
            return CutoffDecision::denied(CutoffReason::DatePassed);
        }
        if event_date == today && local.hour() >= CUTOFF_HOUR {
            return CutoffDecision::denied(CutoffReason::SameDayAfterCutoff);
        }
        CutoffDecision::ALLOWED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Amsterdam;

    fn policy() -> CutoffPolicy {
        CutoffPolicy::new(Amsterdam)
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Amsterdam
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_future_event_allowed() {
        let decision = policy().can_book(date(2026, 3, 20), local(2026, 3, 10, 23, 0));
        assert!(decision.allowed);
    }

    #[test]
    fn test_past_event_rejected() {
        let decision = policy().can_book(date(2026, 3, 9), local(2026, 3, 10, 8, 0));
        assert_eq!(decision.reason, Some(CutoffReason::DatePassed));
    }

    #[test]
    fn test_same_day_before_cutoff_allowed() {
        let decision = policy().can_book(date(2026, 3, 10), local(2026, 3, 10, 17, 59));
        assert!(decision.allowed);
    }

    #[test]
    fn test_same_day_at_cutoff_rejected() {
        let decision = policy().can_book(date(2026, 3, 10), local(2026, 3, 10, 18, 0));
        assert_eq!(decision.reason, Some(CutoffReason::SameDayAfterCutoff));
    }

    #[test]
    fn test_cancel_uses_same_rule() {
        let now = local(2026, 3, 10, 18, 30);
        let book = policy().can_book(date(2026, 3, 10), now);
        let cancel = policy().can_cancel(date(2026, 3, 10), now);
        assert_eq!(book.allowed, cancel.allowed);
        assert_eq!(book.reason, cancel.reason);
    }

    #[test]
    fn test_timezone_not_server_local() {
        // 23:30 UTC on the 10th is already the 11th in Amsterdam; an event
        // on the 10th must be rejected as past.
        let now = Utc.with_ymd_and_hms(2026, 6, 10, 23, 30, 0).unwrap();
        let decision = policy().can_book(date(2026, 6, 10), now);
        assert_eq!(decision.reason, Some(CutoffReason::DatePassed));
    }

    #[test]
    fn test_dst_transition_day() {
        // Europe switches to summer time on 2026-03-29. 15:59 UTC is 17:59
        // local (UTC+2); one minute later crosses the cutoff.
        let before = Utc.with_ymd_and_hms(2026, 3, 29, 15, 59, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 3, 29, 16, 0, 0).unwrap();
        let event = date(2026, 3, 29);

        assert!(policy().can_book(event, before).allowed);
        assert!(!policy().can_book(event, after).allowed);
    }
}
