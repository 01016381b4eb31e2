//! Manta Booking Core - Booking and entitlement engine
//!
//! The component that decides, atomically and correctly under concurrent
//! access, whether a member may reserve or release an event slot, and keeps
//! capacity counts and entry balances consistent. All contended state lives
//! in Postgres; every decision is re-read inside the booking transaction
//! under row locks.
//!
//! # Example
//!
//! ```rust,ignore
//! use manta_booking_core::{BookingConfig, BookingService};
//!
//! let config = BookingConfig::new(chrono_tz::Europe::Amsterdam)
//!     .with_rules(rules);
//! let booking = BookingService::new(pool, config);
//!
//! let signup = booking.book(member_id, event_id, Utc::now()).await?;
//! ```

pub mod config;
pub mod cutoff;
pub mod enrollment;
pub mod error;
pub mod hierarchy;
pub mod reservation;
pub mod resolver;
pub mod rules;
pub mod service;

pub use config::BookingConfig;
pub use cutoff::{CutoffDecision, CutoffPolicy, CutoffReason, CUTOFF_HOUR};
pub use enrollment::{EnrollmentManager, TierGrant};
pub use error::{BookingError, EnrollmentError};
pub use hierarchy::{HierarchyMode, TierHierarchy};
pub use reservation::ReservationManager;
pub use resolver::EntitlementResolver;
pub use rules::{CategoryRule, EligibilityRules, RuleEntry};
pub use service::BookingService;
