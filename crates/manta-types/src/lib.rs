//! Manta Types - Shared domain types
//!
//! This crate contains domain types used across Manta services:
//! - Member identity and lifecycle
//! - Access tiers and group memberships
//! - Subscriptions and entry balances
//! - Events and signups

pub mod event;
pub mod member;
pub mod membership;
pub mod signup;
pub mod subscription;
pub mod tier;

pub use event::*;
pub use member::*;
pub use membership::*;
pub use signup::*;
pub use subscription::*;
pub use tier::*;
