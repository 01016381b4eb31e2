//! REST API handlers

pub mod bookings;
pub mod events;
pub mod health;
pub mod members;
pub mod subscriptions;
pub mod tiers;

pub use bookings::*;
pub use events::*;
pub use health::*;
pub use members::*;
pub use subscriptions::*;
pub use tiers::*;
