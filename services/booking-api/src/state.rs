//! Application state for the Booking API service.

use std::sync::Arc;

use manta_booking_core::BookingService;
use manta_db::pg::Repositories;
use manta_db::DbPool;

use crate::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Booking engine (reservations, entitlements, subscription lifecycle)
    pub booking: Arc<BookingService>,
    /// Database repositories for plain read and admin paths
    pub repos: Repositories,
    /// Database pool (readiness probe)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(booking: BookingService, repos: Repositories, pool: DbPool, config: Config) -> Self {
        Self {
            booking: Arc::new(booking),
            repos,
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
