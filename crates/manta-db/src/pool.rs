//! Database connection pool
//!
//! Pool sizing is tuned for the booking write path: bookings hold row locks
//! for the length of a transaction, so a modest pool with a bounded acquire
//! wait degrades into clean `TransientStore` rejections instead of piling up
//! lock waiters.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Database connection pool type alias
pub type DbPool = PgPool;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a new database connection pool
///
/// Pool size comes from `DATABASE_MAX_CONNECTIONS` when set.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let max_connections = parse_max_connections(std::env::var("DATABASE_MAX_CONNECTIONS").ok());

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

fn parse_max_connections(raw: Option<String>) -> u32 {
    raw.and_then(|v| v.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_CONNECTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_connections_from_env_value() {
        assert_eq!(parse_max_connections(Some("25".to_string())), 25);
    }

    #[test]
    fn test_max_connections_falls_back_on_bad_input() {
        assert_eq!(parse_max_connections(None), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(
            parse_max_connections(Some("not-a-number".to_string())),
            DEFAULT_MAX_CONNECTIONS
        );
        assert_eq!(
            parse_max_connections(Some("0".to_string())),
            DEFAULT_MAX_CONNECTIONS
        );
    }
}
