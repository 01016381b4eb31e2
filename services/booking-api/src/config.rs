//! Configuration for the Booking API service.

use std::time::Duration;

use chrono_tz::Tz;

use manta_booking_core::{BookingConfig, EligibilityRules, HierarchyMode, RuleEntry};

/// Booking API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Booking engine configuration
    pub booking: BookingConfig,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Club timezone; the cutoff and all date windows use it
        let timezone: Tz = std::env::var("CLUB_TIMEZONE")
            .unwrap_or_else(|_| "Europe/Amsterdam".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("CLUB_TIMEZONE"))?;

        // Tier hierarchy reading
        let hierarchy_mode: HierarchyMode = std::env::var("TIER_HIERARCHY")
            .unwrap_or_else(|_| "chain".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("TIER_HIERARCHY"))?;

        // Optional eligibility rule table; categories not listed fall back
        // to the default rule
        let rules = match std::env::var("RULES_PATH") {
            Ok(path) => load_rules(&path)?,
            Err(_) => EligibilityRules::new(),
        };

        // Request timeout
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Metrics
        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let booking = BookingConfig::new(timezone)
            .with_hierarchy_mode(hierarchy_mode)
            .with_rules(rules);

        Ok(Self {
            http_port,
            database_url,
            booking,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

fn load_rules(path: &str) -> Result<EligibilityRules, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::RulesFile(format!("{path}: {e}")))?;
    let entries: Vec<RuleEntry> = serde_json::from_str(&raw)
        .map_err(|e| ConfigError::RulesFile(format!("{path}: {e}")))?;
    Ok(EligibilityRules::from_entries(entries))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Failed to load rules file: {0}")]
    RulesFile(String),
}
