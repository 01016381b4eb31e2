//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Stored value could not be mapped to a domain type
    #[error("decode error: {0}")]
    Decode(String),

    /// Capacity change would drop max_slots below the live signup count
    #[error("max_slots below current signup count ({signups})")]
    CapacityBelowSignups { signups: i64 },
}

/// Result alias for database operations
pub type DbResult<T> = Result<T, DbError>;
