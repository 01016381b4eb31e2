//! Manta DB - Database abstractions
//!
//! SQLx-based database layer for Manta services.
//!
//! # Example
//!
//! ```rust,ignore
//! use manta_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/manta").await?;
//! manta_db::run_migrations(&pool).await?;
//! let repos = Repositories::new(pool);
//!
//! let member = repos.members.find_by_email("diver@example.com").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;

/// Embedded migrations for the Manta schema
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Apply pending migrations
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
