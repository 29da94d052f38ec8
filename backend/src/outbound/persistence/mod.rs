//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: all database errors are mapped to the
//!   per-port error enums.

mod diesel_attendance_repository;
mod diesel_user_repository;
pub mod pool;
pub(crate) mod models;
pub(crate) mod schema;

pub use diesel_attendance_repository::DieselAttendanceRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::Connection as _;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Migrations compiled into the binary so deployments stay self-contained.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Error raised when startup migrations cannot be applied.
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to run database migrations: {message}")]
pub struct MigrationError {
    /// Driver-provided failure description.
    pub message: String,
}

/// Apply any pending migrations over a short-lived synchronous connection.
///
/// Runs once at startup, before the async pool is built.
///
/// # Errors
///
/// Returns [`MigrationError`] when the connection cannot be established or a
/// migration fails to apply.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn =
        diesel::pg::PgConnection::establish(database_url).map_err(|err| MigrationError {
            message: err.to_string(),
        })?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError {
            message: err.to_string(),
        })?;
    Ok(())
}
