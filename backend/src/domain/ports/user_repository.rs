//! Port abstraction for the credential store.

use async_trait::async_trait;

use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by credential store adapters.
    pub enum UserPersistenceError {
        /// The username already exists; the unique constraint rejected the insert.
        DuplicateUsername => "username already registered",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Credential store mapping login names to account records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Exact-match lookup by login name.
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new account unless the username is taken.
    ///
    /// `password_hash` is `None` for accounts created by an OAuth login.
    /// Returns [`UserPersistenceError::DuplicateUsername`] when the unique
    /// constraint on `username` rejects the insert, which keeps concurrent
    /// registrations race-safe without a prior lookup.
    async fn insert_if_absent(
        &self,
        username: &str,
        password_hash: Option<&str>,
    ) -> Result<User, UserPersistenceError>;
}
