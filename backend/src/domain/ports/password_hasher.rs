//! Port abstraction for the password hashing primitive.

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing the plaintext failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed or compared.
        Verify { message: String } => "password verification failed: {message}",
    }
}

/// Slow, salted one-way hash used by the credential store.
///
/// Implementations are expected to be tuned so that verification costs on
/// the order of 100 ms, making offline guessing expensive.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` for a well-formed hash that does not match; an
    /// error only when the stored hash itself is unusable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
