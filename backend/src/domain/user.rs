//! User identity types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored user account.
///
/// ## Invariants
/// - `username` is unique and immutable once created.
/// - `password_hash` is `None` for accounts created by an OAuth first login;
///   such accounts have no usable local password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Surrogate key generated by the credential store.
    pub user_id: i32,
    /// Unique login name.
    pub username: String,
    /// Salted one-way hash of the local password, when one exists.
    pub password_hash: Option<String>,
}

/// Identity attached to a session after successful authentication.
///
/// This is the only user shape that leaves the domain; the password hash
/// never crosses the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    /// Surrogate key of the authenticated account.
    #[schema(example = 42)]
    pub user_id: i32,
    /// Login name of the authenticated account.
    #[schema(example = "alice")]
    pub username: String,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username.clone(),
        }
    }
}
