//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed domain entities and the authentication
//! service used by the HTTP layer. Keep types immutable and document
//! invariants in each type's Rustdoc. Transport and storage concerns live in
//! the inbound and outbound adapters.

pub mod auth;
pub mod auth_service;
pub mod ports;
pub mod user;

pub use self::auth::{AuthAttempt, LoginCredentials, LoginValidationError, OAuthProfile};
pub use self::auth_service::{AuthError, AuthService, RegistrationError};
pub use self::user::{AuthenticatedUser, User};
