//! Authentication service over the credential store and hashing ports.
//!
//! One `authenticate` entry point handles the closed [`AuthAttempt`] variant
//! set; registration shares the same insert path so OAuth first logins and
//! local signups create accounts through identical code.

use std::sync::Arc;

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository,
};
use crate::domain::{AuthAttempt, AuthenticatedUser, LoginCredentials, OAuthProfile};

/// Failures raised while authenticating a caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Unknown username, missing local password, or hash mismatch. The
    /// variants are deliberately collapsed so callers cannot distinguish
    /// which check failed.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Credential store failure.
    #[error(transparent)]
    Repository(#[from] UserPersistenceError),
    /// Hashing primitive failure.
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
}

/// Failures raised while registering a new account.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// The username is already taken.
    #[error("username already taken")]
    UsernameTaken,
    /// Credential store failure.
    #[error(transparent)]
    Repository(UserPersistenceError),
    /// Hashing primitive failure.
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
}

/// Authentication and registration over injected ports.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    /// Create a service backed by the given credential store and hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Register a new local account.
    ///
    /// The plaintext is hashed before touching the store; the store's unique
    /// constraint decides duplicate usernames, so two concurrent signups for
    /// the same name cannot both succeed.
    pub async fn register(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, RegistrationError> {
        let password_hash = self.hasher.hash(credentials.password())?;
        match self
            .users
            .insert_if_absent(credentials.username(), Some(&password_hash))
            .await
        {
            Ok(user) => Ok(AuthenticatedUser::from(&user)),
            Err(UserPersistenceError::DuplicateUsername) => Err(RegistrationError::UsernameTaken),
            Err(err) => Err(RegistrationError::Repository(err)),
        }
    }

    /// Resolve an authentication attempt to a session identity.
    pub async fn authenticate(
        &self,
        attempt: &AuthAttempt,
    ) -> Result<AuthenticatedUser, AuthError> {
        match attempt {
            AuthAttempt::LocalCredentials(credentials) => self.verify_local(credentials).await,
            AuthAttempt::OAuthProfile(profile) => self.resolve_oauth(profile).await,
        }
    }

    async fn verify_local(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, AuthError> {
        let Some(user) = self.users.find_by_username(credentials.username()).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        // OAuth-created accounts carry no usable local password.
        let Some(hash) = user.password_hash.as_deref() else {
            return Err(AuthError::InvalidCredentials);
        };
        if self.hasher.verify(credentials.password(), hash)? {
            Ok(AuthenticatedUser::from(&user))
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    /// First OAuth login creates the account with an unusable password
    /// rather than rejecting the caller.
    async fn resolve_oauth(&self, profile: &OAuthProfile) -> Result<AuthenticatedUser, AuthError> {
        if let Some(user) = self.users.find_by_username(&profile.login).await? {
            return Ok(AuthenticatedUser::from(&user));
        }
        match self.users.insert_if_absent(&profile.login, None).await {
            Ok(user) => Ok(AuthenticatedUser::from(&user)),
            // Lost a race against another callback for the same profile; the
            // winner's row serves both.
            Err(UserPersistenceError::DuplicateUsername) => self
                .users
                .find_by_username(&profile.login)
                .await?
                .map(|user| AuthenticatedUser::from(&user))
                .ok_or_else(|| {
                    AuthError::Repository(UserPersistenceError::query(
                        "user vanished after duplicate insert",
                    ))
                }),
            Err(err) => Err(AuthError::Repository(err)),
        }
    }
}
