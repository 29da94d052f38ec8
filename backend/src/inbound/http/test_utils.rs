//! Test helpers for inbound HTTP components.
//!
//! Provides a session middleware configured for plain-HTTP tests plus
//! in-memory port implementations so handler tests run without a database
//! or network.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use async_trait::async_trait;
use serde_json::{Value, json};
use url::Url;

use crate::domain::ports::{
    AttendanceError, AttendanceRepository, BusinessDirectory, DirectoryError, OAuthExchange,
    OAuthExchangeError, SearchFilters, UserPersistenceError, UserRepository,
};
use crate::domain::{AuthService, OAuthProfile, User};
use crate::inbound::http::state::HttpState;
use crate::outbound::security::Argon2PasswordHasher;

/// Location sentinel the stub directory reports as unknown.
pub const UNKNOWN_LOCATION: &str = "atlantis";
/// Business id sentinel the stub directory fails to fetch.
pub const BROKEN_VENUE_ID: &str = "broken-venue";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory credential store mirroring the serial-key and unique-username
/// behaviour of the real table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("user store poisoned");
        Ok(users.iter().find(|user| user.username == username).cloned())
    }

    async fn insert_if_absent(
        &self,
        username: &str,
        password_hash: Option<&str>,
    ) -> Result<User, UserPersistenceError> {
        let mut users = self.users.lock().expect("user store poisoned");
        if users.iter().any(|user| user.username == username) {
            return Err(UserPersistenceError::DuplicateUsername);
        }
        let user = User {
            user_id: i32::try_from(users.len()).expect("test store fits in i32") + 1,
            username: username.to_owned(),
            password_hash: password_hash.map(str::to_owned),
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// In-memory attendance ledger with set semantics over (user, venue) pairs.
#[derive(Default)]
pub struct InMemoryAttendanceRepository {
    entries: Mutex<Vec<(i32, String)>>,
}

#[async_trait]
impl AttendanceRepository for InMemoryAttendanceRepository {
    async fn add_attendance(
        &self,
        user_id: i32,
        venue_yelp_id: &str,
    ) -> Result<(), AttendanceError> {
        let mut entries = self.entries.lock().expect("ledger poisoned");
        let entry = (user_id, venue_yelp_id.to_owned());
        if !entries.contains(&entry) {
            entries.push(entry);
        }
        Ok(())
    }

    async fn remove_attendance(
        &self,
        user_id: i32,
        venue_yelp_id: &str,
    ) -> Result<(), AttendanceError> {
        let mut entries = self.entries.lock().expect("ledger poisoned");
        entries.retain(|(uid, vid)| !(*uid == user_id && vid == venue_yelp_id));
        Ok(())
    }

    async fn list_attendance_ids(&self, user_id: i32) -> Result<Vec<String>, AttendanceError> {
        let entries = self.entries.lock().expect("ledger poisoned");
        Ok(entries
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, vid)| vid.clone())
            .collect())
    }

    async fn count_attendees(&self, venue_yelp_id: &str) -> Result<i64, AttendanceError> {
        let entries = self.entries.lock().expect("ledger poisoned");
        Ok(entries
            .iter()
            .filter(|(_, vid)| vid == venue_yelp_id)
            .count() as i64)
    }
}

/// Canned business directory: echoes requests back as JSON and fails on the
/// sentinel inputs.
pub struct StubDirectory;

#[async_trait]
impl BusinessDirectory for StubDirectory {
    async fn search(
        &self,
        location: &str,
        filters: &SearchFilters,
    ) -> Result<Value, DirectoryError> {
        if location == UNKNOWN_LOCATION {
            return Err(DirectoryError::LocationNotFound);
        }
        Ok(json!({
            "businesses": [{"id": "stub-venue", "name": "Stub Venue"}],
            "total": 1,
            "location": location,
            "offset": filters.offset,
        }))
    }

    async fn get_business(&self, venue_yelp_id: &str) -> Result<Value, DirectoryError> {
        if venue_yelp_id == BROKEN_VENUE_ID {
            return Err(DirectoryError::transport("status 502"));
        }
        Ok(json!({"id": venue_yelp_id, "name": "Stub Venue"}))
    }
}

/// OAuth exchange that accepts one fixed code.
pub struct StubOAuth {
    /// Callback code the stub accepts.
    pub valid_code: String,
    /// Profile returned for the valid code.
    pub profile: OAuthProfile,
}

impl Default for StubOAuth {
    fn default() -> Self {
        Self {
            valid_code: "good-code".into(),
            profile: OAuthProfile {
                login: "octocat".into(),
            },
        }
    }
}

#[async_trait]
impl OAuthExchange for StubOAuth {
    fn authorize_url(&self, state: &str) -> Url {
        let mut url =
            Url::parse("https://provider.test/oauth/authorize").expect("stub URL parses");
        url.query_pairs_mut().append_pair("state", state);
        url
    }

    async fn fetch_profile(&self, code: &str) -> Result<OAuthProfile, OAuthExchangeError> {
        if code == self.valid_code {
            Ok(self.profile.clone())
        } else {
            Err(OAuthExchangeError::rejected("bad_verification_code"))
        }
    }
}

/// Handler state wired entirely from in-memory ports.
pub fn test_state() -> HttpState {
    let users = Arc::new(InMemoryUserRepository::default());
    let auth = Arc::new(AuthService::new(users, Arc::new(Argon2PasswordHasher::new())));
    HttpState::new(
        auth,
        Arc::new(InMemoryAttendanceRepository::default()),
        Arc::new(StubDirectory),
        Arc::new(StubOAuth::default()),
    )
}
