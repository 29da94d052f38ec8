//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AuthService;
use crate::domain::ports::{AttendanceRepository, BusinessDirectory, OAuthExchange};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and authentication use-cases.
    pub auth: Arc<AuthService>,
    /// Venue-attendance ledger.
    pub attendance: Arc<dyn AttendanceRepository>,
    /// Upstream business search.
    pub directory: Arc<dyn BusinessDirectory>,
    /// OAuth provider exchange.
    pub oauth: Arc<dyn OAuthExchange>,
}

impl HttpState {
    /// Bundle the port implementations handlers depend on.
    pub fn new(
        auth: Arc<AuthService>,
        attendance: Arc<dyn AttendanceRepository>,
        directory: Arc<dyn BusinessDirectory>,
        oauth: Arc<dyn OAuthExchange>,
    ) -> Self {
        Self {
            auth,
            attendance,
            directory,
            oauth,
        }
    }
}
