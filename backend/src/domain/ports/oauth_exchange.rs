//! Port abstraction for the OAuth provider exchange.

use async_trait::async_trait;
use url::Url;

use crate::domain::OAuthProfile;

use super::define_port_error;

define_port_error! {
    /// Failures raised by OAuth exchange adapters.
    pub enum OAuthExchangeError {
        /// Request failed in transit or the provider answered non-2xx.
        Transport { message: String } => "oauth exchange request failed: {message}",
        /// Provider body could not be decoded.
        Decode { message: String } => "oauth exchange payload invalid: {message}",
        /// Provider refused to issue an access token for the code.
        Rejected { message: String } => "oauth exchange rejected: {message}",
    }
}

/// Two-leg OAuth collaborator: redirect URL construction and the
/// code-for-profile exchange. The CSRF `state` token is round-tripped by the
/// caller through the session.
#[async_trait]
pub trait OAuthExchange: Send + Sync {
    /// Provider authorize URL for the redirect leg of the flow.
    fn authorize_url(&self, state: &str) -> Url;

    /// Exchange the callback `code` for the provider profile.
    async fn fetch_profile(&self, code: &str) -> Result<OAuthProfile, OAuthExchangeError>;
}
