//! Reqwest-backed `OAuthExchange` adapter for GitHub.
//!
//! Implements the server half of the authorization-code flow: building the
//! authorize redirect, posting the callback code for an access token, and
//! fetching the authenticated profile. GitHub rejects API requests without a
//! `User-Agent`, so every call carries one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use serde::Deserialize;

use crate::domain::OAuthProfile;
use crate::domain::ports::{OAuthExchange, OAuthExchangeError};

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";

const USER_AGENT: &str = concat!("nightlife-backend/", env!("CARGO_PKG_VERSION"));
const OAUTH_SCOPE: &str = "read:user";

/// Registered application credentials and callback target.
#[derive(Debug, Clone)]
pub struct GitHubOAuthConfig {
    /// OAuth app client id.
    pub client_id: String,
    /// OAuth app client secret.
    pub client_secret: String,
    /// Absolute URL GitHub redirects back to after consent.
    pub callback_url: Url,
}

/// GitHub-backed implementation of the `OAuthExchange` port.
pub struct GitHubOAuthExchange {
    client: Client,
    config: GitHubOAuthConfig,
    authorize_url: Url,
    token_url: Url,
    user_url: Url,
}

impl GitHubOAuthExchange {
    /// Build an exchange adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    ///
    /// # Panics
    ///
    /// Never in practice: the provider URLs are compile-time constants and
    /// parse unconditionally.
    pub fn new(config: GitHubOAuthConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let parse = |url: &str| Url::parse(url).unwrap_or_else(|_| unreachable!("constant URL"));
        Ok(Self {
            client,
            config,
            authorize_url: parse(AUTHORIZE_URL),
            token_url: parse(TOKEN_URL),
            user_url: parse(USER_URL),
        })
    }
}

#[derive(Debug, Deserialize)]
struct AccessTokenDto {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileDto {
    login: String,
}

/// Extract the access token, surfacing GitHub's structured error payloads.
/// GitHub reports exchange failures (bad code, expired code) with HTTP 200
/// and an `error` field, so status checks alone are not enough.
fn token_from_dto(dto: AccessTokenDto) -> Result<String, OAuthExchangeError> {
    if let Some(error) = dto.error {
        let detail = dto.error_description.unwrap_or_default();
        let message = if detail.is_empty() {
            error
        } else {
            format!("{error}: {detail}")
        };
        return Err(OAuthExchangeError::rejected(message));
    }
    dto.access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| OAuthExchangeError::decode("token response missing access_token"))
}

#[async_trait]
impl OAuthExchange for GitHubOAuthExchange {
    fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", self.config.callback_url.as_str())
            .append_pair("scope", OAUTH_SCOPE)
            .append_pair("state", state);
        url
    }

    async fn fetch_profile(&self, code: &str) -> Result<OAuthProfile, OAuthExchangeError> {
        let token_response = self
            .client
            .post(self.token_url.clone())
            .header(header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.callback_url.as_str()),
            ])
            .send()
            .await
            .map_err(|err| OAuthExchangeError::transport(err.to_string()))?;

        if !token_response.status().is_success() {
            return Err(OAuthExchangeError::transport(format!(
                "token endpoint returned status {}",
                token_response.status().as_u16()
            )));
        }

        let dto: AccessTokenDto = token_response
            .json()
            .await
            .map_err(|err| OAuthExchangeError::decode(err.to_string()))?;
        let token = token_from_dto(dto)?;

        let profile_response = self
            .client
            .get(self.user_url.clone())
            .bearer_auth(&token)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|err| OAuthExchangeError::transport(err.to_string()))?;

        if !profile_response.status().is_success() {
            return Err(OAuthExchangeError::transport(format!(
                "profile endpoint returned status {}",
                profile_response.status().as_u16()
            )));
        }

        let profile: ProfileDto = profile_response
            .json()
            .await
            .map_err(|err| OAuthExchangeError::decode(err.to_string()))?;
        Ok(OAuthProfile {
            login: profile.login,
        })
    }
}
