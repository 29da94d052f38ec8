//! GitHub login handlers.
//!
//! ```text
//! GET /api/login/github            -> 302 to the provider consent page
//! GET /api/login/github/callback   -> 302 to / after completing the exchange
//! ```
//!
//! A random `state` token is stashed in the session before the redirect and
//! must match on the callback; any failure along the flow falls back to a
//! redirect to `/`, mirroring a browser-driven login.

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use rand::Rng as _;
use rand::distributions::Alphanumeric;
use serde::Deserialize;
use tracing::warn;

use crate::domain::AuthAttempt;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const STATE_TOKEN_LEN: usize = 32;

/// Query parameters GitHub appends to the callback redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

fn fresh_state_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(STATE_TOKEN_LEN)
        .map(char::from)
        .collect()
}

fn redirect_home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Start the GitHub login flow.
#[utoipa::path(
    get,
    path = "/api/login/github",
    responses((status = 302, description = "Redirect to the provider consent page")),
    tags = ["users"],
    operation_id = "githubLogin",
    security([])
)]
#[get("/login/github")]
pub async fn github_login(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let token = fresh_state_token();
    session.set_oauth_state(&token)?;
    let url = state.oauth.authorize_url(&token);
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url.to_string()))
        .finish())
}

/// Complete the GitHub login flow.
///
/// Establishes a session and redirects to `/`; a missing code, a state
/// mismatch, or a failed exchange redirects to `/` without a session.
#[utoipa::path(
    get,
    path = "/api/login/github/callback",
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("state" = Option<String>, Query, description = "CSRF state token")
    ),
    responses((status = 302, description = "Redirect to the application root")),
    tags = ["users"],
    operation_id = "githubCallback",
    security([])
)]
#[get("/login/github/callback")]
pub async fn github_callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    let expected_state = session.take_oauth_state()?;
    let query = query.into_inner();

    let state_matches = matches!(
        (&expected_state, &query.state),
        (Some(expected), Some(received)) if expected == received
    );
    if !state_matches {
        warn!("oauth callback state mismatch");
        return Ok(redirect_home());
    }
    let Some(code) = query.code.as_deref() else {
        warn!("oauth callback missing code");
        return Ok(redirect_home());
    };

    let profile = match state.oauth.fetch_profile(code).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!(error = %err, "oauth exchange failed");
            return Ok(redirect_home());
        }
    };

    match state
        .auth
        .authenticate(&AuthAttempt::OAuthProfile(profile))
        .await
    {
        Ok(user) => {
            session.persist_user(&user)?;
            Ok(redirect_home())
        }
        Err(err) => {
            warn!(error = %err, "oauth login failed");
            Ok(redirect_home())
        }
    }
}
