//! Account and session API handlers.
//!
//! ```text
//! POST /api/register        {"username":"alice","password":"pw"}
//! POST /api/login           {"username":"alice","password":"pw"}
//! GET  /api/logout
//! GET  /api/current-session
//! ```
//!
//! Response bodies follow the historical wire contract of the service, so
//! several failure modes answer with HTTP 200 and a JSON `error` field.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::domain::{AuthAttempt, AuthError, AuthenticatedUser, LoginCredentials, RegistrationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub(crate) const MISSING_FIELDS_ERROR: &str = "Both username and password are required";
pub(crate) const DUPLICATE_USERNAME_ERROR: &str = "Please select another username";
pub(crate) const INTERNAL_ERROR: &str = "Internal server error";

/// Credentials body shared by `POST /api/register` and `POST /api/login`.
///
/// Both fields default to empty so absent and blank values fail validation
/// identically.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Session snapshot returned by login and `GET /api/current-session`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currently_logged_in: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_successful: Option<bool>,
    pub user_id: i32,
    pub username: String,
    pub venues_attending_ids: Vec<String>,
}

fn internal_error_response() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "error": INTERNAL_ERROR }))
}

async fn attendance_ids_for(
    state: &HttpState,
    user: &AuthenticatedUser,
) -> Result<Vec<String>, HttpResponse> {
    state
        .attendance
        .list_attendance_ids(user.user_id)
        .await
        .map_err(|err| {
            error!(error = %err, user_id = user.user_id, "failed to list attendance");
            internal_error_response()
        })
}

/// Create a local account.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 200, description = "Username already taken"),
        (status = 400, description = "Missing username or password"),
        (status = 500, description = "Storage failure")
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let Ok(credentials) = LoginCredentials::try_from_parts(&body.username, &body.password) else {
        return Ok(
            HttpResponse::BadRequest().json(json!({ "error": MISSING_FIELDS_ERROR }))
        );
    };

    match state.auth.register(&credentials).await {
        Ok(_) => Ok(HttpResponse::Created().json(json!({ "message": "User created successfully" }))),
        Err(RegistrationError::UsernameTaken) => {
            Ok(HttpResponse::Ok().json(json!({ "error": DUPLICATE_USERNAME_ERROR })))
        }
        Err(err) => {
            error!(error = %err, "registration failed");
            Ok(internal_error_response())
        }
    }
}

/// Authenticate with local credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = SessionSnapshot,
         headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Storage failure")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let Ok(credentials) = LoginCredentials::try_from_parts(&body.username, &body.password) else {
        return Ok(
            HttpResponse::BadRequest().json(json!({ "error": MISSING_FIELDS_ERROR }))
        );
    };

    let attempt = AuthAttempt::LocalCredentials(credentials);
    let user = match state.auth.authenticate(&attempt).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            return Ok(
                HttpResponse::Unauthorized().json(json!({ "currentlyLoggedIn": false }))
            );
        }
        Err(err) => {
            error!(error = %err, "login failed");
            return Ok(internal_error_response());
        }
    };

    session.persist_user(&user)?;
    let venues_attending_ids = match attendance_ids_for(&state, &user).await {
        Ok(ids) => ids,
        Err(response) => return Ok(response),
    };
    Ok(HttpResponse::Ok().json(SessionSnapshot {
        currently_logged_in: None,
        login_successful: Some(true),
        user_id: user.user_id,
        username: user.username,
        venues_attending_ids,
    }))
}

/// End the current session.
#[utoipa::path(
    get,
    path = "/api/logout",
    responses((status = 200, description = "Session ended")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[get("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::Ok().json(json!({ "logoutSuccessful": true })))
}

/// Report the caller's session state and attendance list.
#[utoipa::path(
    get,
    path = "/api/current-session",
    responses(
        (status = 200, description = "Session snapshot", body = SessionSnapshot),
        (status = 500, description = "Storage failure")
    ),
    tags = ["users"],
    operation_id = "currentSession",
    security([])
)]
#[get("/current-session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let Some(user) = session.current_user()? else {
        return Ok(HttpResponse::Ok().json(json!({ "currentlyLoggedIn": false })));
    };

    let venues_attending_ids = match attendance_ids_for(&state, &user).await {
        Ok(ids) => ids,
        Err(response) => return Ok(response),
    };
    Ok(HttpResponse::Ok().json(SessionSnapshot {
        currently_logged_in: Some(true),
        login_successful: None,
        user_id: user.user_id,
        username: user.username,
        venues_attending_ids,
    }))
}
