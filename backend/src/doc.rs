//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every HTTP endpoint from the inbound layer, the shared
//! request/response schemas, and the session cookie security scheme. The
//! generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::AuthenticatedUser;
use crate::inbound::http::attendance::AttendanceRequest;
use crate::inbound::http::error::{ApiError, ErrorCode};
use crate::inbound::http::search::SearchRequest;
use crate::inbound::http::users::{CredentialsRequest, SessionSnapshot};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Nightlife backend API",
        description = "Session-authenticated venue attendance and business search."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_session,
        crate::inbound::http::oauth::github_login,
        crate::inbound::http::oauth::github_callback,
        crate::inbound::http::attendance::add_attendance,
        crate::inbound::http::attendance::remove_attendance,
        crate::inbound::http::attendance::number_attending,
        crate::inbound::http::search::search_venues,
        crate::inbound::http::search::get_venue,
    ),
    components(schemas(
        AuthenticatedUser,
        CredentialsRequest,
        SessionSnapshot,
        AttendanceRequest,
        SearchRequest,
        ApiError,
        ErrorCode,
    )),
    tags(
        (name = "users", description = "Accounts and sessions"),
        (name = "attendance", description = "Venue attendance ledger"),
        (name = "search", description = "Upstream business search proxy")
    )
)]
pub struct ApiDoc;
