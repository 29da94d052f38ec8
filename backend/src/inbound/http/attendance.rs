//! Venue-attendance API handlers.
//!
//! ```text
//! POST /api/venues-attending        {"venueYelpId":"...","userId":1}
//! POST /api/venue-remove            {"venueYelpId":"...","userId":1}
//! GET  /api/number-attending/{yelpId}
//! ```
//!
//! These routes require an authenticated session and stop immediately when
//! there is none. The session identity is authoritative for ledger writes;
//! the `userId` body field is only validated for presence to keep the wire
//! contract stable.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::domain::AuthenticatedUser;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

pub(crate) const LOGIN_REQUIRED_MESSAGE: &str =
    "Please login before attempting to access this route.";
pub(crate) const PAYLOAD_ERROR_MESSAGE: &str = "Error adding venue to plans. Venue and/or user \
     data not received correctly. Try refreshing the page and searching again, or else log in \
     again.";

/// Attendance mutation body shared by the add and remove routes.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    #[serde(default)]
    pub venue_yelp_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<i32>,
}

impl AttendanceRequest {
    /// Venue id when both payload fields arrived non-empty.
    fn venue_id(&self) -> Option<&str> {
        let venue = self.venue_yelp_id.as_deref().filter(|id| !id.is_empty())?;
        self.user_id?;
        Some(venue)
    }
}

fn login_required() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({ "message": LOGIN_REQUIRED_MESSAGE }))
}

fn require_user(session: &SessionContext) -> Result<AuthenticatedUser, HttpResponse> {
    match session.current_user() {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(login_required()),
        Err(err) => Err(actix_web::ResponseError::error_response(&err)),
    }
}

/// Record that the caller plans to attend a venue.
#[utoipa::path(
    post,
    path = "/api/venues-attending",
    request_body = AttendanceRequest,
    responses(
        (status = 200, description = "Insert outcome"),
        (status = 401, description = "No authenticated session")
    ),
    tags = ["attendance"],
    operation_id = "addAttendance"
)]
#[post("/venues-attending")]
pub async fn add_attendance(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AttendanceRequest>,
) -> ApiResult<HttpResponse> {
    let user = match require_user(&session) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let Some(venue_yelp_id) = payload.venue_id() else {
        return Ok(HttpResponse::Ok().json(json!({ "error": PAYLOAD_ERROR_MESSAGE })));
    };

    match state.attendance.add_attendance(user.user_id, venue_yelp_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "insertSuccessful": true,
            "message":
                format!("Successfully inserted venue with id {venue_yelp_id} into database"),
        }))),
        Err(err) => {
            error!(error = %err, venue_yelp_id, "failed to record attendance");
            Ok(HttpResponse::Ok().json(json!({
                "insertSuccessful": false,
                "error": err.to_string(),
            })))
        }
    }
}

/// Remove the caller's attendance mark for a venue.
#[utoipa::path(
    post,
    path = "/api/venue-remove",
    request_body = AttendanceRequest,
    responses(
        (status = 200, description = "Remove outcome"),
        (status = 401, description = "No authenticated session")
    ),
    tags = ["attendance"],
    operation_id = "removeAttendance"
)]
#[post("/venue-remove")]
pub async fn remove_attendance(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AttendanceRequest>,
) -> ApiResult<HttpResponse> {
    let user = match require_user(&session) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let Some(venue_yelp_id) = payload.venue_id() else {
        return Ok(HttpResponse::Ok().json(json!({ "error": PAYLOAD_ERROR_MESSAGE })));
    };

    match state
        .attendance
        .remove_attendance(user.user_id, venue_yelp_id)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "removeSuccessful": true,
            "message":
                format!("Successfully removed venue with id {venue_yelp_id} from database"),
        }))),
        Err(err) => {
            error!(error = %err, venue_yelp_id, "failed to remove attendance");
            Ok(HttpResponse::Ok().json(json!({
                "removeSuccessful": false,
                "error": err.to_string(),
            })))
        }
    }
}

/// Count how many users plan to attend a venue.
#[utoipa::path(
    get,
    path = "/api/number-attending/{yelpId}",
    params(("yelpId" = String, Path, description = "External venue id")),
    responses(
        (status = 200, description = "Attendee count"),
        (status = 401, description = "No authenticated session")
    ),
    tags = ["attendance"],
    operation_id = "numberAttending"
)]
#[get("/number-attending/{yelp_id}")]
pub async fn number_attending(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    if let Err(response) = require_user(&session) {
        return Ok(response);
    }
    let venue_yelp_id = path.into_inner();

    match state.attendance.count_attendees(&venue_yelp_id).await {
        Ok(attending_count) => Ok(HttpResponse::Ok().json(json!({
            "countAttendeesSuccessful": true,
            "attendingCount": attending_count,
        }))),
        Err(err) => {
            error!(error = %err, venue_yelp_id, "failed to count attendees");
            Ok(HttpResponse::Ok().json(json!({
                "countAttendeesSuccessful": false,
                "error": err.to_string(),
            })))
        }
    }
}
