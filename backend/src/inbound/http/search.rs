//! Business-search proxy handlers.
//!
//! ```text
//! POST /api/yelp-data/{location}               {"searchOffset":0,...}
//! GET  /api/get-venues-attending/{venueYelpId}
//! ```
//!
//! Upstream JSON is relayed unchanged; only failures are reshaped into the
//! historical bodies.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::domain::ports::{DirectoryError, SearchFilters};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

pub(crate) const LOCATION_NOT_FOUND_MESSAGE: &str = "No venue information was found for that \
     location, please try searching another locality.";

/// Search filter body for `POST /api/yelp-data/{location}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Pagination offset into upstream results.
    #[serde(default)]
    pub search_offset: u32,
    /// Restrict results to venues open at query time.
    #[serde(default)]
    pub search_is_open_now: bool,
    /// Upstream sort mode, forwarded verbatim.
    #[serde(default)]
    pub search_sort_by: Option<String>,
    /// Price ceiling knob; expanded to cumulative levels upstream.
    #[serde(default)]
    pub search_price: Option<u8>,
}

impl From<SearchRequest> for SearchFilters {
    fn from(request: SearchRequest) -> Self {
        Self {
            offset: request.search_offset,
            open_now: request.search_is_open_now,
            sort_by: request.search_sort_by,
            price: request.search_price,
        }
    }
}

/// Proxy a venue search to the upstream directory.
#[utoipa::path(
    post,
    path = "/api/yelp-data/{location}",
    request_body = SearchRequest,
    params(("location" = String, Path, description = "Locality search term")),
    responses(
        (status = 200, description = "Upstream search results"),
        (status = 400, description = "Unknown location"),
        (status = 500, description = "Upstream failure")
    ),
    tags = ["search"],
    operation_id = "searchVenues",
    security([])
)]
#[post("/yelp-data/{location}")]
pub async fn search_venues(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<SearchRequest>,
) -> ApiResult<HttpResponse> {
    let location = path.into_inner();
    let filters = SearchFilters::from(payload.into_inner());

    match state.directory.search(&location, &filters).await {
        Ok(body) => Ok(HttpResponse::Ok().json(body)),
        Err(DirectoryError::LocationNotFound) => Ok(HttpResponse::BadRequest().json(json!({
            "locationFound": false,
            "message": LOCATION_NOT_FOUND_MESSAGE,
        }))),
        Err(err) => {
            error!(error = %err, location, "venue search failed");
            Ok(HttpResponse::InternalServerError()
                .json(json!({ "error": "Internal Server Error" })))
        }
    }
}

/// Fetch one business record from the upstream directory.
#[utoipa::path(
    get,
    path = "/api/get-venues-attending/{venueYelpId}",
    params(("venueYelpId" = String, Path, description = "External venue id")),
    responses((status = 200, description = "Upstream business record, or an error body")),
    tags = ["search"],
    operation_id = "getVenue",
    security([])
)]
#[get("/get-venues-attending/{venue_yelp_id}")]
pub async fn get_venue(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let venue_yelp_id = path.into_inner();

    match state.directory.get_business(&venue_yelp_id).await {
        Ok(body) => Ok(HttpResponse::Ok().json(body)),
        Err(err) => {
            error!(error = %err, venue_yelp_id, "venue fetch failed");
            Ok(HttpResponse::Ok().json(json!({ "error": err.to_string() })))
        }
    }
}
