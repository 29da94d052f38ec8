//! Reqwest-backed `BusinessDirectory` adapter.
//!
//! This adapter owns transport details only: URL construction, bearer-token
//! injection, timeout and HTTP error mapping, and JSON relay. Upstream
//! responses are forwarded verbatim; the backend never reshapes them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use crate::domain::ports::{BusinessDirectory, DirectoryError, SearchFilters};

/// Results per search page, fixed by the original client contract.
const SEARCH_PAGE_LIMIT: u32 = 5;

/// Directory adapter that performs HTTP GET requests against one API base.
pub struct YelpHttpDirectory {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl YelpHttpDirectory {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout. `base_url` is the versioned API root, for example
    /// `https://api.yelp.com/v3`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DirectoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| DirectoryError::transport("api base url cannot be a base"))?
            .extend(segments);
        Ok(url)
    }

    async fn fetch_json(&self, url: Url, not_found_on_400: bool) -> Result<Value, DirectoryError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| DirectoryError::transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| DirectoryError::transport(err.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), not_found_on_400));
        }

        serde_json::from_slice(body.as_ref())
            .map_err(|err| DirectoryError::decode(err.to_string()))
    }
}

#[async_trait]
impl BusinessDirectory for YelpHttpDirectory {
    async fn search(
        &self,
        location: &str,
        filters: &SearchFilters,
    ) -> Result<Value, DirectoryError> {
        let mut url = self.endpoint(&["businesses", "search"])?;
        build_search_query(&mut url, location, filters);
        self.fetch_json(url, true).await
    }

    async fn get_business(&self, venue_yelp_id: &str) -> Result<Value, DirectoryError> {
        let url = self.endpoint(&["businesses", venue_yelp_id])?;
        self.fetch_json(url, false).await
    }
}

/// Expand the client's single price knob into upstream price levels.
fn price_levels(price: Option<u8>) -> &'static [u8] {
    match price {
        Some(1) => &[1],
        Some(2) => &[1, 2],
        Some(3) => &[1, 2, 3],
        _ => &[1, 2, 3, 4],
    }
}

fn build_search_query(url: &mut Url, location: &str, filters: &SearchFilters) {
    let mut pairs = url.query_pairs_mut();
    pairs
        .append_pair("location", location)
        .append_pair("limit", &SEARCH_PAGE_LIMIT.to_string())
        .append_pair("offset", &filters.offset.to_string())
        .append_pair("open_now", if filters.open_now { "true" } else { "false" });
    if let Some(sort_by) = &filters.sort_by {
        pairs.append_pair("sort_by", sort_by);
    }
    for level in price_levels(filters.price) {
        pairs.append_pair("price", &level.to_string());
    }
}

fn map_status_error(status: StatusCode, body: &[u8], not_found_on_400: bool) -> DirectoryError {
    if status == StatusCode::BAD_REQUEST && not_found_on_400 {
        return DirectoryError::LocationNotFound;
    }

    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    DirectoryError::transport(message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network query-building and mapping helpers.

    use super::*;
    use rstest::rstest;

    fn search_url(location: &str, filters: &SearchFilters) -> Url {
        let mut url = Url::parse("https://api.yelp.com/v3/businesses/search")
            .expect("fixture URL parses");
        build_search_query(&mut url, location, filters);
        url
    }

    #[rstest]
    #[case(Some(1), &[1])]
    #[case(Some(2), &[1, 2])]
    #[case(Some(3), &[1, 2, 3])]
    #[case(Some(4), &[1, 2, 3, 4])]
    #[case(Some(9), &[1, 2, 3, 4])]
    #[case(None, &[1, 2, 3, 4])]
    fn price_knob_expands_to_levels(#[case] price: Option<u8>, #[case] expected: &[u8]) {
        assert_eq!(price_levels(price), expected);
    }

    #[test]
    fn search_query_includes_fixed_limit_and_filters() {
        let url = search_url(
            "Berlin",
            &SearchFilters {
                offset: 10,
                open_now: true,
                sort_by: Some("rating".into()),
                price: Some(2),
            },
        );
        let query = url.query().expect("query string present");

        assert!(query.contains("location=Berlin"));
        assert!(query.contains("limit=5"));
        assert!(query.contains("offset=10"));
        assert!(query.contains("open_now=true"));
        assert!(query.contains("sort_by=rating"));
        assert_eq!(query.matches("price=").count(), 2);
    }

    #[test]
    fn search_query_omits_sort_when_unspecified() {
        let url = search_url("Berlin", &SearchFilters::default());
        let query = url.query().expect("query string present");

        assert!(!query.contains("sort_by"));
        assert_eq!(query.matches("price=").count(), 4);
    }

    #[rstest]
    #[case::search_maps_400(StatusCode::BAD_REQUEST, true)]
    fn bad_request_maps_to_location_not_found(#[case] status: StatusCode, #[case] search: bool) {
        let error = map_status_error(status, b"{}", search);
        assert_eq!(error, DirectoryError::LocationNotFound);
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, false)]
    #[case(StatusCode::UNAUTHORIZED, true)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, true)]
    fn other_statuses_map_to_transport(#[case] status: StatusCode, #[case] search: bool) {
        let error = map_status_error(status, b"{\"error\":\"boom\"}", search);
        assert!(matches!(error, DirectoryError::Transport { .. }));
    }

    #[test]
    fn long_bodies_are_truncated_in_messages() {
        let body = "x".repeat(500);
        let error = map_status_error(StatusCode::BAD_GATEWAY, body.as_bytes(), true);
        let DirectoryError::Transport { message } = error else {
            panic!("expected transport error");
        };
        assert!(message.len() < 200, "preview should be truncated");
        assert!(message.ends_with("..."));
    }
}
