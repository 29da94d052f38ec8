//! Port abstraction for the upstream business-directory API.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Failures raised by upstream directory adapters.
    pub enum DirectoryError {
        /// Upstream rejected the location (HTTP 400).
        LocationNotFound => "no venues found for that location",
        /// Request failed in transit or upstream answered with a non-2xx status.
        Transport { message: String } => "upstream directory request failed: {message}",
        /// Upstream body was not valid JSON.
        Decode { message: String } => "upstream directory payload invalid: {message}",
    }
}

/// Search filters forwarded to the upstream directory.
///
/// `price` follows the original client contract: `Some(1)` means price level
/// 1 only, `Some(2)` levels 1-2, `Some(3)` levels 1-3, and anything else all
/// four levels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilters {
    /// Pagination offset into the upstream result set.
    pub offset: u32,
    /// Restrict results to venues currently open.
    pub open_now: bool,
    /// Upstream sort mode (for example `best_match`), relayed verbatim.
    pub sort_by: Option<String>,
    /// Upper bound on the requested price levels; see the type docs.
    pub price: Option<u8>,
}

/// Upstream search proxy. Responses are relayed verbatim as JSON; neither
/// operation touches local storage.
#[async_trait]
pub trait BusinessDirectory: Send + Sync {
    /// Search venues around a free-text location.
    async fn search(&self, location: &str, filters: &SearchFilters)
    -> Result<Value, DirectoryError>;

    /// Fetch one business by its external identifier.
    async fn get_business(&self, venue_yelp_id: &str) -> Result<Value, DirectoryError>;
}
