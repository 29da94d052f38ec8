//! HTTP inbound adapter exposing the REST endpoints.

pub mod attendance;
pub mod error;
pub mod oauth;
pub mod search;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::{ApiError, ApiResult};
