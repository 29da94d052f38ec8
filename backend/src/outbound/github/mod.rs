//! GitHub OAuth provider adapter.

mod http_oauth;

pub use http_oauth::{GitHubOAuthConfig, GitHubOAuthExchange};
