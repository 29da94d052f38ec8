//! Backend entry-point: reads configuration, runs migrations, and wires the
//! HTTP server over the concrete adapters.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use nightlife_backend::domain::AuthService;
use nightlife_backend::inbound::http::state::HttpState;
use nightlife_backend::outbound::github::{GitHubOAuthConfig, GitHubOAuthExchange};
use nightlife_backend::outbound::persistence::{
    DbPool, DieselAttendanceRepository, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use nightlife_backend::outbound::security::Argon2PasswordHasher;
use nightlife_backend::outbound::yelp::YelpHttpDirectory;
use nightlife_backend::server::{ServerConfig, create_server};

const DEFAULT_PORT: u16 = 3001;
const YELP_API_BASE: &str = "https://api.yelp.com/v3";
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

fn required_var(name: &str) -> std::io::Result<String> {
    env::var(name).map_err(|_| std::io::Error::other(format!("{name} must be set")))
}

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = required_var("DATABASE_URL")?;
    run_pending_migrations(&database_url).map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(database_url.as_str()))
        .await
        .map_err(std::io::Error::other)?;

    let yelp_base = Url::parse(YELP_API_BASE).map_err(std::io::Error::other)?;
    let directory = YelpHttpDirectory::new(yelp_base, required_var("YELP_API_KEY")?, UPSTREAM_TIMEOUT)
        .map_err(std::io::Error::other)?;

    let oauth_config = GitHubOAuthConfig {
        client_id: required_var("GITHUB_CLIENT_ID")?,
        client_secret: required_var("GITHUB_CLIENT_SECRET")?,
        callback_url: Url::parse(&required_var("GITHUB_CALLBACK_URL")?)
            .map_err(std::io::Error::other)?,
    };
    let oauth = GitHubOAuthExchange::new(oauth_config, UPSTREAM_TIMEOUT)
        .map_err(std::io::Error::other)?;

    let auth = AuthService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher::new()),
    );
    let state = HttpState::new(
        Arc::new(auth),
        Arc::new(DieselAttendanceRepository::new(pool)),
        Arc::new(directory),
        Arc::new(oauth),
    );

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);
    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let config = ServerConfig::new(
        session_key()?,
        cookie_secure,
        SameSite::Lax,
        ([0, 0, 0, 0], port).into(),
    );

    info!(port, "starting server");
    create_server(state, config)?.await
}
