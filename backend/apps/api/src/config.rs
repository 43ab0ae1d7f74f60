//! Server Configuration
//!
//! Read once from the environment at startup. Any missing required value
//! stops the process before it binds a socket.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use platform::database::{DEFAULT_MAX_CONNECTIONS, postgres_url};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POSTGRES_HOST: &str = "localhost";

/// How long in-flight requests may run after a shutdown signal
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub struct ServerConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Token signing key, raw bytes of `API_SECRET`
    pub api_secret: Vec<u8>,
    pub bind_addr: SocketAddr,
    pub cookie_secure: bool,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(url) => url,
            None => {
                let required = |key: &str| {
                    lookup(key).with_context(|| {
                        format!("{key} must be set when DATABASE_URL is not provided")
                    })
                };
                let host = lookup("POSTGRES_HOST").unwrap_or_else(|| DEFAULT_POSTGRES_HOST.into());
                postgres_url(
                    &required("POSTGRES_USER")?,
                    &required("POSTGRES_PASSWORD")?,
                    &host,
                    &required("POSTGRES_DBNAME")?,
                )
            }
        };

        let api_secret = lookup("API_SECRET").unwrap_or_default();
        if api_secret.is_empty() {
            bail!("API_SECRET must be set to a non-empty value");
        }

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(value) => parse_bool(&value).context("COOKIE_SECURE must be true or false")?,
            None => false,
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => value
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            db_max_connections,
            api_secret: api_secret.into_bytes(),
            bind_addr,
            cookie_secure,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            cookie_secure: self.cookie_secure,
            ..AuthConfig::with_secret(self.api_secret.clone())
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
