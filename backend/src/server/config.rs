//! Application settings and the server configuration built from them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use marketplace::domain::DEFAULT_FAN_OUT_CONCURRENCY;
use marketplace::outbound::persistence::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig,
};
use marketplace::outbound::push::FcmSettings;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_PUSH_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";
const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 10;

/// Layered settings (CLI, `MARKETPLACE_*` environment, config file).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL; fixture ports are used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_connect_timeout_secs: Option<u64>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`; defaults to `true`.
    pub cookie_secure: Option<bool>,
    /// Public base URL that image keys are joined onto.
    pub image_base_url: Option<String>,
    /// Push gateway endpoint.
    pub push_endpoint: Option<String>,
    /// Push gateway server key; push dispatch is disabled when absent.
    pub push_server_key: Option<String>,
    /// Push request timeout in seconds.
    pub push_timeout_secs: Option<u64>,
    /// Cap on concurrently processed fan-out candidates.
    pub fan_out_concurrency: Option<usize>,
}

/// Errors raised while interpreting [`AppSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid {field} URL `{value}`: {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl {
        field,
        value: value.to_owned(),
        source,
    })
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR))
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn fan_out_concurrency(&self) -> usize {
        self.fan_out_concurrency
            .unwrap_or(DEFAULT_FAN_OUT_CONCURRENCY)
            .max(1)
    }

    /// Pool settings for `database_url`, or `None` when no database is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        Some(
            PoolConfig::new(url)
                .with_max_size(self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
                .with_connection_timeout(
                    self.db_connect_timeout_secs
                        .map_or(DEFAULT_CONNECT_TIMEOUT, Duration::from_secs),
                ),
        )
    }

    /// Parsed image base URL, if configured.
    pub fn image_base_url(&self) -> Result<Option<Url>, SettingsError> {
        self.image_base_url
            .as_deref()
            .map(|raw| parse_url("image base", raw))
            .transpose()
    }

    /// Push gateway settings, or `None` when no server key is configured.
    pub fn push_settings(&self) -> Result<Option<FcmSettings>, SettingsError> {
        let Some(server_key) = self
            .push_server_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
        else {
            return Ok(None);
        };
        let endpoint = parse_url(
            "push endpoint",
            self.push_endpoint.as_deref().unwrap_or(DEFAULT_PUSH_ENDPOINT),
        )?;
        Ok(Some(FcmSettings {
            endpoint,
            server_key: server_key.to_owned(),
            timeout: Duration::from_secs(
                self.push_timeout_secs.unwrap_or(DEFAULT_PUSH_TIMEOUT_SECS),
            ),
        }))
    }
}

/// Everything [`super::create_server`] needs, resolved from settings.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) push: Option<FcmSettings>,
    pub(crate) image_base: Option<Url>,
    pub(crate) fan_out_concurrency: usize,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            push: None,
            image_base: None,
            fan_out_concurrency: DEFAULT_FAN_OUT_CONCURRENCY,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Use Diesel-backed repositories instead of fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_push(mut self, push: Option<FcmSettings>) -> Self {
        self.push = push;
        self
    }

    #[must_use]
    pub fn with_image_base(mut self, image_base: Option<Url>) -> Self {
        self.image_base = image_base;
        self
    }

    #[must_use]
    pub fn with_fan_out_concurrency(mut self, concurrency: usize) -> Self {
        self.fan_out_concurrency = concurrency.max(1);
        self
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
