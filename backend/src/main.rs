//! Backend entry-point: loads settings, prepares storage, and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;
use std::path::Path;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marketplace::inbound::http::health::HealthState;
use marketplace::outbound::persistence::{DbPool, PoolConfig, apply_migrations};
use ortho_config::OrthoConfig;
use server::{AppSettings, ServerConfig, create_server};

fn load_session_key(path: &Path, allow_ephemeral: bool) -> io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) if cfg!(debug_assertions) || allow_ephemeral => {
            warn!(path = %path.display(), error = %e, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(e) => Err(io::Error::other(format!(
            "failed to read session key at {}: {e}",
            path.display()
        ))),
    }
}

async fn connect_database(pool_config: PoolConfig) -> io::Result<DbPool> {
    apply_migrations(pool_config.database_url())
        .await
        .map_err(|e| io::Error::other(format!("database migration failed: {e}")))?;
    DbPool::new(pool_config)
        .await
        .map_err(|e| io::Error::other(format!("create database pool: {e}")))
}

async fn build_config(settings: &AppSettings) -> io::Result<ServerConfig> {
    let key = load_session_key(&settings.session_key_file(), settings.session_allow_ephemeral)?;
    let push = settings.push_settings().map_err(io::Error::other)?;
    let image_base = settings.image_base_url().map_err(io::Error::other)?;

    let config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        SameSite::Lax,
        settings.bind_addr(),
    )
    .with_push(push)
    .with_image_base(image_base)
    .with_fan_out_concurrency(settings.fan_out_concurrency());

    let config = match settings.pool_config() {
        Some(pool_config) => config.with_db_pool(connect_database(pool_config).await?),
        None => {
            warn!("no database configured; serving fixture data");
            config
        }
    };

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::build_prometheus()?));

    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|e| io::Error::other(format!("load settings: {e}")))?;
    let config = build_config(&settings).await?;
    let bind_addr = settings.bind_addr();

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "marketplace listening");
    server.await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write as _;

    #[rstest]
    fn session_key_is_derived_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session_key");
        let material = [7_u8; 64];
        std::fs::File::create(&path)
            .and_then(|mut file| file.write_all(&material))
            .expect("write key");

        let key = load_session_key(&path, false).expect("key loads");
        assert_eq!(key.master(), Key::derive_from(&material).master());
    }

    #[rstest]
    fn ephemeral_key_is_allowed_when_opted_in() {
        let missing = Path::new("/nonexistent/marketplace/session_key");
        assert!(load_session_key(missing, true).is_ok());
    }
}
