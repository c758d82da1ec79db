//! Builders for driven ports and the HTTP state wired from them.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;
use url::Url;

use marketplace::domain::ports::{
    DisabledPushDispatcher, FixtureImageUrlResolver, ImageUrlResolver, MarketplacePorts,
    PushNotificationDispatcher,
};
use marketplace::domain::{
    AlertMatchingService, ProductCatalogueService, ProductDiscoveryService,
    ProfileSettingsService, SearchAlertService,
};
use marketplace::inbound::http::state::HttpState;
use marketplace::outbound::images::PublicUrlImageResolver;
use marketplace::outbound::persistence::{
    DbPool, DieselAlertNotificationRepository, DieselFavouritesRepository,
    DieselFeedPreferencesRepository, DieselNearbyUsers, DieselProductRepository,
    DieselSearchAlertRepository, DieselUserProfileRepository,
};
use marketplace::outbound::push::{FcmPushDispatcher, FcmSettings};

use super::ServerConfig;

/// Swap fixture repositories for Diesel adapters when a pool is available.
fn persistence_ports(pool: Option<&DbPool>, base: MarketplacePorts) -> MarketplacePorts {
    let Some(pool) = pool else {
        return base;
    };
    MarketplacePorts {
        profiles: Arc::new(DieselUserProfileRepository::new(pool.clone())),
        nearby_users: Arc::new(DieselNearbyUsers::new(pool.clone())),
        products: Arc::new(DieselProductRepository::new(pool.clone())),
        search_alerts: Arc::new(DieselSearchAlertRepository::new(pool.clone())),
        alert_notifications: Arc::new(DieselAlertNotificationRepository::new(pool.clone())),
        favourites: Arc::new(DieselFavouritesRepository::new(pool.clone())),
        feed_preferences: Arc::new(DieselFeedPreferencesRepository::new(pool.clone())),
        ..base
    }
}

fn push_dispatcher(
    settings: Option<&FcmSettings>,
) -> io::Result<Arc<dyn PushNotificationDispatcher>> {
    match settings {
        Some(settings) => {
            let dispatcher = FcmPushDispatcher::new(settings.clone())
                .map_err(|e| io::Error::other(format!("push client setup failed: {e}")))?;
            info!(endpoint = %settings.endpoint, "push dispatch enabled");
            Ok(Arc::new(dispatcher))
        }
        None => {
            info!("push dispatch disabled; no server key configured");
            Ok(Arc::new(DisabledPushDispatcher))
        }
    }
}

fn image_resolver(base: Option<&Url>) -> Arc<dyn ImageUrlResolver> {
    match base {
        Some(base) => Arc::new(PublicUrlImageResolver::new(base.clone())),
        None => Arc::new(FixtureImageUrlResolver),
    }
}

#[cfg(feature = "metrics")]
fn with_fan_out_metrics(
    config: &ServerConfig,
    ports: MarketplacePorts,
) -> io::Result<MarketplacePorts> {
    use marketplace::outbound::metrics::PrometheusFanOutMetrics;

    let Some(prometheus) = config.prometheus.as_ref() else {
        return Ok(ports);
    };
    let metrics = PrometheusFanOutMetrics::new(&prometheus.registry)
        .map_err(|e| io::Error::other(format!("fan-out metrics registration failed: {e}")))?;
    Ok(MarketplacePorts {
        fan_out_metrics: Arc::new(metrics),
        ..ports
    })
}

#[cfg(not(feature = "metrics"))]
fn with_fan_out_metrics(
    _config: &ServerConfig,
    ports: MarketplacePorts,
) -> io::Result<MarketplacePorts> {
    Ok(ports)
}

/// Assemble every driven port from configuration.
///
/// # Errors
/// Returns [`io::Error`] when the push client or metrics cannot be set up.
pub(crate) fn build_ports(config: &ServerConfig) -> io::Result<MarketplacePorts> {
    let base = MarketplacePorts {
        images: image_resolver(config.image_base.as_ref()),
        push: push_dispatcher(config.push.as_ref())?,
        ..MarketplacePorts::fixture()
    };
    let ports = persistence_ports(config.db_pool.as_ref(), base);
    with_fan_out_metrics(config, ports)
}

/// Build the domain services and bundle them as handler state.
pub(crate) fn build_http_state(
    ports: MarketplacePorts,
    fan_out_concurrency: usize,
) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let alert_matching = Arc::new(AlertMatchingService::new(
        ports.clone(),
        Arc::clone(&clock),
        fan_out_concurrency,
    ));
    web::Data::new(HttpState::new(
        Arc::new(ProductDiscoveryService::new(
            ports.clone(),
            fan_out_concurrency,
        )),
        Arc::new(ProductCatalogueService::new(
            ports.clone(),
            alert_matching,
            Arc::clone(&clock),
        )),
        Arc::new(SearchAlertService::new(ports.clone(), Arc::clone(&clock))),
        Arc::new(ProfileSettingsService::new(ports, clock)),
    ))
}
