//! Driven port bundle shared by the marketplace services.

use std::sync::Arc;

use super::{
    AlertNotificationRepository, DisabledPushDispatcher, FanOutMetrics, FavouritesRepository,
    FeedPreferencesRepository, FixtureAlertNotificationRepository, FixtureFavouritesRepository,
    FixtureFeedPreferencesRepository, FixtureImageUrlResolver, FixtureNearbyUsers,
    FixtureProductRepository, FixtureSearchAlertRepository, FixtureUserProfileRepository,
    ImageUrlResolver, NearbyUsers, NoOpFanOutMetrics, ProductRepository, PushNotificationDispatcher,
    SearchAlertRepository, UserProfileRepository,
};

/// Every driven port the marketplace services consume.
#[derive(Clone)]
pub struct MarketplacePorts {
    /// Saved locations and push settings.
    pub profiles: Arc<dyn UserProfileRepository>,
    /// Geo index over user locations.
    pub nearby_users: Arc<dyn NearbyUsers>,
    pub products: Arc<dyn ProductRepository>,
    pub search_alerts: Arc<dyn SearchAlertRepository>,
    pub alert_notifications: Arc<dyn AlertNotificationRepository>,
    pub favourites: Arc<dyn FavouritesRepository>,
    pub feed_preferences: Arc<dyn FeedPreferencesRepository>,
    pub images: Arc<dyn ImageUrlResolver>,
    pub push: Arc<dyn PushNotificationDispatcher>,
    /// Fan-out outcome exporter.
    pub fan_out_metrics: Arc<dyn FanOutMetrics>,
}

impl MarketplacePorts {
    /// Bundle of fixture ports for running without a database.
    pub fn fixture() -> Self {
        Self {
            profiles: Arc::new(FixtureUserProfileRepository),
            nearby_users: Arc::new(FixtureNearbyUsers),
            products: Arc::new(FixtureProductRepository),
            search_alerts: Arc::new(FixtureSearchAlertRepository),
            alert_notifications: Arc::new(FixtureAlertNotificationRepository),
            favourites: Arc::new(FixtureFavouritesRepository),
            feed_preferences: Arc::new(FixtureFeedPreferencesRepository),
            images: Arc::new(FixtureImageUrlResolver),
            push: Arc::new(DisabledPushDispatcher),
            fan_out_metrics: Arc::new(NoOpFanOutMetrics),
        }
    }
}
