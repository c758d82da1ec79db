//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the geo index, image resolution, push
//! dispatch) are implemented by outbound adapters. Driving ports are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod alert_notification_repository;
mod bundle;
mod fan_out_metrics;
mod favourites_repository;
mod feed_preferences_repository;
mod image_url_resolver;
mod nearby_users;
mod product_catalogue;
mod product_discovery;
mod product_repository;
mod profile_settings;
mod push_notification_dispatcher;
mod search_alert_repository;
mod search_alerts;
mod user_profile_repository;

#[cfg(test)]
pub use alert_notification_repository::MockAlertNotificationRepository;
pub use alert_notification_repository::{
    AlertNotificationRepository, AlertNotificationRepositoryError,
    FixtureAlertNotificationRepository,
};
pub use bundle::MarketplacePorts;
#[cfg(test)]
pub use fan_out_metrics::MockFanOutMetrics;
pub use fan_out_metrics::{FanOutMetrics, FanOutMetricsError, NoOpFanOutMetrics};
#[cfg(test)]
pub use favourites_repository::MockFavouritesRepository;
pub use favourites_repository::{
    FavouritesRepository, FavouritesRepositoryError, FixtureFavouritesRepository,
};
#[cfg(test)]
pub use feed_preferences_repository::MockFeedPreferencesRepository;
pub use feed_preferences_repository::{
    FeedPreferencesRepository, FeedPreferencesRepositoryError, FixtureFeedPreferencesRepository,
};
#[cfg(test)]
pub use image_url_resolver::MockImageUrlResolver;
pub use image_url_resolver::{FixtureImageUrlResolver, ImageUrlResolver, ImageUrlResolverError};
#[cfg(test)]
pub use nearby_users::MockNearbyUsers;
pub use nearby_users::{FixtureNearbyUsers, NearbyUsers, NearbyUsersError};
pub use product_catalogue::ProductCatalogue;
#[cfg(test)]
pub use product_catalogue::MockProductCatalogue;
pub use product_discovery::ProductDiscovery;
#[cfg(test)]
pub use product_discovery::MockProductDiscovery;
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{FixtureProductRepository, ProductRepository, ProductRepositoryError};
pub use profile_settings::ProfileSettings;
#[cfg(test)]
pub use profile_settings::MockProfileSettings;
#[cfg(test)]
pub use push_notification_dispatcher::MockPushNotificationDispatcher;
pub use push_notification_dispatcher::{
    AlertPushPayload, DisabledPushDispatcher, PushDispatchError, PushMessage,
    PushNotificationDispatcher, SEARCH_ALERT_TITLE,
};
#[cfg(test)]
pub use search_alert_repository::MockSearchAlertRepository;
pub use search_alert_repository::{
    FixtureSearchAlertRepository, SearchAlertRepository, SearchAlertRepositoryError,
};
pub use search_alerts::SearchAlerts;
#[cfg(test)]
pub use search_alerts::MockSearchAlerts;
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
pub use user_profile_repository::{
    FixtureUserProfileRepository, UserProfileRepository, UserProfileRepositoryError,
};
