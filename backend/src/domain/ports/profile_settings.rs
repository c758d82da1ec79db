//! Driving port for the profile settings the marketplace owns.

use async_trait::async_trait;

use crate::domain::{Error, FeedPreferences, GeoPoint, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileSettings: Send + Sync {
    async fn update_location(&self, user: &UserId, location: GeoPoint) -> Result<(), Error>;

    /// Replace the user's feed categories.
    async fn save_feed(
        &self,
        user: &UserId,
        categories: Vec<String>,
    ) -> Result<FeedPreferences, Error>;

    /// The user's feed preferences; `not_found` when none are saved.
    async fn fetch_feed(&self, user: &UserId) -> Result<FeedPreferences, Error>;

    /// Register a device token for push delivery. Returns `false` when the
    /// user already had it.
    async fn register_push_token(&self, user: &UserId, token: &str) -> Result<bool, Error>;

    /// Opt the user in to or out of search-alert pushes.
    async fn set_notifications_enabled(&self, user: &UserId, enabled: bool)
    -> Result<(), Error>;
}
