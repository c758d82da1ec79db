//! Location, feed preference, and push delivery settings.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use super::ports::{MarketplacePorts, ProfileSettings};
use super::{Error, FeedPreferences, GeoPoint, UserId};

/// Profile settings service implementing [`ProfileSettings`].
#[derive(Clone)]
pub struct ProfileSettingsService {
    ports: MarketplacePorts,
    clock: Arc<dyn Clock>,
}

impl ProfileSettingsService {
    pub fn new(ports: MarketplacePorts, clock: Arc<dyn Clock>) -> Self {
        Self { ports, clock }
    }
}

#[async_trait]
impl ProfileSettings for ProfileSettingsService {
    async fn update_location(&self, user: &UserId, location: GeoPoint) -> Result<(), Error> {
        self.ports.profiles.save_location(user, location).await?;
        info!(user_id = %user, "user location updated");
        Ok(())
    }

    async fn save_feed(
        &self,
        user: &UserId,
        categories: Vec<String>,
    ) -> Result<FeedPreferences, Error> {
        let preferences = FeedPreferences {
            user_id: user.clone(),
            categories,
            updated_at: self.clock.utc(),
        };
        self.ports.feed_preferences.save(&preferences).await?;
        Ok(preferences)
    }

    async fn fetch_feed(&self, user: &UserId) -> Result<FeedPreferences, Error> {
        self.ports
            .feed_preferences
            .find_by_user(user)
            .await?
            .ok_or_else(|| Error::not_found("no feed preferences saved"))
    }

    async fn register_push_token(&self, user: &UserId, token: &str) -> Result<bool, Error> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::invalid_request("push token must not be empty")
                .with_details(json!({ "field": "fcmKey", "code": "empty" })));
        }
        let added = self.ports.profiles.add_push_token(user, token).await?;
        if added {
            info!(user_id = %user, "push token registered");
        } else {
            debug!(user_id = %user, "push token already registered");
        }
        Ok(added)
    }

    async fn set_notifications_enabled(
        &self,
        user: &UserId,
        enabled: bool,
    ) -> Result<(), Error> {
        self.ports
            .profiles
            .set_notifications_enabled(user, enabled)
            .await?;
        info!(user_id = %user, enabled, "push notifications toggled");
        Ok(())
    }
}
