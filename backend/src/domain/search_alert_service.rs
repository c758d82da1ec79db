//! Saved search alerts and the per-user alert notification feed.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::debug;

use super::ports::{MarketplacePorts, SearchAlerts};
use super::product_views::image_urls;
use super::{
    AlertNotificationView, Error, SearchAlert, SearchAlertDraft, SearchAlertDraftError, UserId,
};

/// Search alert service implementing [`SearchAlerts`].
#[derive(Clone)]
pub struct SearchAlertService {
    ports: MarketplacePorts,
    clock: Arc<dyn Clock>,
}

impl SearchAlertService {
    pub fn new(ports: MarketplacePorts, clock: Arc<dyn Clock>) -> Self {
        Self { ports, clock }
    }

    fn draft_error(error: &SearchAlertDraftError) -> Error {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": error.field(),
            "code": "invalid_price_range",
        }))
    }
}

#[async_trait]
impl SearchAlerts for SearchAlertService {
    async fn save_alert(
        &self,
        user: &UserId,
        draft: SearchAlertDraft,
    ) -> Result<SearchAlert, Error> {
        let alert = draft
            .into_alert(user.clone(), self.clock.utc())
            .map_err(|error| Self::draft_error(&error))?;
        self.ports.search_alerts.upsert(&alert).await?;
        Ok(alert)
    }

    async fn fetch_alert(&self, user: &UserId) -> Result<SearchAlert, Error> {
        self.ports
            .search_alerts
            .find_by_user(user)
            .await?
            .ok_or_else(|| Error::not_found("no search alert saved"))
    }

    async fn list_alert_notifications(
        &self,
        user: &UserId,
    ) -> Result<Vec<AlertNotificationView>, Error> {
        let notifications = self.ports.alert_notifications.list_for_receiver(user).await?;
        let mut views = Vec::with_capacity(notifications.len());
        for notification in notifications {
            let Some(product) = self
                .ports
                .products
                .find_by_id(&notification.product_id)
                .await?
            else {
                debug!(
                    notification_id = %notification.id,
                    product_id = %notification.product_id,
                    "skipping alert notification for deleted product"
                );
                continue;
            };
            let image_urls = image_urls(&self.ports, &product).await;
            views.push(AlertNotificationView {
                id: notification.id,
                product_id: product.id,
                product_name: product.name,
                product_description: product.description,
                image_urls,
                created_at: notification.created_at,
            });
        }
        Ok(views)
    }
}
