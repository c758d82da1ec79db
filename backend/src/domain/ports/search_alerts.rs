//! Driving port for saved search alerts.

use async_trait::async_trait;

use crate::domain::{AlertNotificationView, Error, SearchAlert, SearchAlertDraft, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchAlerts: Send + Sync {
    /// Validate and replace the user's alert.
    async fn save_alert(&self, user: &UserId, draft: SearchAlertDraft)
    -> Result<SearchAlert, Error>;

    /// The user's alert; `not_found` when none is saved.
    async fn fetch_alert(&self, user: &UserId) -> Result<SearchAlert, Error>;

    /// Alert notifications addressed to the user, newest first.
    async fn list_alert_notifications(
        &self,
        user: &UserId,
    ) -> Result<Vec<AlertNotificationView>, Error>;
}
