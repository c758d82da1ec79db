//! Port for the append-only search-alert notification log.

use async_trait::async_trait;

use crate::domain::{ProductId, SearchAlertNotification, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by alert notification repository adapters.
    pub enum AlertNotificationRepositoryError for "alert notification repository";
}

/// Storage for [`SearchAlertNotification`] records.
///
/// Records are unique per (receiver, product) pair. Adapters must treat a
/// second record for the same pair as a no-op rather than an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertNotificationRepository: Send + Sync {
    /// Append a record. Returns `false` when the pair was already recorded.
    async fn record(
        &self,
        notification: &SearchAlertNotification,
    ) -> Result<bool, AlertNotificationRepositoryError>;

    /// Records addressed to `receiver_id`, newest first.
    async fn list_for_receiver(
        &self,
        receiver_id: &UserId,
    ) -> Result<Vec<SearchAlertNotification>, AlertNotificationRepositoryError>;

    /// Remove every record pointing at `product_id`, returning how many
    /// were removed.
    async fn delete_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<u64, AlertNotificationRepositoryError>;
}

/// Fixture implementation that accepts and discards records.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAlertNotificationRepository;

#[async_trait]
impl AlertNotificationRepository for FixtureAlertNotificationRepository {
    async fn record(
        &self,
        _notification: &SearchAlertNotification,
    ) -> Result<bool, AlertNotificationRepositoryError> {
        Ok(true)
    }

    async fn list_for_receiver(
        &self,
        _receiver_id: &UserId,
    ) -> Result<Vec<SearchAlertNotification>, AlertNotificationRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete_for_product(
        &self,
        _product_id: &ProductId,
    ) -> Result<u64, AlertNotificationRepositoryError> {
        Ok(0)
    }
}
