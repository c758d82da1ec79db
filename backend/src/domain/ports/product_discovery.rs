//! Driving port for geo-aware product discovery.

use async_trait::async_trait;

use crate::domain::{DiscoveryCriteria, Error, ProductView, UserId};

/// Finds products listed near the requesting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductDiscovery: Send + Sync {
    /// Filtered, annotated products of nearby owners.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when the criteria are malformed.
    /// - `location_missing` when the requester has no saved location.
    /// - `service_unavailable` or `internal_error` when a store fails.
    async fn discover(
        &self,
        requester: &UserId,
        criteria: DiscoveryCriteria,
    ) -> Result<Vec<ProductView>, Error>;
}
