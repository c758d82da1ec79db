//! Geo-aware product discovery.
//!
//! Discovery scans the owners near the requester, queries each owner's
//! matching products as a bounded concurrent group that preserves candidate
//! order, then optionally re-sorts by recency.

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use serde_json::json;
use tracing::debug;

use super::ports::{MarketplacePorts, ProductDiscovery};
use super::product_views::annotate;
use super::{
    DiscoveryCriteria, DiscoveryCriteriaError, DiscoverySort, Error, ProductFilter, ProductView,
    UserId,
};

/// Default number of candidates processed concurrently.
pub const DEFAULT_FAN_OUT_CONCURRENCY: usize = 8;

/// Discovery service implementing [`ProductDiscovery`].
#[derive(Clone)]
pub struct ProductDiscoveryService {
    ports: MarketplacePorts,
    concurrency: usize,
}

impl ProductDiscoveryService {
    /// Create a service processing at most `concurrency` candidates at once.
    pub fn new(ports: MarketplacePorts, concurrency: usize) -> Self {
        Self {
            ports,
            concurrency: concurrency.max(1),
        }
    }

    fn criteria_error(error: &DiscoveryCriteriaError) -> Error {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": error.field(),
            "code": "invalid_criteria",
        }))
    }

    async fn feed_categories(
        &self,
        requester: &UserId,
        criteria: &DiscoveryCriteria,
    ) -> Result<Option<Vec<String>>, Error> {
        if !criteria.is_unfiltered() {
            return Ok(None);
        }
        let preferences = self.ports.feed_preferences.find_by_user(requester).await?;
        Ok(preferences.map(|preferences| preferences.categories))
    }

    async fn owner_products(
        &self,
        requester: &UserId,
        filter: ProductFilter,
    ) -> Result<Vec<ProductView>, Error> {
        let products = self.ports.products.find_matching(&filter).await?;
        let mut views = Vec::with_capacity(products.len());
        for product in products {
            views.push(annotate(&self.ports, requester, product).await?);
        }
        Ok(views)
    }
}

#[async_trait]
impl ProductDiscovery for ProductDiscoveryService {
    async fn discover(
        &self,
        requester: &UserId,
        criteria: DiscoveryCriteria,
    ) -> Result<Vec<ProductView>, Error> {
        criteria
            .validate()
            .map_err(|error| Self::criteria_error(&error))?;

        let location = self
            .ports
            .profiles
            .find_location(requester)
            .await?
            .ok_or_else(|| {
                Error::location_missing("save a location before searching nearby products")
                    .with_details(json!({ "userId": requester.to_string() }))
            })?;

        let radius_metres = criteria.radius_metres();
        let candidates = self
            .ports
            .nearby_users
            .find_within(location, radius_metres, requester)
            .await?;
        let categories = criteria.effective_categories(self.feed_categories(requester, &criteria).await?);
        let candidate_count = candidates.len();

        let batches: Vec<Vec<ProductView>> = stream::iter(candidates)
            .map(|owner| {
                let filter = ProductFilter::for_owner(owner, &criteria, &categories);
                self.owner_products(requester, filter)
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut views: Vec<ProductView> = batches.into_iter().flatten().collect();
        if criteria.sort_order() == DiscoverySort::MostRecent {
            views.sort_by(|left, right| right.product.created_at.cmp(&left.product.created_at));
        }

        debug!(
            requester = %requester,
            radius_metres,
            candidates = candidate_count,
            results = views.len(),
            "discovery completed"
        );
        Ok(views)
    }
}
