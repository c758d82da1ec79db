//! Product catalogue service.
//!
//! Creating a product runs the search-alert fan-out before returning. The
//! fan-out never fails creation; its report is only logged. Edits and status
//! changes are owner-only and never re-run matching.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use super::alert_matching_service::AlertMatchingService;
use super::ports::{MarketplacePorts, ProductCatalogue};
use super::product_views::{annotate, with_image_urls};
use super::{
    Error, FavouriteToggle, Product, ProductDraft, ProductDraftError, ProductEdit, ProductId,
    ProductStatus, ProductView, UserId,
};

/// Catalogue service implementing [`ProductCatalogue`].
#[derive(Clone)]
pub struct ProductCatalogueService {
    ports: MarketplacePorts,
    alert_matching: Arc<AlertMatchingService>,
    clock: Arc<dyn Clock>,
}

impl ProductCatalogueService {
    pub fn new(
        ports: MarketplacePorts,
        alert_matching: Arc<AlertMatchingService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ports,
            alert_matching,
            clock,
        }
    }

    fn draft_error(error: &ProductDraftError) -> Error {
        Error::invalid_request(error.to_string()).with_details(json!({
            "field": error.field(),
            "code": "invalid_product",
        }))
    }

    async fn require_product(&self, product_id: &ProductId) -> Result<Product, Error> {
        self.ports
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| {
                Error::not_found(format!("product {product_id} not found"))
                    .with_details(json!({ "productId": product_id.to_string() }))
            })
    }

    async fn require_owned(
        &self,
        user: &UserId,
        product_id: &ProductId,
        action: &str,
    ) -> Result<Product, Error> {
        let product = self.require_product(product_id).await?;
        if product.owner_id != *user {
            return Err(Error::forbidden(format!("only the owner may {action} a product"))
                .with_details(json!({ "productId": product_id.to_string() })));
        }
        Ok(product)
    }

    async fn store_update(&self, product: &Product) -> Result<(), Error> {
        if self.ports.products.update(product).await? {
            Ok(())
        } else {
            Err(Error::not_found(format!("product {} not found", product.id)))
        }
    }
}

#[async_trait]
impl ProductCatalogue for ProductCatalogueService {
    async fn create_product(
        &self,
        owner: &UserId,
        draft: ProductDraft,
    ) -> Result<ProductView, Error> {
        let product = draft
            .into_product(owner.clone(), self.clock.utc())
            .map_err(|error| Self::draft_error(&error))?;
        self.ports.products.insert(&product).await?;
        info!(product_id = %product.id, owner_id = %owner, "product created");

        let report = self.alert_matching.match_and_notify(&product).await;
        debug!(
            product_id = %product.id,
            matches = report.matches,
            failures = report.failures.len(),
            "search alert fan-out attached to product creation"
        );
        if let Err(error) = self.ports.fan_out_metrics.record_fan_out(&report).await {
            warn!(product_id = %product.id, %error, "failed to record fan-out metrics");
        }

        Ok(with_image_urls(&self.ports, product, false).await)
    }

    async fn list_own_products(
        &self,
        owner: &UserId,
        status: Option<ProductStatus>,
    ) -> Result<Vec<ProductView>, Error> {
        let products = self.ports.products.list_by_owner(owner, status).await?;
        let mut views = Vec::with_capacity(products.len());
        for product in products {
            views.push(annotate(&self.ports, owner, product).await?);
        }
        Ok(views)
    }

    async fn update_product(
        &self,
        user: &UserId,
        product_id: &ProductId,
        edit: ProductEdit,
    ) -> Result<ProductView, Error> {
        let product = self.require_owned(user, product_id, "edit").await?;
        let product = edit
            .apply(product)
            .map_err(|error| Self::draft_error(&error))?;
        self.store_update(&product).await?;
        info!(product_id = %product_id, "product updated");
        annotate(&self.ports, user, product).await
    }

    async fn change_status(
        &self,
        user: &UserId,
        product_id: &ProductId,
        status: ProductStatus,
    ) -> Result<ProductView, Error> {
        let mut product = self.require_owned(user, product_id, "update").await?;
        if product.status != status {
            let previous = product.status;
            product.status = status;
            self.store_update(&product).await?;
            info!(
                product_id = %product_id,
                from = previous.as_str(),
                to = status.as_str(),
                "product status changed"
            );
        }
        annotate(&self.ports, user, product).await
    }

    async fn delete_product(&self, user: &UserId, product_id: &ProductId) -> Result<(), Error> {
        self.require_owned(user, product_id, "delete").await?;
        if !self.ports.products.delete(product_id).await? {
            return Err(Error::not_found(format!("product {product_id} not found")));
        }
        let removed = self
            .ports
            .alert_notifications
            .delete_for_product(product_id)
            .await?;
        info!(
            product_id = %product_id,
            notifications_removed = removed,
            "product deleted"
        );
        Ok(())
    }

    async fn toggle_favourite(
        &self,
        user: &UserId,
        product_id: &ProductId,
    ) -> Result<FavouriteToggle, Error> {
        self.require_product(product_id).await?;
        if self.ports.favourites.remove(user, product_id).await? {
            return Ok(FavouriteToggle::Removed);
        }
        self.ports.favourites.add(user, product_id).await?;
        Ok(FavouriteToggle::Added)
    }

    async fn list_favourites(&self, user: &UserId) -> Result<Vec<ProductView>, Error> {
        let product_ids = self.ports.favourites.list_product_ids(user).await?;
        let mut views = Vec::with_capacity(product_ids.len());
        for product_id in product_ids {
            let Some(product) = self.ports.products.find_by_id(&product_id).await? else {
                debug!(product_id = %product_id, "skipping favourite of deleted product");
                continue;
            };
            views.push(with_image_urls(&self.ports, product, true).await);
        }
        Ok(views)
    }
}
