//! Driving port for product listing management.

use async_trait::async_trait;

use crate::domain::{
    Error, FavouriteToggle, ProductDraft, ProductEdit, ProductId, ProductStatus, ProductView,
    UserId,
};

/// Create, edit, list, and delete products, and manage favourites.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalogue: Send + Sync {
    /// Store a new product and run search-alert matching for it.
    ///
    /// Alert fan-out failures are logged and never fail creation.
    async fn create_product(
        &self,
        owner: &UserId,
        draft: ProductDraft,
    ) -> Result<ProductView, Error>;

    async fn list_own_products(
        &self,
        owner: &UserId,
        status: Option<ProductStatus>,
    ) -> Result<Vec<ProductView>, Error>;

    /// Apply an owner edit. Fails with `forbidden` for anyone but the owner.
    async fn update_product(
        &self,
        user: &UserId,
        product_id: &ProductId,
        edit: ProductEdit,
    ) -> Result<ProductView, Error>;

    /// Move an owned product to `status`. Setting the current status again
    /// is a no-op.
    async fn change_status(
        &self,
        user: &UserId,
        product_id: &ProductId,
        status: ProductStatus,
    ) -> Result<ProductView, Error>;

    /// Delete a product owned by `user` along with its alert notifications.
    async fn delete_product(&self, user: &UserId, product_id: &ProductId) -> Result<(), Error>;

    async fn toggle_favourite(
        &self,
        user: &UserId,
        product_id: &ProductId,
    ) -> Result<FavouriteToggle, Error>;

    async fn list_favourites(&self, user: &UserId) -> Result<Vec<ProductView>, Error>;
}
