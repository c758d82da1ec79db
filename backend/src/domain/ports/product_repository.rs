//! Port for product persistence.

use async_trait::async_trait;

use crate::domain::{Product, ProductFilter, ProductId, ProductStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError for "product repository";
}

/// Catalogue store for product listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a newly created product.
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    async fn find_by_id(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<Product>, ProductRepositoryError>;

    /// Products owned by `owner_id`, newest first, optionally narrowed to a
    /// status.
    async fn list_by_owner(
        &self,
        owner_id: &UserId,
        status: Option<ProductStatus>,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Products matching a discovery filter, oldest first.
    async fn find_matching(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Overwrite the mutable fields of a stored product. Returns `false`
    /// when it did not exist.
    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError>;

    /// Remove a product. Returns `false` when it did not exist.
    async fn delete(&self, product_id: &ProductId) -> Result<bool, ProductRepositoryError>;
}

/// Fixture implementation with an empty catalogue that discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductRepository;

#[async_trait]
impl ProductRepository for FixtureProductRepository {
    async fn insert(&self, _product: &Product) -> Result<(), ProductRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _product_id: &ProductId,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(None)
    }

    async fn list_by_owner(
        &self,
        _owner_id: &UserId,
        _status: Option<ProductStatus>,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_matching(
        &self,
        _filter: &ProductFilter,
    ) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(&self, _product: &Product) -> Result<bool, ProductRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _product_id: &ProductId) -> Result<bool, ProductRepositoryError> {
        Ok(false)
    }
}
