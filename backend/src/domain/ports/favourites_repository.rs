//! Port for user favourites.

use async_trait::async_trait;

use crate::domain::{ProductId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by favourites repository adapters.
    pub enum FavouritesRepositoryError for "favourites repository";
}

/// Set of (user, product) favourite pairs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavouritesRepository: Send + Sync {
    async fn exists(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError>;

    /// Add a pair. Returns `false` when it was already present.
    async fn add(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError>;

    /// Remove a pair. Returns `false` when it was not present.
    async fn remove(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError>;

    /// Favourited product ids, most recently added first.
    async fn list_product_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProductId>, FavouritesRepositoryError>;
}

/// Fixture implementation with no favourites.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFavouritesRepository;

#[async_trait]
impl FavouritesRepository for FixtureFavouritesRepository {
    async fn exists(
        &self,
        _user_id: &UserId,
        _product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError> {
        Ok(false)
    }

    async fn add(
        &self,
        _user_id: &UserId,
        _product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError> {
        Ok(true)
    }

    async fn remove(
        &self,
        _user_id: &UserId,
        _product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError> {
        Ok(false)
    }

    async fn list_product_ids(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<ProductId>, FavouritesRepositoryError> {
        Ok(Vec::new())
    }
}
