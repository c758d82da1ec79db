//! PostgreSQL-backed `FavouritesRepository` implementation.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FavouritesRepository, FavouritesRepositoryError};
use crate::domain::{ProductId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewFavouriteRow;
use super::pool::{DbPool, PoolError};
use super::schema::favourites;

/// Diesel-backed implementation of the `FavouritesRepository` port.
#[derive(Clone)]
pub struct DieselFavouritesRepository {
    pool: DbPool,
}

impl DieselFavouritesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> FavouritesRepositoryError {
    map_pool_error(error, FavouritesRepositoryError::connection)
}

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> FavouritesRepositoryError {
    move |error| {
        map_diesel_error(
            error,
            operation,
            FavouritesRepositoryError::query,
            FavouritesRepositoryError::connection,
        )
    }
}

#[async_trait]
impl FavouritesRepository for DieselFavouritesRepository {
    async fn exists(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::select(diesel::dsl::exists(
            favourites::table
                .filter(favourites::user_id.eq(user_id.as_uuid()))
                .filter(favourites::product_id.eq(product_id.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(diesel_error("check favourite"))
    }

    async fn add(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewFavouriteRow {
            user_id: *user_id.as_uuid(),
            product_id: *product_id.as_uuid(),
            created_at: Utc::now(),
        };
        let inserted = diesel::insert_into(favourites::table)
            .values(&row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(diesel_error("add favourite"))?;
        Ok(inserted > 0)
    }

    async fn remove(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<bool, FavouritesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(
            favourites::table
                .filter(favourites::user_id.eq(user_id.as_uuid()))
                .filter(favourites::product_id.eq(product_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error("remove favourite"))?;
        Ok(removed > 0)
    }

    async fn list_product_ids(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ProductId>, FavouritesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let ids: Vec<uuid::Uuid> = favourites::table
            .filter(favourites::user_id.eq(user_id.as_uuid()))
            .order((favourites::created_at.desc(), favourites::product_id.asc()))
            .select(favourites::product_id)
            .load(&mut conn)
            .await
            .map_err(diesel_error("list favourites"))?;
        Ok(ids.into_iter().map(ProductId::from_uuid).collect())
    }
}
