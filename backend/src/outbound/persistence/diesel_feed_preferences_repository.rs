//! PostgreSQL-backed `FeedPreferencesRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FeedPreferencesRepository, FeedPreferencesRepositoryError};
use crate::domain::{FeedPreferences, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::FeedPreferencesRow;
use super::pool::{DbPool, PoolError};
use super::schema::feed_preferences;

/// Diesel-backed implementation of the `FeedPreferencesRepository` port.
#[derive(Clone)]
pub struct DieselFeedPreferencesRepository {
    pool: DbPool,
}

impl DieselFeedPreferencesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> FeedPreferencesRepositoryError {
    map_pool_error(error, FeedPreferencesRepositoryError::connection)
}

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> FeedPreferencesRepositoryError {
    move |error| {
        map_diesel_error(
            error,
            operation,
            FeedPreferencesRepositoryError::query,
            FeedPreferencesRepositoryError::connection,
        )
    }
}

#[async_trait]
impl FeedPreferencesRepository for DieselFeedPreferencesRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<FeedPreferences>, FeedPreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<FeedPreferencesRow> = feed_preferences::table
            .filter(feed_preferences::user_id.eq(user_id.as_uuid()))
            .select(FeedPreferencesRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("find feed preferences"))?;
        Ok(row.map(FeedPreferences::from))
    }

    async fn save(&self, preferences: &FeedPreferences) -> Result<(), FeedPreferencesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(feed_preferences::table)
            .values(FeedPreferencesRow::from(preferences))
            .on_conflict(feed_preferences::user_id)
            .do_update()
            .set((
                feed_preferences::categories.eq(excluded(feed_preferences::categories)),
                feed_preferences::updated_at.eq(excluded(feed_preferences::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error("save feed preferences"))
    }
}
