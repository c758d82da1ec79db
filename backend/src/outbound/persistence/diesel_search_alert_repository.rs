//! PostgreSQL-backed `SearchAlertRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SearchAlertRepository, SearchAlertRepositoryError};
use crate::domain::{SearchAlert, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{SearchAlertRow, SearchAlertWrite};
use super::pool::{DbPool, PoolError};
use super::schema::search_alerts;

/// Diesel-backed implementation of the `SearchAlertRepository` port.
#[derive(Clone)]
pub struct DieselSearchAlertRepository {
    pool: DbPool,
}

impl DieselSearchAlertRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> SearchAlertRepositoryError {
    map_pool_error(error, SearchAlertRepositoryError::connection)
}

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> SearchAlertRepositoryError {
    move |error| {
        map_diesel_error(
            error,
            operation,
            SearchAlertRepositoryError::query,
            SearchAlertRepositoryError::connection,
        )
    }
}

#[async_trait]
impl SearchAlertRepository for DieselSearchAlertRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SearchAlert>, SearchAlertRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<SearchAlertRow> = search_alerts::table
            .filter(search_alerts::user_id.eq(user_id.as_uuid()))
            .select(SearchAlertRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("find search alert"))?;
        Ok(row.map(SearchAlert::from))
    }

    async fn upsert(&self, alert: &SearchAlert) -> Result<(), SearchAlertRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(search_alerts::table)
            .values(SearchAlertWrite::from(alert))
            .on_conflict(search_alerts::user_id)
            .do_update()
            .set((
                search_alerts::categories.eq(excluded(search_alerts::categories)),
                search_alerts::min_price.eq(excluded(search_alerts::min_price)),
                search_alerts::max_price.eq(excluded(search_alerts::max_price)),
                search_alerts::keywords.eq(excluded(search_alerts::keywords)),
                search_alerts::updated_at.eq(excluded(search_alerts::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error("upsert search alert"))
    }
}
