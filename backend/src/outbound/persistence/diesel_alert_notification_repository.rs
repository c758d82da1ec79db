//! PostgreSQL-backed `AlertNotificationRepository` implementation.
//!
//! The `(receiver_id, product_id)` unique constraint makes `record`
//! idempotent under concurrent fan-out.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AlertNotificationRepository, AlertNotificationRepositoryError};
use crate::domain::{ProductId, SearchAlertNotification, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NotificationRow;
use super::pool::{DbPool, PoolError};
use super::schema::search_alert_notifications as notifications;

/// Diesel-backed implementation of the `AlertNotificationRepository` port.
#[derive(Clone)]
pub struct DieselAlertNotificationRepository {
    pool: DbPool,
}

impl DieselAlertNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AlertNotificationRepositoryError {
    map_pool_error(error, AlertNotificationRepositoryError::connection)
}

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> AlertNotificationRepositoryError {
    move |error| {
        map_diesel_error(
            error,
            operation,
            AlertNotificationRepositoryError::query,
            AlertNotificationRepositoryError::connection,
        )
    }
}

#[async_trait]
impl AlertNotificationRepository for DieselAlertNotificationRepository {
    async fn record(
        &self,
        notification: &SearchAlertNotification,
    ) -> Result<bool, AlertNotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let inserted = diesel::insert_into(notifications::table)
            .values(NotificationRow::from(notification))
            .on_conflict((notifications::receiver_id, notifications::product_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(diesel_error("record alert notification"))?;
        Ok(inserted > 0)
    }

    async fn list_for_receiver(
        &self,
        receiver_id: &UserId,
    ) -> Result<Vec<SearchAlertNotification>, AlertNotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(notifications::receiver_id.eq(receiver_id.as_uuid()))
            .select(NotificationRow::as_select())
            .order((notifications::created_at.desc(), notifications::id.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error("list alert notifications"))?;
        Ok(rows.into_iter().map(SearchAlertNotification::from).collect())
    }

    async fn delete_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<u64, AlertNotificationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(
            notifications::table.filter(notifications::product_id.eq(product_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(diesel_error("delete alert notifications"))?;
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }
}
