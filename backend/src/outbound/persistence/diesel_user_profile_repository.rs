//! PostgreSQL-backed `UserProfileRepository` implementation.
//!
//! Location reads and writes use raw SQL because the `users.location`
//! column is a PostGIS geography that Diesel cannot express. Push settings
//! writes are upserts too, so a user unknown to the marketplace gets a row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Bool, Double, Text, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::{GeoPoint, PushTarget, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LocationRow, PushTargetRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const FIND_LOCATION_SQL: &str = "SELECT ST_X(location::geometry) AS longitude, \
     ST_Y(location::geometry) AS latitude \
     FROM users WHERE id = $1";

const SAVE_LOCATION_SQL: &str = "INSERT INTO users (id, location, updated_at) \
     VALUES ($1, ST_SetSRID(ST_MakePoint($2, $3), 4326)::geography, now()) \
     ON CONFLICT (id) DO UPDATE \
     SET location = EXCLUDED.location, updated_at = EXCLUDED.updated_at";

/// Affects no row when the token is already present.
const ADD_PUSH_TOKEN_SQL: &str = "INSERT INTO users (id, push_tokens, updated_at) \
     VALUES ($1, ARRAY[$2], now()) \
     ON CONFLICT (id) DO UPDATE \
     SET push_tokens = array_append(users.push_tokens, $2), updated_at = EXCLUDED.updated_at \
     WHERE NOT ($2 = ANY(users.push_tokens))";

const SET_NOTIFICATIONS_SQL: &str = "INSERT INTO users (id, notifications_enabled, updated_at) \
     VALUES ($1, $2, now()) \
     ON CONFLICT (id) DO UPDATE \
     SET notifications_enabled = EXCLUDED.notifications_enabled, \
     updated_at = EXCLUDED.updated_at";

/// Diesel-backed implementation of the `UserProfileRepository` port.
#[derive(Clone)]
pub struct DieselUserProfileRepository {
    pool: DbPool,
}

impl DieselUserProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserProfileRepositoryError {
    map_pool_error(error, UserProfileRepositoryError::connection)
}

fn diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> UserProfileRepositoryError {
    move |error| {
        map_diesel_error(
            error,
            operation,
            UserProfileRepositoryError::query,
            UserProfileRepositoryError::connection,
        )
    }
}

fn row_to_location(user_id: &UserId, row: LocationRow) -> Option<GeoPoint> {
    let (longitude, latitude) = (row.longitude?, row.latitude?);
    match GeoPoint::new(longitude, latitude) {
        Ok(point) => Some(point),
        Err(error) => {
            warn!(%user_id, %error, "ignoring stored location outside WGS84 bounds");
            None
        }
    }
}

#[async_trait]
impl UserProfileRepository for DieselUserProfileRepository {
    async fn find_location(
        &self,
        user_id: &UserId,
    ) -> Result<Option<GeoPoint>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<LocationRow> = sql_query(FIND_LOCATION_SQL)
            .bind::<SqlUuid, _>(*user_id.as_uuid())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("find user location"))?;
        Ok(row.and_then(|row| row_to_location(user_id, row)))
    }

    async fn save_location(
        &self,
        user_id: &UserId,
        location: GeoPoint,
    ) -> Result<(), UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        sql_query(SAVE_LOCATION_SQL)
            .bind::<SqlUuid, _>(*user_id.as_uuid())
            .bind::<Double, _>(location.longitude())
            .bind::<Double, _>(location.latitude())
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error("save user location"))
    }

    async fn find_push_target(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PushTarget>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<PushTargetRow> = users::table
            .filter(users::id.eq(user_id.as_uuid()))
            .select(PushTargetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error("find push target"))?;
        Ok(row.map(PushTarget::from))
    }

    async fn add_push_token(
        &self,
        user_id: &UserId,
        token: &str,
    ) -> Result<bool, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let affected = sql_query(ADD_PUSH_TOKEN_SQL)
            .bind::<SqlUuid, _>(*user_id.as_uuid())
            .bind::<Text, _>(token)
            .execute(&mut conn)
            .await
            .map_err(diesel_error("add push token"))?;
        Ok(affected > 0)
    }

    async fn set_notifications_enabled(
        &self,
        user_id: &UserId,
        enabled: bool,
    ) -> Result<(), UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        sql_query(SET_NOTIFICATIONS_SQL)
            .bind::<SqlUuid, _>(*user_id.as_uuid())
            .bind::<Bool, _>(enabled)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error("set notifications enabled"))
    }
}
