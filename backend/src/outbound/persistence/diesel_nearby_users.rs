//! PostGIS-backed `NearbyUsers` geo index.

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::{Double, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NearbyUsers, NearbyUsersError};
use crate::domain::{GeoPoint, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NearbyUserRow;
use super::pool::DbPool;

// $2/$3 are longitude/latitude of the centre, $4 the radius in metres.
const WITHIN_RADIUS_SQL: &str = "SELECT id FROM users \
     WHERE location IS NOT NULL \
       AND id <> $1 \
       AND ST_DWithin(location, ST_SetSRID(ST_MakePoint($2, $3), 4326)::geography, $4) \
     ORDER BY ST_Distance(location, ST_SetSRID(ST_MakePoint($2, $3), 4326)::geography), id";

/// Radius search over `users.location` using the GiST index.
#[derive(Clone)]
pub struct DieselNearbyUsers {
    pool: DbPool,
}

impl DieselNearbyUsers {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NearbyUsers for DieselNearbyUsers {
    async fn find_within(
        &self,
        centre: GeoPoint,
        radius_metres: f64,
        exclude: &UserId,
    ) -> Result<Vec<UserId>, NearbyUsersError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_pool_error(error, NearbyUsersError::connection))?;
        let rows: Vec<NearbyUserRow> = sql_query(WITHIN_RADIUS_SQL)
            .bind::<SqlUuid, _>(*exclude.as_uuid())
            .bind::<Double, _>(centre.longitude())
            .bind::<Double, _>(centre.latitude())
            .bind::<Double, _>(radius_metres)
            .load(&mut conn)
            .await
            .map_err(|error| {
                map_diesel_error(
                    error,
                    "find users within radius",
                    NearbyUsersError::query,
                    NearbyUsersError::connection,
                )
            })?;
        Ok(rows.into_iter().map(|row| UserId::from_uuid(row.id)).collect())
    }
}
