//! Port for the geo index over user locations.

use async_trait::async_trait;

use crate::domain::{GeoPoint, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by geo index adapters.
    pub enum NearbyUsersError for "geo index";
}

/// Nearest-neighbour lookup over saved user locations.
///
/// Results are ordered nearest first, ties broken by user id, so callers can
/// rely on a deterministic candidate order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NearbyUsers: Send + Sync {
    /// Users whose location lies within `radius_metres` of `centre`,
    /// excluding `exclude`.
    async fn find_within(
        &self,
        centre: GeoPoint,
        radius_metres: f64,
        exclude: &UserId,
    ) -> Result<Vec<UserId>, NearbyUsersError>;
}

/// Fixture implementation that never finds anyone nearby.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNearbyUsers;

#[async_trait]
impl NearbyUsers for FixtureNearbyUsers {
    async fn find_within(
        &self,
        _centre: GeoPoint,
        _radius_metres: f64,
        _exclude: &UserId,
    ) -> Result<Vec<UserId>, NearbyUsersError> {
        Ok(Vec::new())
    }
}
