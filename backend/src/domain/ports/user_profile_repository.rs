//! Port for the per-user profile data the marketplace reads and writes.
//!
//! Identity lives with the external login flow. This store only carries the
//! saved location and push delivery settings keyed by user id.

use async_trait::async_trait;

use crate::domain::{GeoPoint, PushTarget, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user profile repository adapters.
    pub enum UserProfileRepositoryError for "user profile repository";
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Saved location, or `None` when the user never shared one.
    async fn find_location(
        &self,
        user_id: &UserId,
    ) -> Result<Option<GeoPoint>, UserProfileRepositoryError>;

    /// Create or replace the user's location.
    async fn save_location(
        &self,
        user_id: &UserId,
        location: GeoPoint,
    ) -> Result<(), UserProfileRepositoryError>;

    /// Push delivery settings, or `None` for an unknown user.
    async fn find_push_target(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PushTarget>, UserProfileRepositoryError>;

    /// Append a device token unless the user already has it. Returns
    /// `false` when the token was already registered.
    async fn add_push_token(
        &self,
        user_id: &UserId,
        token: &str,
    ) -> Result<bool, UserProfileRepositoryError>;

    async fn set_notifications_enabled(
        &self,
        user_id: &UserId,
        enabled: bool,
    ) -> Result<(), UserProfileRepositoryError>;
}

/// Fixture implementation with no stored profiles.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileRepository;

#[async_trait]
impl UserProfileRepository for FixtureUserProfileRepository {
    async fn find_location(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<GeoPoint>, UserProfileRepositoryError> {
        Ok(None)
    }

    async fn save_location(
        &self,
        _user_id: &UserId,
        _location: GeoPoint,
    ) -> Result<(), UserProfileRepositoryError> {
        Ok(())
    }

    async fn find_push_target(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<PushTarget>, UserProfileRepositoryError> {
        Ok(None)
    }

    async fn add_push_token(
        &self,
        _user_id: &UserId,
        _token: &str,
    ) -> Result<bool, UserProfileRepositoryError> {
        Ok(true)
    }

    async fn set_notifications_enabled(
        &self,
        _user_id: &UserId,
        _enabled: bool,
    ) -> Result<(), UserProfileRepositoryError> {
        Ok(())
    }
}
