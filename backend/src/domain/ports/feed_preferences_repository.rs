//! Port for personalised feed preferences.

use async_trait::async_trait;

use crate::domain::{FeedPreferences, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by feed preferences repository adapters.
    pub enum FeedPreferencesRepositoryError for "feed preferences repository";
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedPreferencesRepository: Send + Sync {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<FeedPreferences>, FeedPreferencesRepositoryError>;

    /// Insert or replace the user's preferences.
    async fn save(&self, preferences: &FeedPreferences) -> Result<(), FeedPreferencesRepositoryError>;
}

/// Fixture implementation with no saved preferences.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFeedPreferencesRepository;

#[async_trait]
impl FeedPreferencesRepository for FixtureFeedPreferencesRepository {
    async fn find_by_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<FeedPreferences>, FeedPreferencesRepositoryError> {
        Ok(None)
    }

    async fn save(
        &self,
        _preferences: &FeedPreferences,
    ) -> Result<(), FeedPreferencesRepositoryError> {
        Ok(())
    }
}
