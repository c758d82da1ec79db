//! Port for saved search alerts.

use async_trait::async_trait;

use crate::domain::{SearchAlert, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by search alert repository adapters.
    pub enum SearchAlertRepositoryError for "search alert repository";
}

/// One alert per user, replaced wholesale on save.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchAlertRepository: Send + Sync {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SearchAlert>, SearchAlertRepositoryError>;

    /// Insert the alert or replace the user's existing one.
    async fn upsert(&self, alert: &SearchAlert) -> Result<(), SearchAlertRepositoryError>;
}

/// Fixture implementation with no saved alerts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSearchAlertRepository;

#[async_trait]
impl SearchAlertRepository for FixtureSearchAlertRepository {
    async fn find_by_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Option<SearchAlert>, SearchAlertRepositoryError> {
        Ok(None)
    }

    async fn upsert(&self, _alert: &SearchAlert) -> Result<(), SearchAlertRepositoryError> {
        Ok(())
    }
}
