//! Personalised feed preferences.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::UserId;

/// Categories a user wants to see when browsing without filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPreferences {
    pub user_id: UserId,
    pub categories: Vec<String>,
    pub updated_at: DateTime<Utc>,
}
