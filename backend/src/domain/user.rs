//! User identity and push-delivery settings.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    EmptyId,
    InvalidId,
}

impl fmt::Display for UserIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
        }
    }
}

impl std::error::Error for UserIdError {}

/// Stable user identifier stored as a UUID.
///
/// Users are provisioned by the external login flow; the marketplace only
/// ever sees their identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserIdError> {
        if id.is_empty() {
            return Err(UserIdError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserIdError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserIdError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Where and whether a user wants push messages delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushTarget {
    /// Registered device tokens, oldest first.
    pub tokens: Vec<String>,
    /// Whether the user allows push notifications at all.
    pub notifications_enabled: bool,
}

impl PushTarget {
    /// Non-blank tokens eligible for delivery, or `None` when delivery must
    /// be skipped.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::PushTarget;
    ///
    /// let muted = PushTarget { tokens: vec!["t".into()], notifications_enabled: false };
    /// assert!(muted.deliverable_tokens().is_none());
    /// ```
    pub fn deliverable_tokens(&self) -> Option<Vec<String>> {
        if !self.notifications_enabled {
            return None;
        }
        let tokens: Vec<String> = self
            .tokens
            .iter()
            .filter(|token| !token.trim().is_empty())
            .cloned()
            .collect();
        (!tokens.is_empty()).then_some(tokens)
    }
}

impl Default for PushTarget {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            notifications_enabled: true,
        }
    }
}
