//! Port for delivering push notifications to user devices.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{ProductId, UserId};

use super::define_port_error;

/// Title carried by every search-alert push message.
pub const SEARCH_ALERT_TITLE: &str = "search Alert";

define_port_error! {
    /// Errors raised by push dispatch adapters. Logged, never surfaced.
    pub enum PushDispatchError {
        /// The push gateway could not be reached.
        Transport { message: String } =>
            "push gateway transport failed: {message}",
        /// The push gateway answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "push gateway rejected the message with status {status}: {message}",
    }
}

/// Payload describing the product that triggered an alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPushPayload {
    pub receiver_id: UserId,
    pub product_id: ProductId,
    pub product_images: Vec<String>,
    pub product_name: String,
    pub product_description: String,
}

/// Message handed to a [`PushNotificationDispatcher`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub title: String,
    pub payload: AlertPushPayload,
}

impl PushMessage {
    /// Build the message announcing a matching product.
    pub fn search_alert(payload: AlertPushPayload) -> Self {
        Self {
            title: SEARCH_ALERT_TITLE.to_owned(),
            payload,
        }
    }
}

/// Delivers a message to a set of device registration tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushNotificationDispatcher: Send + Sync {
    async fn send(&self, tokens: &[String], message: &PushMessage)
    -> Result<(), PushDispatchError>;
}

/// Dispatcher used when no push gateway is configured. Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPushDispatcher;

#[async_trait]
impl PushNotificationDispatcher for DisabledPushDispatcher {
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<(), PushDispatchError> {
        tracing::debug!(
            token_count = tokens.len(),
            receiver_id = %message.payload.receiver_id,
            "push delivery disabled; dropping message"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_alert_messages_use_fixed_title() {
        let message = PushMessage::search_alert(AlertPushPayload {
            receiver_id: UserId::random(),
            product_id: ProductId::random(),
            product_images: vec![],
            product_name: "Lamp".to_owned(),
            product_description: "Bright".to_owned(),
        });
        assert_eq!(message.title, "search Alert");
    }

    #[test]
    fn rejected_error_reports_status() {
        let err = PushDispatchError::rejected(401_u16, "bad key");
        assert_eq!(
            err.to_string(),
            "push gateway rejected the message with status 401: bad key"
        );
    }
}
