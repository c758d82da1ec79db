//! Reqwest-backed dispatcher for the FCM legacy HTTP endpoint.
//!
//! This adapter owns transport details only: request shape, the server-key
//! authorisation header, timeout, and status mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::debug;

use crate::domain::ports::{
    AlertPushPayload, PushDispatchError, PushMessage, PushNotificationDispatcher,
};

/// Gateway settings for [`FcmPushDispatcher`].
#[derive(Debug, Clone)]
pub struct FcmSettings {
    pub endpoint: Url,
    pub server_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a AlertPushPayload,
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    notification: FcmNotification<'a>,
    data: &'a AlertPushPayload,
    registration_ids: &'a [String],
}

impl<'a> FcmRequest<'a> {
    fn new(tokens: &'a [String], message: &'a PushMessage) -> Self {
        Self {
            notification: FcmNotification {
                title: &message.title,
                body: &message.payload,
            },
            data: &message.payload,
            registration_ids: tokens,
        }
    }
}

/// Dispatcher that POSTs one multicast request per message.
pub struct FcmPushDispatcher {
    client: Client,
    endpoint: Url,
    authorization: String,
}

impl FcmPushDispatcher {
    /// Build a dispatcher whose client enforces `settings.timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: FcmSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint,
            authorization: format!("key={}", settings.server_key),
        })
    }
}

#[async_trait]
impl PushNotificationDispatcher for FcmPushDispatcher {
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<(), PushDispatchError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::AUTHORIZATION, self.authorization.as_str())
            .json(&FcmRequest::new(tokens, message))
            .send()
            .await
            .map_err(|error| PushDispatchError::transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(map_status_error(status, body.as_ref()));
        }
        debug!(
            token_count = tokens.len(),
            receiver_id = %message.payload.receiver_id,
            "push message accepted by gateway"
        );
        Ok(())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PushDispatchError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    PushDispatchError::rejected(status.as_u16(), preview)
}
