// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE Messaging API channel adapter for Chatline.
//!
//! Inbound events arrive through the webhook gateway; this crate supplies the
//! pieces that gateway needs ([`WebhookVerifier`], [`parse_webhook`]) and the
//! outbound [`ChannelAdapter`] that delivers replies and pushes.

pub mod client;
pub mod signature;
pub mod webhook;

use std::time::Duration;

use async_trait::async_trait;
use chatline_config::model::LineConfig;
use chatline_core::error::ChatlineError;
use chatline_core::traits::{ChannelAdapter, PluginAdapter};
use chatline_core::types::{AdapterType, DeliveryTarget, HealthStatus, OutboundMessage};
use tracing::{debug, info};

pub use client::{LineClient, MAX_MESSAGES_PER_REQUEST, MAX_TEXT_CHARS, TextMessage};
pub use signature::{SIGNATURE_HEADER, WebhookVerifier};
pub use webhook::{EventKind, EventSource, WebhookEvent, parse_webhook};

/// LINE channel adapter implementing [`ChannelAdapter`].
pub struct LineChannel {
    client: LineClient,
}

impl LineChannel {
    /// Creates the adapter. Requires `line.channel_access_token`.
    pub fn new(config: &LineConfig) -> Result<Self, ChatlineError> {
        let token = config
            .channel_access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ChatlineError::Config(
                    "line.channel_access_token (or LINE_CHANNEL_ACCESS_TOKEN) is required".into(),
                )
            })?;

        let client = LineClient::new(
            token,
            &config.api_base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(base_url = config.api_base_url, "LINE channel initialized");
        Ok(Self { client })
    }

    pub fn with_client(client: LineClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for LineChannel {
    fn name(&self) -> &str {
        "line"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatlineError> {
        match self.client.bot_info().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "LINE Messaging API unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), ChatlineError> {
        debug!("LINE channel shutting down");
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for LineChannel {
    async fn send(&self, msg: OutboundMessage) -> Result<(), ChatlineError> {
        let messages = client::prepare_messages(&msg.texts);
        if messages.is_empty() {
            return Err(ChatlineError::Channel {
                message: "no non-empty text to send".into(),
                source: None,
            });
        }

        match &msg.target {
            DeliveryTarget::Reply { reply_token } => {
                self.client.reply(reply_token, &messages).await?;
                debug!(count = messages.len(), "reply delivered");
            }
            DeliveryTarget::Push { user_id } => {
                self.client.push(user_id, &messages).await?;
                debug!(user_id = %user_id, count = messages.len(), "push delivered");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn channel(server: &MockServer) -> LineChannel {
        LineChannel::new(&LineConfig {
            channel_access_token: Some("tok".into()),
            api_base_url: server.uri(),
            ..LineConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn missing_token_is_config_error() {
        let err = LineChannel::new(&LineConfig::default()).err().unwrap();
        assert!(matches!(err, ChatlineError::Config(_)));
    }

    #[tokio::test]
    async fn send_routes_reply_and_push() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let channel = channel(&server);
        channel
            .send(OutboundMessage::reply("rt", vec!["a".into()]))
            .await
            .unwrap();
        channel
            .send(OutboundMessage::push("U1", vec!["b".into()]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn send_rejects_all_empty_batch() {
        let server = MockServer::start().await;
        let err = channel(&server)
            .send(OutboundMessage::reply("rt", vec![" ".into()]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no non-empty text"));
    }

    #[tokio::test]
    async fn health_check_reports_unreachable_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/bot/info"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Authentication failed"
            })))
            .mount(&server)
            .await;

        let status = channel(&server).health_check().await.unwrap();
        assert!(matches!(status, HealthStatus::Unhealthy(_)));
    }
}
