// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text message handling: log, respond, reply.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chatline_agent::Responder;
use chatline_config::model::AgentConfig;
use chatline_core::ChatlineError;
use chatline_core::traits::{ChannelAdapter, EventLogAdapter};
use chatline_core::types::{EventRecord, OutboundMessage, SessionId};
use chatline_line::WebhookEvent;
use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::dispatch::{ActiveUserTx, EventHandler};

/// Answers text messages through the configured [`Responder`].
///
/// A responder failure is answered with the apology message; only a failed
/// delivery makes `handle` return an error.
pub struct ExchangeHandler {
    responder: Arc<dyn Responder>,
    channel: Arc<dyn ChannelAdapter + Send + Sync>,
    event_log: Arc<dyn EventLogAdapter + Send + Sync>,
    active_user: ActiveUserTx,
    reply_delay_min: Duration,
    reply_delay_max: Duration,
    apology_message: String,
}

impl ExchangeHandler {
    pub fn new(
        config: &AgentConfig,
        responder: Arc<dyn Responder>,
        channel: Arc<dyn ChannelAdapter + Send + Sync>,
        event_log: Arc<dyn EventLogAdapter + Send + Sync>,
        active_user: ActiveUserTx,
    ) -> Self {
        Self {
            responder,
            channel,
            event_log,
            active_user,
            reply_delay_min: Duration::from_millis(config.reply_delay_min_ms),
            reply_delay_max: Duration::from_millis(config.reply_delay_max_ms),
            apology_message: config.apology_message.clone(),
        }
    }

    fn reply_delay(&self) -> Duration {
        if self.reply_delay_max <= self.reply_delay_min {
            return self.reply_delay_min;
        }
        rand::thread_rng().gen_range(self.reply_delay_min..=self.reply_delay_max)
    }

    async fn log(&self, record: EventRecord) {
        if let Err(e) = self.event_log.append(&record).await {
            warn!(error = %e, "failed to write event log record");
        }
    }
}

#[async_trait]
impl EventHandler for ExchangeHandler {
    async fn handle(&self, event: &WebhookEvent) -> Result<(), ChatlineError> {
        let Some(text) = event.text() else {
            debug!("ignoring non-text message");
            return Ok(());
        };
        let user_id = event.user_id().map(str::to_string);
        self.log(EventRecord::message(user_id.clone(), event.raw.clone()))
            .await;

        let Some(reply_token) = event.reply_token.as_deref() else {
            debug!("message without reply token, nothing to answer");
            return Ok(());
        };
        let Some(session_key) = event.conversation_key() else {
            warn!("message without a source, skipping");
            return Ok(());
        };

        if let Some(user_id) = &user_id {
            self.active_user.send_replace(Some(user_id.clone()));
        }

        let delay = self.reply_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let texts = match self
            .responder
            .respond(&SessionId::from(session_key), text)
            .await
        {
            Ok(reply) => reply.messages,
            Err(e) => {
                error!(session_id = session_key, error = %e, "responder failed, sending apology");
                self.log(EventRecord::error(user_id.clone(), &e)).await;
                vec![self.apology_message.clone()]
            }
        };

        if let Err(e) = self
            .channel
            .send(OutboundMessage::reply(reply_token, texts.clone()))
            .await
        {
            self.log(EventRecord::error(user_id.clone(), &e)).await;
            return Err(e);
        }

        for text in &texts {
            self.log(EventRecord::reply(user_id.clone(), text.as_str())).await;
        }
        info!(session_id = session_key, messages = texts.len(), "reply sent");
        Ok(())
    }
}
