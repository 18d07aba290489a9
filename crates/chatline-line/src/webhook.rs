// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook request body and event types.

use chatline_core::ChatlineError;
use serde::Deserialize;

/// Top-level webhook body: `{ "destination": ..., "events": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: String,
    pub events: Vec<serde_json::Value>,
}

/// Event type tag, used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Message,
    Follow,
    Unfollow,
    Join,
    Leave,
    Postback,
    Other,
}

impl EventKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "message" => EventKind::Message,
            "follow" => EventKind::Follow,
            "unfollow" => EventKind::Unfollow,
            "join" => EventKind::Join,
            "leave" => EventKind::Leave,
            "postback" => EventKind::Postback,
            _ => EventKind::Other,
        }
    }
}

/// Who an event came from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type", default)]
    pub source_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
}

impl EventSource {
    /// Key for conversation state: the user id, else the group or room id.
    pub fn conversation_key(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or(self.group_id.as_deref())
            .or(self.room_id.as_deref())
    }
}

/// Message content of a `message` event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// One webhook event, with the raw JSON kept for the event log.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub message: Option<EventMessage>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl WebhookEvent {
    pub fn kind(&self) -> EventKind {
        EventKind::from_tag(&self.event_type)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.user_id.as_deref())
    }

    pub fn conversation_key(&self) -> Option<&str> {
        self.source.as_ref().and_then(EventSource::conversation_key)
    }

    /// The text of a text message; `None` for stickers, images, and other events.
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|m| m.message_type == "text")
            .and_then(|m| m.text.as_deref())
    }
}

/// Parses a verified webhook body into its events, in delivery order.
pub fn parse_webhook(body: &[u8]) -> Result<Vec<WebhookEvent>, ChatlineError> {
    let parsed: WebhookBody = serde_json::from_slice(body).map_err(malformed)?;
    parsed
        .events
        .into_iter()
        .map(|raw| {
            let mut event: WebhookEvent = serde_json::from_value(raw.clone()).map_err(malformed)?;
            event.raw = raw;
            Ok(event)
        })
        .collect()
}

fn malformed(e: serde_json::Error) -> ChatlineError {
    ChatlineError::Channel {
        message: format!("malformed webhook body: {e}"),
        source: Some(Box::new(e)),
    }
}
