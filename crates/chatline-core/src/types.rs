// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Chatline crates.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Format used for the `datetime` field of event log records.
pub const EVENT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifier for a conversation session (the platform user id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        SessionId(value.to_string())
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Embedding,
    EventLog,
}

// --- Conversation types ---

/// Author of a conversational turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TurnRole {
    Human,
    Assistant,
}

/// One message within a session. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: TurnRole,
    content: String,
    created_at: DateTime<Utc>,
}

impl Turn {
    pub fn human(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Human, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Converts this turn into a role-tagged message for a completion request.
    pub fn to_provider_message(&self) -> ProviderMessage {
        match self.role {
            TurnRole::Human => ProviderMessage::user(self.content.clone()),
            TurnRole::Assistant => ProviderMessage::assistant(self.content.clone()),
        }
    }
}

// --- Provider types ---

/// Role of a message sent to the completion API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A role-tagged message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: Role,
    pub content: String,
}

impl ProviderMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A request to the completion API.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Model identifier.
    pub model: String,
    /// Ordered conversation messages, system prompt first when present.
    pub messages: Vec<ProviderMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional cap on generated tokens.
    pub max_tokens: Option<u32>,
}

/// Token accounting reported by the completion API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// A response from the completion API.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub id: String,
    /// Generated text.
    pub content: String,
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: TokenUsage,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

/// Output from an embedding adapter, one vector per input text, in input order.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
}

// --- Channel types ---

/// Where an outbound message is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// Answer a webhook event with its single-use reply token.
    Reply { reply_token: String },
    /// Proactively push to a user id.
    Push { user_id: String },
}

/// An ordered batch of text messages for one delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub target: DeliveryTarget,
    pub texts: Vec<String>,
}

impl OutboundMessage {
    pub fn reply(reply_token: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            target: DeliveryTarget::Reply {
                reply_token: reply_token.into(),
            },
            texts,
        }
    }

    pub fn push(user_id: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            target: DeliveryTarget::Push {
                user_id: user_id.into(),
            },
            texts,
        }
    }
}

// --- Event log types ---

/// Type tag of an event log record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventType {
    Message,
    Reply,
    Push,
    Error,
}

/// One line of the append-only event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    pub datetime: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_user_id: Option<String>,
    /// Text sent to the user (reply and push records).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Raw inbound webhook event (message records).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EventRecord {
    fn now(event_type: EventType) -> Self {
        Self {
            datetime: Local::now().format(EVENT_DATETIME_FORMAT).to_string(),
            event_type,
            from_user_id: None,
            to_user_id: None,
            response: None,
            event: None,
            error: None,
        }
    }

    /// An inbound webhook event.
    pub fn message(from_user_id: Option<String>, event: serde_json::Value) -> Self {
        Self {
            from_user_id,
            event: Some(event),
            ..Self::now(EventType::Message)
        }
    }

    /// A reply delivered with a reply token.
    pub fn reply(to_user_id: Option<String>, response: impl Into<String>) -> Self {
        Self {
            to_user_id,
            response: Some(response.into()),
            ..Self::now(EventType::Reply)
        }
    }

    /// A proactive push message.
    pub fn push(to_user_id: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            to_user_id: Some(to_user_id.into()),
            response: Some(response.into()),
            ..Self::now(EventType::Push)
        }
    }

    /// A failure on the reply or push path.
    pub fn error(user_id: Option<String>, error: impl std::fmt::Display) -> Self {
        Self {
            to_user_id: user_id,
            error: Some(error.to_string()),
            ..Self::now(EventType::Error)
        }
    }
}
