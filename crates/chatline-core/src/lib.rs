// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Chatline webhook bot.
//!
//! This crate provides the trait definitions, error type, and shared types
//! used throughout the Chatline workspace. Adapter crates implement the
//! traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::ChatlineError;
pub use types::{
    AdapterType, DeliveryTarget, EmbeddingInput, EmbeddingOutput, EventRecord, EventType,
    HealthStatus, OutboundMessage, ProviderMessage, ProviderRequest, ProviderResponse, Role,
    SessionId, TokenUsage, Turn, TurnRole,
};

pub use traits::{ChannelAdapter, EmbeddingAdapter, EventLogAdapter, PluginAdapter, ProviderAdapter};
