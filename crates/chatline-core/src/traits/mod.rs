// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Chatline bot.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod channel;
pub mod embedding;
pub mod event_log;
pub mod provider;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use embedding::EmbeddingAdapter;
pub use event_log::EventLogAdapter;
pub use provider::ProviderAdapter;
