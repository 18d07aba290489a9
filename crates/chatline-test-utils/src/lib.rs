// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Chatline.
//!
//! Mock adapters for fast, deterministic tests without the LINE or OpenAI
//! APIs.
//!
//! # Components
//!
//! - [`MockProvider`] - completion provider with scripted replies and request capture
//! - [`MockEmbedder`] - deterministic text-to-vector embedder
//! - [`MockChannel`] - channel that captures outbound messages
//! - [`MemoryEventLog`] - event log kept in memory

pub mod mock_channel;
pub mod mock_embedder;
pub mod mock_event_log;
pub mod mock_provider;

pub use mock_channel::MockChannel;
pub use mock_embedder::MockEmbedder;
pub use mock_event_log::MemoryEventLog;
pub use mock_provider::MockProvider;
