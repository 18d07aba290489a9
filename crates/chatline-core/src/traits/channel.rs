// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the messaging platform.

use async_trait::async_trait;

use crate::error::ChatlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::OutboundMessage;

/// Adapter for delivering messages to the messaging platform.
///
/// Inbound traffic arrives through the webhook gateway, so the channel
/// only covers the outbound half.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Delivers a batch of text messages as a reply or a push.
    async fn send(&self, msg: OutboundMessage) -> Result<(), ChatlineError>;
}
