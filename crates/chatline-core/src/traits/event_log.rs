// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event log adapter trait for the append-only activity record.

use async_trait::async_trait;

use crate::error::ChatlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::EventRecord;

/// Sink for inbound, outbound, and error records.
///
/// Appends from concurrent tasks must never interleave within a record, and
/// a record is never modified once written.
#[async_trait]
pub trait EventLogAdapter: PluginAdapter {
    /// Appends one record.
    async fn append(&self, record: &EventRecord) -> Result<(), ChatlineError>;
}
