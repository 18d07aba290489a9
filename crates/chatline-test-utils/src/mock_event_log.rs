// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory event log.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use chatline_core::ChatlineError;
use chatline_core::traits::{EventLogAdapter, PluginAdapter};
use chatline_core::types::{AdapterType, EventRecord, EventType, HealthStatus};

/// Keeps appended records in a `Vec` instead of a file.
#[derive(Default)]
pub struct MemoryEventLog {
    records: Mutex<Vec<EventRecord>>,
    failing: AtomicBool,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every `append()` returns a `Storage` error and keeps nothing.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn records(&self) -> Vec<EventRecord> {
        self.records.lock().await.clone()
    }

    /// Record types in append order.
    pub async fn types(&self) -> Vec<EventType> {
        self.records
            .lock()
            .await
            .iter()
            .map(|r| r.event_type)
            .collect()
    }
}

#[async_trait]
impl PluginAdapter for MemoryEventLog {
    fn name(&self) -> &str {
        "memory-event-log"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::EventLog
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatlineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ChatlineError> {
        Ok(())
    }
}

#[async_trait]
impl EventLogAdapter for MemoryEventLog {
    async fn append(&self, record: &EventRecord) -> Result<(), ChatlineError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ChatlineError::Storage {
                source: Box::new(std::io::Error::other("mock event log failure")),
            });
        }
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_log_keeps_nothing() {
        let log = MemoryEventLog::new();
        log.append(&EventRecord::push("U1", "hi")).await.unwrap();

        log.set_failing(true);
        let err = log.append(&EventRecord::push("U1", "again")).await.unwrap_err();
        assert!(matches!(err, ChatlineError::Storage { .. }));
        assert_eq!(log.types().await, vec![EventType::Push]);
    }
}
