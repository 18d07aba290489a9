// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only JSONL event log.
//!
//! Every inbound message, reply, push, and reply-path failure is written as
//! one JSON object per line. Each append opens the file, writes the full
//! line, flushes, and closes it again; nothing is buffered across calls.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chatline_core::{
    AdapterType, ChatlineError, EventLogAdapter, EventRecord, HealthStatus, PluginAdapter,
};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Event log backed by a single JSONL file.
pub struct JsonlEventLog {
    path: PathBuf,
    /// Serializes appends so lines from concurrent callers never interleave.
    write_lock: Mutex<()>,
}

impl JsonlEventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_line(&self, line: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for JsonlEventLog {
    fn name(&self) -> &str {
        "jsonl-event-log"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::EventLog
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatlineError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => Ok(
                HealthStatus::Degraded(format!("{} does not exist yet", parent.display())),
            ),
            _ => Ok(HealthStatus::Healthy),
        }
    }

    async fn shutdown(&self) -> Result<(), ChatlineError> {
        Ok(())
    }
}

#[async_trait]
impl EventLogAdapter for JsonlEventLog {
    async fn append(&self, record: &EventRecord) -> Result<(), ChatlineError> {
        let mut line = serde_json::to_vec(record).map_err(|e| ChatlineError::Storage {
            source: Box::new(e),
        })?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        self.write_line(&line).await?;
        debug!(
            path = %self.path.display(),
            event_type = %record.event_type,
            "event record appended"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chatline_core::EventType;

    use super::*;

    fn read_records(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn appends_one_line_per_record_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/events.jsonl");
        let log = JsonlEventLog::new(&path);

        log.append(&EventRecord::push("U1", "Good morning!"))
            .await
            .unwrap();
        log.append(&EventRecord::reply(Some("U1".into()), "hello"))
            .await
            .unwrap();

        let records = read_records(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "push");
        assert_eq!(records[0]["to_user_id"], "U1");
        assert_eq!(records[1]["type"], "reply");
        assert_eq!(records[1]["response"], "hello");
    }

    #[tokio::test]
    async fn existing_records_are_never_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        std::fs::write(&path, "{\"type\":\"message\"}\n").unwrap();

        let log = JsonlEventLog::new(&path);
        log.append(&EventRecord::error(None, "boom")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\"type\":\"message\"}\n"));
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let log = Arc::new(JsonlEventLog::new(&path));

        let mut handles = Vec::new();
        for i in 0..32 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                let text = format!("message-{i}-{}", "x".repeat(512));
                log.append(&EventRecord::push(format!("U{i}"), text))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let records = read_records(&path);
        assert_eq!(records.len(), 32);
        assert!(records.iter().all(|r| r["type"] == "push"));
    }

    #[tokio::test]
    async fn unwritable_path_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let log = JsonlEventLog::new(dir.path());
        let err = log
            .append(&EventRecord::push("U1", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatlineError::Storage { .. }));
    }

    #[tokio::test]
    async fn message_record_carries_raw_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let log = JsonlEventLog::new(&path);
        let raw = serde_json::json!({"type": "message", "message": {"text": "hi"}});

        log.append(&EventRecord::message(Some("U9".into()), raw))
            .await
            .unwrap();

        let records = read_records(&path);
        assert_eq!(records[0]["type"], EventType::Message.to_string());
        assert_eq!(records[0]["event"]["message"]["text"], "hi");
        assert_eq!(records[0]["from_user_id"], "U9");
    }
}
