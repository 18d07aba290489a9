// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event dispatch table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chatline_core::ChatlineError;
use chatline_line::{EventKind, WebhookEvent};
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Sender half of the "most recently active user" handoff.
pub type ActiveUserTx = Arc<watch::Sender<Option<String>>>;

/// Handles one kind of webhook event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &WebhookEvent) -> Result<(), ChatlineError>;
}

/// Maps event kinds to handlers. Kinds without a handler are skipped.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<EventKind, Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, replacing any previous one.
    pub fn register(&mut self, kind: EventKind, handler: Arc<dyn EventHandler>) -> &mut Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn handles(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Runs every event through its handler, in order. A failing event is
    /// logged and does not stop the ones after it.
    pub async fn dispatch(&self, events: &[WebhookEvent]) {
        for event in events {
            let Some(handler) = self.handlers.get(&event.kind()) else {
                debug!(event_type = event.event_type.as_str(), "no handler registered, skipping");
                continue;
            };
            if let Err(e) = handler.handle(event).await {
                error!(
                    event_type = event.event_type.as_str(),
                    user_id = event.user_id().unwrap_or("-"),
                    error = %e,
                    "event handling failed"
                );
            }
        }
    }
}

/// Makes a newly added friend the push target.
pub struct FollowHandler {
    active_user: ActiveUserTx,
}

impl FollowHandler {
    pub fn new(active_user: ActiveUserTx) -> Self {
        Self { active_user }
    }
}

#[async_trait]
impl EventHandler for FollowHandler {
    async fn handle(&self, event: &WebhookEvent) -> Result<(), ChatlineError> {
        if let Some(user_id) = event.user_id() {
            info!(user_id, "new follower");
            self.active_user.send_replace(Some(user_id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_line::parse_webhook;
    use tokio::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &WebhookEvent) -> Result<(), ChatlineError> {
            let id = event.user_id().unwrap_or_default().to_string();
            self.seen.lock().await.push(id.clone());
            if self.fail_on == Some(id.as_str()) {
                return Err(ChatlineError::Internal("boom".into()));
            }
            Ok(())
        }
    }

    fn events(json: &str) -> Vec<WebhookEvent> {
        parse_webhook(json.as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn dispatches_in_order_and_continues_after_failure() {
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            fail_on: Some("U1"),
        });
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(EventKind::Message, recorder.clone());

        dispatcher
            .dispatch(&events(
                r#"{"events":[
                {"type":"message","source":{"type":"user","userId":"U1"}},
                {"type":"unfollow","source":{"type":"user","userId":"U9"}},
                {"type":"message","source":{"type":"user","userId":"U2"}}
            ]}"#,
            ))
            .await;

        assert_eq!(*recorder.seen.lock().await, vec!["U1", "U2"]);
    }

    #[tokio::test]
    async fn follow_publishes_active_user() {
        let (tx, rx) = watch::channel(None);
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(EventKind::Follow, Arc::new(FollowHandler::new(Arc::new(tx))));
        assert!(dispatcher.handles(EventKind::Follow));
        assert!(!dispatcher.handles(EventKind::Message));

        dispatcher
            .dispatch(&events(
                r#"{"events":[{"type":"follow","replyToken":"t","source":{"type":"user","userId":"U7"}}]}"#,
            ))
            .await;
        assert_eq!(rx.borrow().as_deref(), Some("U7"));
    }
}
