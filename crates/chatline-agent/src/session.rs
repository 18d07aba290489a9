// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation history.
//!
//! Sessions live in a [`SessionStore`] keyed by platform user id. Each session
//! sits behind its own async mutex; a responder holds that lock for the whole
//! exchange so turns land in request-arrival order. Sessions are created on
//! first reference and never evicted.

use std::sync::Arc;

use chatline_core::types::{ProviderMessage, SessionId, Turn};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Ordered turn history of one user.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    turns: Vec<Turn>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            turns: Vec::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Appends the human turn, then the assistant turn.
    pub fn record_exchange(&mut self, human: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(Turn::human(human));
        self.turns.push(Turn::assistant(assistant));
    }

    /// History as provider messages, oldest first.
    pub fn history(&self) -> Vec<ProviderMessage> {
        self.turns.iter().map(Turn::to_provider_message).collect()
    }
}

/// Concurrent map from session id to session handle.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, SessionHandle>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating an empty one if needed.
    /// Concurrent callers for the same id receive the same handle.
    pub fn get_or_create(&self, id: &SessionId) -> SessionHandle {
        self.sessions
            .entry(id.as_str().to_string())
            .or_insert_with(|| {
                debug!(session_id = %id, "creating session");
                Arc::new(Mutex::new(Session::new(id.clone())))
            })
            .value()
            .clone()
    }

    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.get(id.as_str()).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions
            .iter()
            .map(|entry| SessionId(entry.key().clone()))
            .collect()
    }
}
