// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Responders turn one inbound text into reply messages.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chatline_config::model::{AgentConfig, OpenAiConfig};
use chatline_core::ChatlineError;
use chatline_core::traits::ProviderAdapter;
use chatline_core::types::{ProviderMessage, ProviderRequest, SessionId};
use chatline_memory::CorpusRetriever;
use tracing::{debug, info, warn};

use crate::prompt;
use crate::session::SessionStore;

/// Text messages to deliver back to the user, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub messages: Vec<String>,
}

impl AgentReply {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            messages: vec![text.into()],
        }
    }
}

/// Produces a reply for one user message.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, session_id: &SessionId, text: &str) -> Result<AgentReply, ChatlineError>;
}

/// Completion calls with fixed model settings and a hard deadline.
#[derive(Clone)]
pub struct Completer {
    provider: Arc<dyn ProviderAdapter + Send + Sync>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl Completer {
    pub fn new(
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            timeout,
        }
    }

    pub fn from_config(
        provider: Arc<dyn ProviderAdapter + Send + Sync>,
        openai: &OpenAiConfig,
        agent: &AgentConfig,
    ) -> Self {
        Self {
            temperature: openai.temperature,
            max_tokens: openai.max_tokens,
            ..Self::new(
                provider,
                openai.model.clone(),
                Duration::from_secs(agent.request_timeout_secs),
            )
        }
    }

    /// Sends `messages` and returns the completion text.
    ///
    /// An elapsed deadline becomes [`ChatlineError::Timeout`]. A blank
    /// completion is a [`ChatlineError::Provider`] error, never a reply.
    pub async fn complete(&self, messages: Vec<ProviderMessage>) -> Result<String, ChatlineError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        match tokio::time::timeout(self.timeout, self.provider.complete(request)).await {
            Ok(result) => {
                let response = result?;
                debug!(
                    model = %response.model,
                    prompt_tokens = response.usage.prompt_tokens,
                    completion_tokens = response.usage.completion_tokens,
                    "completion received"
                );
                if response.content.trim().is_empty() {
                    warn!(model = %response.model, "completion was empty");
                    return Err(ChatlineError::Provider {
                        message: "empty completion".into(),
                        source: None,
                    });
                }
                Ok(response.content)
            }
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs_f32(), "completion timed out");
                Err(ChatlineError::Timeout {
                    duration: self.timeout,
                })
            }
        }
    }
}

/// Plain chat: persona, history, and the new message.
pub struct ConversationResponder {
    sessions: Arc<SessionStore>,
    completer: Completer,
    persona: String,
}

impl ConversationResponder {
    pub fn new(sessions: Arc<SessionStore>, completer: Completer, persona: impl Into<String>) -> Self {
        Self {
            sessions,
            completer,
            persona: persona.into(),
        }
    }
}

#[async_trait]
impl Responder for ConversationResponder {
    async fn respond(&self, session_id: &SessionId, text: &str) -> Result<AgentReply, ChatlineError> {
        let handle = self.sessions.get_or_create(session_id);
        let mut session = handle.lock().await;

        let messages = prompt::conversation_messages(&self.persona, &session.history(), text);
        let answer = self.completer.complete(messages).await?;

        session.record_exchange(text, answer.as_str());
        info!(session_id = %session_id, turns = session.len(), "exchange recorded");
        Ok(AgentReply::single(answer))
    }
}

/// Chat grounded in the reference corpus.
pub struct RetrievalResponder {
    sessions: Arc<SessionStore>,
    completer: Completer,
    retriever: Arc<CorpusRetriever>,
}

impl RetrievalResponder {
    pub fn new(
        sessions: Arc<SessionStore>,
        completer: Completer,
        retriever: Arc<CorpusRetriever>,
    ) -> Self {
        Self {
            sessions,
            completer,
            retriever,
        }
    }

    async fn search_query(
        &self,
        history: &[ProviderMessage],
        text: &str,
    ) -> Result<String, ChatlineError> {
        if history.is_empty() {
            return Ok(text.to_string());
        }
        let rewritten = self
            .completer
            .complete(prompt::search_query_messages(history, text))
            .await?;
        Ok(rewritten.trim().to_string())
    }
}

#[async_trait]
impl Responder for RetrievalResponder {
    async fn respond(&self, session_id: &SessionId, text: &str) -> Result<AgentReply, ChatlineError> {
        let handle = self.sessions.get_or_create(session_id);
        let mut session = handle.lock().await;
        let history = session.history();

        let query = self.search_query(&history, text).await?;
        let chunks = self.retriever.retrieve(&query).await?;
        debug!(query = query.as_str(), chunks = chunks.len(), "context retrieved");

        let answer = self
            .completer
            .complete(prompt::answer_messages(&chunks, &history, text))
            .await?;

        session.record_exchange(text, answer.as_str());
        info!(session_id = %session_id, turns = session.len(), "exchange recorded");
        Ok(AgentReply::single(answer))
    }
}
