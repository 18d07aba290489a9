// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible provider adapter for Chatline.
//!
//! [`OpenAiProvider`] implements both [`ProviderAdapter`] (chat completions)
//! and [`EmbeddingAdapter`] (embeddings) over a single HTTP client.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use chatline_config::model::OpenAiConfig;
use chatline_core::error::ChatlineError;
use chatline_core::traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter};
use chatline_core::types::{
    AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus, ProviderRequest,
    ProviderResponse, TokenUsage,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatCompletionRequest, ChatMessage, EmbeddingRequest};

/// Chat completion and embedding provider for OpenAI-compatible APIs.
pub struct OpenAiProvider {
    client: OpenAiClient,
    embedding_model: String,
}

impl OpenAiProvider {
    /// Creates a provider from configuration.
    ///
    /// Fails with [`ChatlineError::Config`] when no API key is configured.
    /// The config loader has already applied the `OPENAI_API_KEY_LINE` and
    /// `OPENAI_API_KEY` fallbacks at this point.
    pub fn new(config: &OpenAiConfig) -> Result<Self, ChatlineError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(
            &api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )?;

        info!(
            model = config.model,
            embedding_model = config.embedding_model,
            base_url = client.base_url(),
            "OpenAI provider initialized"
        );

        Ok(Self::with_client(client, config.embedding_model.clone()))
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: OpenAiClient, embedding_model: String) -> Self {
        Self {
            client,
            embedding_model,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, ChatlineError> {
        // No probe call: it would spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ChatlineError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ChatlineError> {
        let api_request = to_completion_request(request);
        let response = self.client.chat_completion(&api_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatlineError::Provider {
                message: "completion response contained no choices".into(),
                source: None,
            })?;
        let usage = response.usage.unwrap_or_default();

        Ok(ProviderResponse {
            id: response.id,
            content: choice.message.content.unwrap_or_default(),
            model: response.model,
            finish_reason: choice.finish_reason,
            usage: TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            },
        })
    }
}

#[async_trait]
impl EmbeddingAdapter for OpenAiProvider {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, ChatlineError> {
        let expected = input.texts.len();
        if expected == 0 {
            return Ok(EmbeddingOutput {
                embeddings: Vec::new(),
            });
        }

        let response = self
            .client
            .create_embeddings(&EmbeddingRequest {
                model: self.embedding_model.clone(),
                input: input.texts,
            })
            .await?;

        let mut data = response.data;
        if data.len() != expected {
            return Err(ChatlineError::Provider {
                message: format!(
                    "embedding response has {} vectors for {expected} inputs",
                    data.len()
                ),
                source: None,
            });
        }
        data.sort_by_key(|d| d.index);

        Ok(EmbeddingOutput {
            embeddings: data.into_iter().map(|d| d.embedding).collect(),
        })
    }
}

fn to_completion_request(request: ProviderRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: request.model,
        messages: request
            .messages
            .into_iter()
            .map(|m| ChatMessage {
                role: m.role.to_string(),
                content: Some(m.content),
            })
            .collect(),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

fn resolve_api_key(config_key: &Option<String>) -> Result<String, ChatlineError> {
    match config_key {
        Some(key) if !key.trim().is_empty() => Ok(key.clone()),
        _ => Err(ChatlineError::Config(
            "OpenAI API key not found. Set openai.api_key in config or the OPENAI_API_KEY_LINE / OPENAI_API_KEY environment variable.".into(),
        )),
    }
}
