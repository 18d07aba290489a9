// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the reply and push endpoints.

use std::time::Duration;

use chatline_core::ChatlineError;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The Messaging API rejects requests carrying more messages than this.
pub const MAX_MESSAGES_PER_REQUEST: usize = 5;

/// The Messaging API rejects text messages longer than this (in characters).
pub const MAX_TEXT_CHARS: usize = 5000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMessage {
    #[serde(rename = "type")]
    pub message_type: &'static str,
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            message_type: "text",
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [TextMessage],
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: &'a [TextMessage],
}

/// Error body returned by the Messaging API.
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    details: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    property: String,
}

/// Thin client over `/v2/bot/message/{reply,push}`.
#[derive(Debug, Clone)]
pub struct LineClient {
    client: reqwest::Client,
    base_url: String,
}

impl LineClient {
    pub fn new(
        channel_access_token: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ChatlineError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {channel_access_token}"))
            .map_err(|e| ChatlineError::Config(format!("invalid channel access token: {e}")))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ChatlineError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn reply(
        &self,
        reply_token: &str,
        messages: &[TextMessage],
    ) -> Result<(), ChatlineError> {
        let body = ReplyRequest {
            reply_token,
            messages,
        };
        self.post("/v2/bot/message/reply", &body).await
    }

    pub async fn push(&self, to: &str, messages: &[TextMessage]) -> Result<(), ChatlineError> {
        let body = PushRequest { to, messages };
        self.post("/v2/bot/message/push", &body).await
    }

    /// `GET /v2/bot/info`, used as a health probe.
    pub async fn bot_info(&self) -> Result<serde_json::Value, ChatlineError> {
        let response = self
            .client
            .get(format!("{}/v2/bot/info", self.base_url))
            .send()
            .await
            .map_err(request_failed)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &text));
        }
        response.json().await.map_err(request_failed)
    }

    async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<(), ChatlineError> {
        let response = self
            .client
            .post(format!("{}{endpoint}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        debug!(status = %status, endpoint, "messaging API response");
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(api_error(status, &text))
    }
}

/// Applies the per-request limits: drops empty texts, keeps at most
/// [`MAX_MESSAGES_PER_REQUEST`], and truncates each to [`MAX_TEXT_CHARS`].
pub fn prepare_messages(texts: &[String]) -> Vec<TextMessage> {
    let non_empty: Vec<&String> = texts.iter().filter(|t| !t.trim().is_empty()).collect();
    if non_empty.len() < texts.len() {
        debug!(dropped = texts.len() - non_empty.len(), "dropping empty messages");
    }
    if non_empty.len() > MAX_MESSAGES_PER_REQUEST {
        warn!(
            count = non_empty.len(),
            limit = MAX_MESSAGES_PER_REQUEST,
            "too many messages for one request, extra messages dropped"
        );
    }

    non_empty
        .into_iter()
        .take(MAX_MESSAGES_PER_REQUEST)
        .map(|text| {
            let chars = text.chars().count();
            if chars > MAX_TEXT_CHARS {
                warn!(chars, limit = MAX_TEXT_CHARS, "message text truncated");
                TextMessage::new(text.chars().take(MAX_TEXT_CHARS).collect::<String>())
            } else {
                TextMessage::new(text.as_str())
            }
        })
        .collect()
}

fn request_failed(e: reqwest::Error) -> ChatlineError {
    ChatlineError::Channel {
        message: format!("messaging API request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> ChatlineError {
    let message = match serde_json::from_str::<ApiError>(body) {
        Ok(err) if err.details.is_empty() => format!("messaging API {status}: {}", err.message),
        Ok(err) => {
            let details: Vec<String> = err
                .details
                .iter()
                .map(|d| format!("{}: {}", d.property, d.message))
                .collect();
            format!(
                "messaging API {status}: {} ({})",
                err.message,
                details.join("; ")
            )
        }
        Err(_) => format!("messaging API {status}: {body}"),
    };
    ChatlineError::Channel {
        message,
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> LineClient {
        LineClient::new("access-token", &server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn reply_posts_token_and_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .and(header("authorization", "Bearer access-token"))
            .and(body_json(serde_json::json!({
                "replyToken": "rt-1",
                "messages": [{"type": "text", "text": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .reply("rt-1", &[TextMessage::new("hello")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn push_posts_recipient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/push"))
            .and(body_json(serde_json::json!({
                "to": "U1",
                "messages": [{"type": "text", "text": "Good night!"}]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .push("U1", &[TextMessage::new("Good night!")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn api_error_details_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "Invalid reply token"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .reply("expired", &[TextMessage::new("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, ChatlineError::Channel { .. }));
        assert!(err.to_string().contains("Invalid reply token"), "got: {err}");
    }

    #[test]
    fn prepare_messages_caps_count() {
        let texts: Vec<String> = (0..7).map(|i| format!("m{i}")).collect();
        let prepared = prepare_messages(&texts);
        assert_eq!(prepared.len(), MAX_MESSAGES_PER_REQUEST);
        assert_eq!(prepared[4].text, "m4");
    }

    #[test]
    fn prepare_messages_truncates_on_char_boundary() {
        let long = "あ".repeat(MAX_TEXT_CHARS + 10);
        let prepared = prepare_messages(&[long]);
        assert_eq!(prepared[0].text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn prepare_messages_drops_empty_texts() {
        let prepared = prepare_messages(&["".into(), "ok".into(), "  ".into()]);
        assert_eq!(prepared, vec![TextMessage::new("ok")]);
    }
}
