// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Chatline webhook bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level Chatline configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatlineConfig {
    /// Responder behavior and reply pacing.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP listener for the webhook.
    #[serde(default)]
    pub server: ServerConfig,

    /// LINE Messaging API credentials and endpoint.
    #[serde(default)]
    pub line: LineConfig,

    /// Completion and embedding API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Reference corpus used in retrieval mode.
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Inventory assistant settings.
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Append-only event log.
    #[serde(default)]
    pub event_log: EventLogConfig,

    /// Proactive greeting scheduler.
    #[serde(default)]
    pub push: PushConfig,
}

/// Which responder answers incoming text messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponderMode {
    /// Persona prompt plus per-user history.
    #[default]
    Conversation,
    /// History-aware query reformulation and corpus retrieval.
    Retrieval,
    /// Intent classification followed by a database-admin style answer.
    Inventory,
}

impl fmt::Display for ResponderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResponderMode::Conversation => "conversation",
            ResponderMode::Retrieval => "retrieval",
            ResponderMode::Inventory => "inventory",
        };
        f.write_str(s)
    }
}

/// Responder behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Responder used for text messages.
    #[serde(default)]
    pub mode: ResponderMode,

    /// System persona prepended to every conversation-mode prompt.
    #[serde(default = "default_persona")]
    pub persona: String,

    /// Upper bound on a single completion call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Lower bound of the random pause before replying, in milliseconds.
    #[serde(default = "default_reply_delay_min_ms")]
    pub reply_delay_min_ms: u64,

    /// Upper bound of the random pause before replying, in milliseconds.
    #[serde(default = "default_reply_delay_max_ms")]
    pub reply_delay_max_ms: u64,

    /// Text sent to the user when the responder fails.
    #[serde(default = "default_apology_message")]
    pub apology_message: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            mode: ResponderMode::default(),
            persona: default_persona(),
            request_timeout_secs: default_request_timeout_secs(),
            reply_delay_min_ms: default_reply_delay_min_ms(),
            reply_delay_max_ms: default_reply_delay_max_ms(),
            apology_message: default_apology_message(),
        }
    }
}

fn default_agent_name() -> String {
    "chatline".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_persona() -> String {
    "You are a friendly assistant chatting with a user on LINE. Keep replies short and warm."
        .to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_reply_delay_min_ms() -> u64 {
    1000
}

fn default_reply_delay_max_ms() -> u64 {
    3000
}

fn default_apology_message() -> String {
    "Sorry, I couldn't come up with an answer just now. Please try again in a moment.".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the webhook listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on. `--port` overrides this.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Route that receives LINE webhook deliveries.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_path: default_webhook_path(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

/// LINE Messaging API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LineConfig {
    /// Channel access token. Falls back to `LINE_CHANNEL_ACCESS_TOKEN`.
    #[serde(default)]
    pub channel_access_token: Option<String>,

    /// Channel secret for webhook signatures. Falls back to `LINE_CHANNEL_SECRET`.
    #[serde(default)]
    pub channel_secret: Option<String>,

    /// Messaging API base URL.
    #[serde(default = "default_line_api_base_url")]
    pub api_base_url: String,

    /// HTTP timeout for reply and push calls, in seconds.
    #[serde(default = "default_line_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            channel_access_token: None,
            channel_secret: None,
            api_base_url: default_line_api_base_url(),
            timeout_secs: default_line_timeout_secs(),
        }
    }
}

impl fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineConfig")
            .field("channel_access_token", &redacted(&self.channel_access_token))
            .field("channel_secret", &redacted(&self.channel_secret))
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_line_api_base_url() -> String {
    "https://api.line.me".to_string()
}

fn default_line_timeout_secs() -> u64 {
    10
}

/// Completion and embedding API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. Falls back to `OPENAI_API_KEY_LINE`, then `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API, including the version segment.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Chat completion model.
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model used for the corpus index and queries.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,

    /// Optional cap on generated tokens.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// HTTP timeout per request, in seconds.
    #[serde(default = "default_openai_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts for 429 and 5xx responses.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: 0.0,
            max_tokens: None,
            timeout_secs: default_openai_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_openai_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    1
}

/// Reference corpus configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CorpusConfig {
    /// Plain-text document loaded at startup in retrieval mode.
    #[serde(default = "default_corpus_path")]
    pub path: String,

    /// Separator the document is split on before merging.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Maximum chunk length in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between adjacent chunks.
    #[serde(default)]
    pub chunk_overlap: usize,

    /// Number of chunks retrieved per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Chunks sent per embedding request while building the index.
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
            separator: default_separator(),
            chunk_size: default_chunk_size(),
            chunk_overlap: 0,
            top_k: default_top_k(),
            embed_batch_size: default_embed_batch_size(),
        }
    }
}

fn default_corpus_path() -> String {
    "data/corpus.txt".to_string()
}

fn default_separator() -> String {
    "\n\n".to_string()
}

fn default_chunk_size() -> usize {
    1000
}

fn default_top_k() -> usize {
    4
}

fn default_embed_batch_size() -> usize {
    64
}

/// Inventory assistant configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryConfig {
    /// Branch the database-admin prompt answers for. Required in inventory mode.
    #[serde(default)]
    pub branch_id: String,

    /// Send the classified intent label before the answer.
    #[serde(default = "default_echo_intent")]
    pub echo_intent: bool,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            branch_id: String::new(),
            echo_intent: default_echo_intent(),
        }
    }
}

fn default_echo_intent() -> bool {
    true
}

/// Event log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EventLogConfig {
    /// JSONL file that records are appended to.
    #[serde(default = "default_event_log_path")]
    pub path: String,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            path: default_event_log_path(),
        }
    }
}

fn default_event_log_path() -> String {
    "logs/event_logs.jsonl".to_string()
}

/// A half-open `[start_hour, end_hour)` range of wall-clock hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl WindowConfig {
    /// Returns true if the two windows share at least one hour.
    pub fn overlaps(&self, other: &WindowConfig) -> bool {
        self.start_hour < other.end_hour && other.start_hour < self.end_hour
    }
}

/// Proactive greeting scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PushConfig {
    /// Run the greeting scheduler.
    #[serde(default = "default_push_enabled")]
    pub enabled: bool,

    #[serde(default = "default_morning_window")]
    pub morning_window: WindowConfig,

    #[serde(default = "default_night_window")]
    pub night_window: WindowConfig,

    /// Lower bound of the random sleep between ticks, in seconds.
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: u64,

    /// Upper bound of the random sleep between ticks, in seconds.
    #[serde(default = "default_max_interval_secs")]
    pub max_interval_secs: u64,

    /// Candidate texts for the morning push.
    #[serde(default = "default_morning_greetings")]
    pub morning_greetings: Vec<String>,

    /// Candidate texts for the night push.
    #[serde(default = "default_night_greetings")]
    pub night_greetings: Vec<String>,

    /// Fixed UTC offset for the scheduler clock. Local time when unset.
    #[serde(default)]
    pub utc_offset_hours: Option<i32>,

    /// Run the fixed-interval demo push loop. Sends unsolicited messages.
    #[serde(default)]
    pub demo_enabled: bool,

    #[serde(default = "default_demo_interval_secs")]
    pub demo_interval_secs: u64,

    #[serde(default = "default_demo_message")]
    pub demo_message: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: default_push_enabled(),
            morning_window: default_morning_window(),
            night_window: default_night_window(),
            min_interval_secs: default_min_interval_secs(),
            max_interval_secs: default_max_interval_secs(),
            morning_greetings: default_morning_greetings(),
            night_greetings: default_night_greetings(),
            utc_offset_hours: None,
            demo_enabled: false,
            demo_interval_secs: default_demo_interval_secs(),
            demo_message: default_demo_message(),
        }
    }
}

fn default_push_enabled() -> bool {
    true
}

fn default_morning_window() -> WindowConfig {
    WindowConfig {
        start_hour: 7,
        end_hour: 10,
    }
}

fn default_night_window() -> WindowConfig {
    WindowConfig {
        start_hour: 22,
        end_hour: 23,
    }
}

fn default_min_interval_secs() -> u64 {
    30 * 60
}

fn default_max_interval_secs() -> u64 {
    120 * 60
}

fn default_morning_greetings() -> Vec<String> {
    [
        "Good morning! Did you sleep well?",
        "Morning! Wishing you a great start to the day.",
        "Rise and shine! What are you up to today?",
        "Good morning! Don't forget to have some breakfast.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_night_greetings() -> Vec<String> {
    [
        "Good night! Sleep well.",
        "It's getting late. Time to rest, sweet dreams!",
        "Good night! Talk to you tomorrow.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_demo_interval_secs() -> u64 {
    5
}

fn default_demo_message() -> String {
    "This is a scheduled test message.".to_string()
}

fn redacted(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}
