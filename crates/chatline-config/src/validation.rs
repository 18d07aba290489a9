// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the semantic constraints serde cannot express: hour ranges, window
//! overlap, interval ordering, and mode-specific requirements.

use crate::diagnostic::ConfigError;
use crate::model::{ChatlineConfig, ResponderMode, WindowConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns every violation found rather than stopping at the first one.
pub fn validate_config(config: &ChatlineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_agent(config, &mut errors);
    validate_server(config, &mut errors);
    validate_openai(config, &mut errors);
    validate_corpus(config, &mut errors);
    validate_push(config, &mut errors);

    if config.event_log.path.trim().is_empty() {
        errors.push(ConfigError::validation("event_log.path must not be empty"));
    }

    if config.agent.mode == ResponderMode::Inventory && config.inventory.branch_id.trim().is_empty()
    {
        errors.push(ConfigError::validation(
            "inventory.branch_id must be set when agent.mode is `inventory`",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_agent(config: &ChatlineConfig, errors: &mut Vec<ConfigError>) {
    let agent = &config.agent;
    if agent.reply_delay_min_ms > agent.reply_delay_max_ms {
        errors.push(ConfigError::validation(format!(
            "agent.reply_delay_min_ms ({}) must not exceed agent.reply_delay_max_ms ({})",
            agent.reply_delay_min_ms, agent.reply_delay_max_ms
        )));
    }
    if agent.request_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "agent.request_timeout_secs must be at least 1",
        ));
    }
    if agent.apology_message.trim().is_empty() {
        errors.push(ConfigError::validation(
            "agent.apology_message must not be empty",
        ));
    }
}

fn validate_server(config: &ChatlineConfig, errors: &mut Vec<ConfigError>) {
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("server.host must not be empty"));
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        )));
    }

    if !config.server.webhook_path.starts_with('/') {
        errors.push(ConfigError::validation(format!(
            "server.webhook_path `{}` must start with `/`",
            config.server.webhook_path
        )));
    }
}

fn validate_openai(config: &ChatlineConfig, errors: &mut Vec<ConfigError>) {
    let temperature = config.openai.temperature;
    if !(0.0..=2.0).contains(&temperature) {
        errors.push(ConfigError::validation(format!(
            "openai.temperature must be between 0 and 2, got {temperature}"
        )));
    }
    if config.openai.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "openai.timeout_secs must be at least 1",
        ));
    }
}

fn validate_corpus(config: &ChatlineConfig, errors: &mut Vec<ConfigError>) {
    let corpus = &config.corpus;
    if corpus.chunk_size == 0 {
        errors.push(ConfigError::validation(
            "corpus.chunk_size must be greater than 0",
        ));
    } else if corpus.chunk_overlap >= corpus.chunk_size {
        errors.push(ConfigError::validation(format!(
            "corpus.chunk_overlap ({}) must be smaller than corpus.chunk_size ({})",
            corpus.chunk_overlap, corpus.chunk_size
        )));
    }
    if corpus.top_k == 0 {
        errors.push(ConfigError::validation("corpus.top_k must be greater than 0"));
    }
    if corpus.embed_batch_size == 0 {
        errors.push(ConfigError::validation(
            "corpus.embed_batch_size must be greater than 0",
        ));
    }
    if config.agent.mode == ResponderMode::Retrieval && corpus.path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "corpus.path must be set when agent.mode is `retrieval`",
        ));
    }
}

fn validate_push(config: &ChatlineConfig, errors: &mut Vec<ConfigError>) {
    let push = &config.push;

    check_window("push.morning_window", &push.morning_window, errors);
    check_window("push.night_window", &push.night_window, errors);
    if push.morning_window.overlaps(&push.night_window) {
        errors.push(ConfigError::validation(
            "push.morning_window and push.night_window must not overlap",
        ));
    }

    if push.min_interval_secs == 0 {
        errors.push(ConfigError::validation(
            "push.min_interval_secs must be at least 1",
        ));
    }
    if push.min_interval_secs > push.max_interval_secs {
        errors.push(ConfigError::validation(format!(
            "push.min_interval_secs ({}) must not exceed push.max_interval_secs ({})",
            push.min_interval_secs, push.max_interval_secs
        )));
    }

    if push.enabled {
        if push.morning_greetings.is_empty() {
            errors.push(ConfigError::validation(
                "push.morning_greetings must not be empty when push is enabled",
            ));
        }
        if push.night_greetings.is_empty() {
            errors.push(ConfigError::validation(
                "push.night_greetings must not be empty when push is enabled",
            ));
        }
    }

    if let Some(offset) = push.utc_offset_hours
        && !(-12..=14).contains(&offset)
    {
        errors.push(ConfigError::validation(format!(
            "push.utc_offset_hours must be between -12 and 14, got {offset}"
        )));
    }

    if push.demo_enabled && push.demo_interval_secs == 0 {
        errors.push(ConfigError::validation(
            "push.demo_interval_secs must be at least 1",
        ));
    }
}

fn check_window(name: &str, window: &WindowConfig, errors: &mut Vec<ConfigError>) {
    if window.start_hour >= 24 || window.end_hour > 24 {
        errors.push(ConfigError::validation(format!(
            "{name} hours must be within 0..=24, got {}..{}",
            window.start_hour, window.end_hour
        )));
    }
    if window.start_hour >= window.end_hour {
        errors.push(ConfigError::validation(format!(
            "{name}.start_hour ({}) must be before end_hour ({})",
            window.start_hour, window.end_hour
        )));
    }
}
