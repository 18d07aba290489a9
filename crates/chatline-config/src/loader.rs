// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./chatline.toml` > `~/.config/chatline/chatline.toml` >
//! `/etc/chatline/chatline.toml` with environment variable overrides via `CHATLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ChatlineConfig;

const SYSTEM_CONFIG_PATH: &str = "/etc/chatline/chatline.toml";
const LOCAL_CONFIG_PATH: &str = "chatline.toml";

/// Config sections addressable through `CHATLINE_<SECTION>_<KEY>`.
///
/// `event_log` must come before any section whose name it could be confused with.
const ENV_SECTIONS: &[&str] = &[
    "event_log",
    "agent",
    "server",
    "line",
    "openai",
    "corpus",
    "inventory",
    "push",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/chatline/chatline.toml` (system-wide)
/// 3. `~/.config/chatline/chatline.toml` (user XDG config)
/// 4. `./chatline.toml` (local directory)
/// 5. `CHATLINE_*` environment variables
///
/// Secrets left unset afterwards are filled from the conventional
/// `LINE_*` and `OPENAI_*` environment variables.
pub fn load_config() -> Result<ChatlineConfig, figment::Error> {
    let mut config: ChatlineConfig = build_figment().extract()?;
    fill_secret_fallbacks(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ChatlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
///
/// Used by `--config`; the XDG files are not consulted.
pub fn load_config_from_path(path: &Path) -> Result<ChatlineConfig, figment::Error> {
    let mut config: ChatlineConfig = Figment::new()
        .merge(Serialized::defaults(ChatlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()?;
    fill_secret_fallbacks(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ChatlineConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("chatline/chatline.toml"))
}

/// All candidate config file paths, lowest precedence first.
pub fn config_file_candidates() -> Vec<std::path::PathBuf> {
    let mut paths = vec![std::path::PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(user) = user_config_path() {
        paths.push(user);
    }
    paths.push(std::path::PathBuf::from(LOCAL_CONFIG_PATH));
    paths
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `CHATLINE_LINE_CHANNEL_SECRET` maps to `line.channel_secret` and
/// `CHATLINE_EVENT_LOG_PATH` maps to `event_log.path`.
fn env_provider() -> Env {
    Env::prefixed("CHATLINE_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config key.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// Fill unset secrets from the conventional environment variables.
///
/// `lookup` returns the value of an environment variable; empty values are ignored.
pub fn fill_secret_fallbacks(
    config: &mut ChatlineConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let env = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if config.line.channel_access_token.is_none() {
        config.line.channel_access_token = env("LINE_CHANNEL_ACCESS_TOKEN");
    }
    if config.line.channel_secret.is_none() {
        config.line.channel_secret = env("LINE_CHANNEL_SECRET");
    }
    if config.openai.api_key.is_none() {
        config.openai.api_key = env("OPENAI_API_KEY_LINE").or_else(|| env("OPENAI_API_KEY"));
        if config.openai.api_key.is_some() {
            tracing::debug!("openai api key resolved from environment");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("line_channel_secret"), "line.channel_secret");
        assert_eq!(map_env_key("event_log_path"), "event_log.path");
        assert_eq!(map_env_key("push_min_interval_secs"), "push.min_interval_secs");
        assert_eq!(map_env_key("openai_api_key"), "openai.api_key");
        assert_eq!(map_env_key("agent_reply_delay_max_ms"), "agent.reply_delay_max_ms");
        assert_eq!(map_env_key("unknown"), "unknown");
    }

    #[test]
    fn secret_fallbacks_fill_only_unset_values() {
        let mut config = ChatlineConfig::default();
        config.line.channel_secret = Some("from-config".into());

        fill_secret_fallbacks(&mut config, |name| match name {
            "LINE_CHANNEL_SECRET" => Some("from-env".into()),
            "LINE_CHANNEL_ACCESS_TOKEN" => Some("token".into()),
            "OPENAI_API_KEY" => Some("generic".into()),
            "OPENAI_API_KEY_LINE" => Some("line-specific".into()),
            _ => None,
        });

        assert_eq!(config.line.channel_secret.as_deref(), Some("from-config"));
        assert_eq!(config.line.channel_access_token.as_deref(), Some("token"));
        assert_eq!(config.openai.api_key.as_deref(), Some("line-specific"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = ChatlineConfig::default();
        fill_secret_fallbacks(&mut config, |name| match name {
            "OPENAI_API_KEY_LINE" => Some("  ".into()),
            "OPENAI_API_KEY" => Some("sk-generic".into()),
            _ => None,
        });
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-generic"));
        assert!(config.line.channel_secret.is_none());
    }
}
