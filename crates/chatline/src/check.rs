// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chatline check`: configuration summary.

use std::fmt::Write;

use chatline_config::{ChatlineConfig, ResponderMode};

fn set_or_missing(value: &Option<String>) -> &'static str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => "set",
        _ => "MISSING",
    }
}

/// Human-readable summary of the effective configuration. Secrets are only
/// reported as set or missing.
pub fn summary(config: &ChatlineConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "chatline: configuration OK");
    let _ = writeln!(out, "  agent       {} (mode: {})", config.agent.name, config.agent.mode);
    let _ = writeln!(
        out,
        "  webhook     http://{}:{}{}",
        config.server.host, config.server.port, config.server.webhook_path
    );
    let _ = writeln!(
        out,
        "  line        access token {}, channel secret {}",
        set_or_missing(&config.line.channel_access_token),
        set_or_missing(&config.line.channel_secret)
    );
    let _ = writeln!(
        out,
        "  openai      {} at {}, api key {}",
        config.openai.model,
        config.openai.base_url,
        set_or_missing(&config.openai.api_key)
    );
    match config.agent.mode {
        ResponderMode::Retrieval => {
            let _ = writeln!(
                out,
                "  corpus      {} (chunk {} chars, top {})",
                config.corpus.path, config.corpus.chunk_size, config.corpus.top_k
            );
        }
        ResponderMode::Inventory => {
            let _ = writeln!(out, "  inventory   branch {}", config.inventory.branch_id);
        }
        ResponderMode::Conversation => {}
    }
    let _ = writeln!(out, "  event log   {}", config.event_log.path);
    if config.push.enabled {
        let _ = writeln!(
            out,
            "  push        morning {:02}-{:02}h, night {:02}-{:02}h, every {}-{}s",
            config.push.morning_window.start_hour,
            config.push.morning_window.end_hour,
            config.push.night_window.start_hour,
            config.push.night_window.end_hour,
            config.push.min_interval_secs,
            config.push.max_interval_secs
        );
    } else {
        let _ = writeln!(out, "  push        disabled");
    }
    if config.push.demo_enabled {
        let _ = writeln!(
            out,
            "  demo push   every {}s (sends unsolicited messages)",
            config.push.demo_interval_secs
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_hides_secrets() {
        let config = chatline_config::load_and_validate_str(
            r#"
            [line]
            channel_access_token = "tok-123"
            channel_secret = "sec-456"
            "#,
        )
        .unwrap();
        let out = summary(&config);
        assert!(out.contains("access token set"));
        assert!(!out.contains("tok-123"));
        assert!(!out.contains("sec-456"));
        assert!(out.contains("http://127.0.0.1:3000/webhook"));
        assert!(out.contains("morning 07-10h"));
    }

    #[test]
    fn summary_shows_mode_specific_settings() {
        let config = chatline_config::load_and_validate_str(
            r#"
            [agent]
            mode = "inventory"

            [inventory]
            branch_id = "BR-7"
            "#,
        )
        .unwrap();
        let out = summary(&config);
        assert!(out.contains("mode: inventory"));
        assert!(out.contains("branch BR-7"));
    }
}
