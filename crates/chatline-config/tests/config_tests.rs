// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Chatline configuration system.

use chatline_config::diagnostic::ConfigError;
use chatline_config::model::{ChatlineConfig, ResponderMode};
use chatline_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[agent]
name = "shop-bot"
mode = "inventory"
persona = "You are a shop clerk."
reply_delay_min_ms = 0
reply_delay_max_ms = 10

[server]
host = "0.0.0.0"
port = 8080
webhook_path = "/callback"

[line]
channel_access_token = "tok"
channel_secret = "sec"

[openai]
api_key = "sk-test"
model = "gpt-4o-mini"
temperature = 0.3
max_tokens = 256

[corpus]
path = "data/animals.txt"
top_k = 2

[inventory]
branch_id = "BKK-01"
echo_intent = false

[event_log]
path = "/tmp/events.jsonl"

[push]
enabled = false
utc_offset_hours = 7
morning_greetings = ["hi"]
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "shop-bot");
    assert_eq!(config.agent.mode, ResponderMode::Inventory);
    assert_eq!(config.agent.reply_delay_max_ms, 10);
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.webhook_path, "/callback");
    assert_eq!(config.line.channel_secret.as_deref(), Some("sec"));
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert_eq!(config.openai.max_tokens, Some(256));
    assert_eq!(config.corpus.top_k, 2);
    assert_eq!(config.corpus.chunk_size, 1000);
    assert_eq!(config.inventory.branch_id, "BKK-01");
    assert!(!config.inventory.echo_intent);
    assert_eq!(config.event_log.path, "/tmp/events.jsonl");
    assert!(!config.push.enabled);
    assert_eq!(config.push.utc_offset_hours, Some(7));
    assert_eq!(config.push.morning_greetings, vec!["hi"]);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "chatline");
    assert_eq!(config.agent.mode, ResponderMode::Conversation);
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.webhook_path, "/webhook");
    assert!(config.line.channel_secret.is_none());
    assert_eq!(config.openai.model, "gpt-3.5-turbo");
    assert_eq!(config.openai.temperature, 0.0);
    assert_eq!(config.corpus.path, "data/corpus.txt");
    assert_eq!(config.corpus.chunk_size, 1000);
    assert_eq!(config.corpus.chunk_overlap, 0);
    assert_eq!(config.corpus.top_k, 4);
    assert_eq!(config.event_log.path, "logs/event_logs.jsonl");
    assert_eq!(config.push.morning_window.start_hour, 7);
    assert_eq!(config.push.morning_window.end_hour, 10);
    assert_eq!(config.push.night_window.start_hour, 22);
    assert_eq!(config.push.night_window.end_hour, 23);
    assert_eq!(config.push.min_interval_secs, 1800);
    assert_eq!(config.push.max_interval_secs, 7200);
    assert!(!config.push.demo_enabled);
    assert_eq!(config.push.demo_interval_secs, 5);
}

#[test]
fn unknown_field_is_rejected() {
    let err = load_config_from_str("[line]\nchanel_secret = \"x\"\n")
        .expect_err("should reject unknown field");
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("chanel_secret"),
        "error should mention unknown field, got: {err_str}"
    );
}

#[test]
fn unknown_top_level_section_is_rejected() {
    assert!(load_config_from_str("[logging]\nlevel = \"debug\"\n").is_err());
}

#[test]
fn unknown_key_diagnostic_carries_suggestion() {
    let errors = load_and_validate_str("[agent]\npersna = \"x\"\n").expect_err("should fail");

    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. }
            if key == "persna"
                && suggestion.as_deref() == Some("persona")
                && valid_keys.contains("apology_message"))
    });
    assert!(found, "expected UnknownKey for `persna`, got: {errors:?}");
}

#[test]
fn invalid_type_produces_diagnostic() {
    let errors = load_and_validate_str("[server]\nport = \"eighty\"\n").expect_err("should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got: {errors:?}"
    );
}

#[test]
fn validation_errors_are_collected() {
    let toml = r#"
[openai]
temperature = 3.0

[push.night_window]
start_hour = 8
end_hour = 9
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.len() >= 2, "got: {errors:?}");
}

#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "persna".to_string(),
        suggestion: Some("persona".to_string()),
        valid_keys: "name, persona".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    let help = error.help().expect("help text").to_string();
    assert!(help.contains("did you mean `persona`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render");
    assert!(buf.contains("persna"));
}

#[test]
fn env_vars_override_file_and_fill_secrets() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[server]
port = 4000

[event_log]
path = "from-file.jsonl"
"#,
        )?;
        jail.set_env("CHATLINE_SERVER_PORT", "5000");
        jail.set_env("CHATLINE_EVENT_LOG_PATH", "from-env.jsonl");
        jail.set_env("LINE_CHANNEL_SECRET", "env-secret");
        jail.set_env("OPENAI_API_KEY_LINE", "sk-line");

        let config = load_and_validate_path(std::path::Path::new("custom.toml"))
            .map_err(|e| format!("{e:?}"))?;
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.event_log.path, "from-env.jsonl");
        assert_eq!(config.line.channel_secret.as_deref(), Some("env-secret"));
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-line"));
        Ok(())
    });
}

#[test]
fn prefixed_secret_wins_over_conventional_env() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("chatline.toml", "")?;
        jail.set_env("CHATLINE_LINE_CHANNEL_SECRET", "prefixed");
        jail.set_env("LINE_CHANNEL_SECRET", "conventional");

        let config = load_and_validate_path(std::path::Path::new("chatline.toml"))
            .map_err(|e| format!("{e:?}"))?;
        assert_eq!(config.line.channel_secret.as_deref(), Some("prefixed"));
        Ok(())
    });
}

#[test]
fn serialized_defaults_round_trip_through_figment() {
    use figment::{Figment, providers::Serialized};

    let config: ChatlineConfig = Figment::new()
        .merge(Serialized::defaults(ChatlineConfig::default()))
        .merge(("agent.request_timeout_secs", 5))
        .extract()
        .expect("defaults should extract");
    assert_eq!(config.agent.request_timeout_secs, 5);
    assert_eq!(config.push.night_greetings.len(), 3);
}
