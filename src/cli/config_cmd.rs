//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{BackendKind, CloudConfig};
use crate::domain::error::ConfigError;
use crate::domain::transcript::TimestampFormat;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    // Validate value based on key type
    validate_config_value(key, value)?;

    // Load existing config
    let mut config = store.load().await?;

    // Update the appropriate field
    match key {
        "backend" => config.backend = Some(value.to_string()),
        "asr_urls" => config.asr_urls = Some(parse_url_list(value)),
        "language" => config.language = Some(value.to_string()),
        "translate" => config.translate = Some(parse_bool_validated(key, value)?),
        "encode" => config.encode = Some(parse_bool_validated(key, value)?),
        "vad_filter" => config.vad_filter = Some(parse_bool_validated(key, value)?),
        "initial_prompt" => config.initial_prompt = Some(value.to_string()),
        "timestamps" => config.timestamps = Some(parse_bool_validated(key, value)?),
        "timestamp_format" => config.timestamp_format = Some(value.to_string()),
        "timestamp_interval" => {
            config.timestamp_interval = Some(parse_u32_validated(key, value)?)
        }
        "word_timestamps" => config.word_timestamps = Some(parse_bool_validated(key, value)?),
        "embed_summary" => config.embed_summary = Some(parse_bool_validated(key, value)?),
        "embed_outline" => config.embed_outline = Some(parse_bool_validated(key, value)?),
        "embed_keywords" => config.embed_keywords = Some(parse_bool_validated(key, value)?),
        "embed_transcript_link" => {
            config.embed_transcript_link = Some(parse_bool_validated(key, value)?)
        }
        "poll_attempts" => config.poll_attempts = Some(parse_u32_validated(key, value)?),
        "debug" => config.debug = Some(parse_bool_validated(key, value)?),
        _ if key.starts_with("cloud.") => {
            let cloud = config.cloud.get_or_insert_with(CloudConfig::default);
            match key {
                "cloud.api_url" => cloud.api_url = Some(value.to_string()),
                "cloud.upload_url" => cloud.upload_url = Some(value.to_string()),
                "cloud.storage_url" => cloud.storage_url = Some(value.to_string()),
                "cloud.dashboard_url" => cloud.dashboard_url = Some(value.to_string()),
                "cloud.access_token" => cloud.access_token = Some(value.to_string()),
                "cloud.account_id" => cloud.account_id = Some(value.to_string()),
                _ => unreachable!(), // Already validated
            }
        }
        _ => unreachable!(), // Already validated
    }

    // Save config
    store.save(&config).await?;
    let shown = if key == "cloud.access_token" {
        mask_token(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;
    let cloud = config.cloud.clone().unwrap_or_default();

    let value = match key {
        "backend" => config.backend,
        "asr_urls" => config.asr_urls.map(|urls| urls.join(",")),
        "language" => config.language,
        "translate" => config.translate.map(|b| b.to_string()),
        "encode" => config.encode.map(|b| b.to_string()),
        "vad_filter" => config.vad_filter.map(|b| b.to_string()),
        "initial_prompt" => config.initial_prompt,
        "timestamps" => config.timestamps.map(|b| b.to_string()),
        "timestamp_format" => config.timestamp_format,
        "timestamp_interval" => config.timestamp_interval.map(|n| n.to_string()),
        "word_timestamps" => config.word_timestamps.map(|b| b.to_string()),
        "embed_summary" => config.embed_summary.map(|b| b.to_string()),
        "embed_outline" => config.embed_outline.map(|b| b.to_string()),
        "embed_keywords" => config.embed_keywords.map(|b| b.to_string()),
        "embed_transcript_link" => config.embed_transcript_link.map(|b| b.to_string()),
        "poll_attempts" => config.poll_attempts.map(|n| n.to_string()),
        "debug" => config.debug.map(|b| b.to_string()),
        "cloud.api_url" => cloud.api_url,
        "cloud.upload_url" => cloud.upload_url,
        "cloud.storage_url" => cloud.storage_url,
        "cloud.dashboard_url" => cloud.dashboard_url,
        "cloud.access_token" => cloud.access_token.map(|t| mask_token(&t)),
        "cloud.account_id" => cloud.account_id,
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    let cloud = config.cloud.clone().unwrap_or_default();

    let not_set = || "(not set)".to_string();

    presenter.key_value("backend", config.backend.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "asr_urls",
        &config
            .asr_urls
            .map(|urls| urls.join(","))
            .unwrap_or_else(not_set),
    );
    presenter.key_value("language", config.language.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "translate",
        &config.translate.map(|b| b.to_string()).unwrap_or_else(not_set),
    );
    presenter.key_value(
        "encode",
        &config.encode.map(|b| b.to_string()).unwrap_or_else(not_set),
    );
    presenter.key_value(
        "vad_filter",
        &config.vad_filter.map(|b| b.to_string()).unwrap_or_else(not_set),
    );
    presenter.key_value(
        "initial_prompt",
        config.initial_prompt.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "timestamps",
        &config.timestamps.map(|b| b.to_string()).unwrap_or_else(not_set),
    );
    presenter.key_value(
        "timestamp_format",
        config.timestamp_format.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "timestamp_interval",
        &config
            .timestamp_interval
            .map(|n| n.to_string())
            .unwrap_or_else(not_set),
    );
    presenter.key_value(
        "word_timestamps",
        &config
            .word_timestamps
            .map(|b| b.to_string())
            .unwrap_or_else(not_set),
    );
    presenter.key_value(
        "embed_summary",
        &config
            .embed_summary
            .map(|b| b.to_string())
            .unwrap_or_else(not_set),
    );
    presenter.key_value(
        "embed_outline",
        &config
            .embed_outline
            .map(|b| b.to_string())
            .unwrap_or_else(not_set),
    );
    presenter.key_value(
        "embed_keywords",
        &config
            .embed_keywords
            .map(|b| b.to_string())
            .unwrap_or_else(not_set),
    );
    presenter.key_value(
        "embed_transcript_link",
        &config
            .embed_transcript_link
            .map(|b| b.to_string())
            .unwrap_or_else(not_set),
    );
    presenter.key_value(
        "poll_attempts",
        &config
            .poll_attempts
            .map(|n| n.to_string())
            .unwrap_or_else(not_set),
    );
    presenter.key_value(
        "debug",
        &config.debug.map(|b| b.to_string()).unwrap_or_else(not_set),
    );
    presenter.key_value("cloud.api_url", cloud.api_url.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "cloud.upload_url",
        cloud.upload_url.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "cloud.storage_url",
        cloud.storage_url.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "cloud.dashboard_url",
        cloud.dashboard_url.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "cloud.access_token",
        &cloud
            .access_token
            .map(|t| mask_token(&t))
            .unwrap_or_else(not_set),
    );
    presenter.key_value(
        "cloud.account_id",
        cloud.account_id.as_deref().unwrap_or("(not set)"),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "backend" => {
            value
                .parse::<BackendKind>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "timestamp_format" => {
            value
                .parse::<TimestampFormat>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "translate" | "encode" | "vad_filter" | "timestamps" | "word_timestamps"
        | "embed_summary" | "embed_outline" | "embed_keywords" | "embed_transcript_link"
        | "debug" => {
            parse_bool(value).map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?;
        }
        "timestamp_interval" | "poll_attempts" => {
            value
                .parse::<u32>()
                .map_err(|_| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be a non-negative integer".to_string(),
                })?;
        }
        "asr_urls" => {
            if parse_url_list(value).is_empty() {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be a comma-separated list of URLs".to_string(),
                });
            }
        }
        _ => {} // Free-form string keys
    }
    Ok(())
}

/// Parse a comma-separated URL list
fn parse_url_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

fn parse_bool_validated(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    })
}

fn parse_u32_validated(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be a non-negative integer".to_string(),
    })
}

/// Mask a token for display (show first 4 and last 4 chars)
fn mask_token(token: &str) -> String {
    if token.len() <= 8 {
        "*".repeat(token.len())
    } else {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn mask_token_long() {
        let masked = mask_token("abcdefghijklmnop");
        assert_eq!(masked, "abcd...mnop");
    }

    #[test]
    fn mask_token_short() {
        let masked = mask_token("short");
        assert_eq!(masked, "*****");
    }

    #[test]
    fn validate_backend_valid() {
        assert!(validate_config_value("backend", "whisper-asr").is_ok());
        assert!(validate_config_value("backend", "cloud").is_ok());
    }

    #[test]
    fn validate_backend_invalid() {
        assert!(validate_config_value("backend", "local").is_err());
    }

    #[test]
    fn validate_timestamp_format() {
        assert!(validate_config_value("timestamp_format", "HH:mm:ss").is_ok());
        assert!(validate_config_value("timestamp_format", "auto").is_ok());
        assert!(validate_config_value("timestamp_format", "H:m").is_err());
    }

    #[test]
    fn validate_intervals() {
        assert!(validate_config_value("timestamp_interval", "30").is_ok());
        assert!(validate_config_value("timestamp_interval", "-1").is_err());
        assert!(validate_config_value("poll_attempts", "200").is_ok());
        assert!(validate_config_value("poll_attempts", "many").is_err());
    }

    #[test]
    fn parse_url_list_splits_and_trims() {
        assert_eq!(
            parse_url_list("http://a:9000, http://b:9000 ,"),
            vec!["http://a:9000".to_string(), "http://b:9000".to_string()]
        );
        assert!(parse_url_list(" , ").is_empty());
    }
}
