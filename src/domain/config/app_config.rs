//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::config::BackendKind;
use crate::domain::transcript::TimestampFormat;

/// Default status-poll attempt bound (~5 minutes at the 3s interval)
pub const DEFAULT_POLL_ATTEMPTS: u32 = 100;

/// Cloud-service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudConfig {
    pub api_url: Option<String>,
    pub upload_url: Option<String>,
    pub storage_url: Option<String>,
    pub dashboard_url: Option<String>,
    pub access_token: Option<String>,
    pub account_id: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: Option<String>,
    pub asr_urls: Option<Vec<String>>,
    pub language: Option<String>,
    pub translate: Option<bool>,
    pub encode: Option<bool>,
    pub vad_filter: Option<bool>,
    pub initial_prompt: Option<String>,
    pub timestamps: Option<bool>,
    pub timestamp_format: Option<String>,
    pub timestamp_interval: Option<u32>,
    pub word_timestamps: Option<bool>,
    pub embed_summary: Option<bool>,
    pub embed_outline: Option<bool>,
    pub embed_keywords: Option<bool>,
    pub embed_transcript_link: Option<bool>,
    pub poll_attempts: Option<u32>,
    pub debug: Option<bool>,
    pub cloud: Option<CloudConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            backend: Some("whisper-asr".to_string()),
            asr_urls: Some(vec!["http://localhost:9000".to_string()]),
            language: Some("auto".to_string()),
            translate: Some(false),
            encode: Some(true),
            vad_filter: Some(false),
            initial_prompt: None,
            timestamps: Some(false),
            timestamp_format: Some("auto".to_string()),
            timestamp_interval: Some(0),
            word_timestamps: Some(false),
            embed_summary: Some(true),
            embed_outline: Some(true),
            embed_keywords: Some(true),
            embed_transcript_link: Some(true),
            poll_attempts: Some(DEFAULT_POLL_ATTEMPTS),
            debug: Some(false),
            cloud: Some(CloudConfig {
                api_url: Some("https://api.swiftink.io/v1".to_string()),
                upload_url: Some("https://upload.swiftink.io/files/".to_string()),
                storage_url: Some("https://storage.swiftink.io".to_string()),
                dashboard_url: Some("https://swiftink.io/dashboard".to_string()),
                access_token: None,
                account_id: None,
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            backend: other.backend.or(self.backend),
            asr_urls: other.asr_urls.or(self.asr_urls),
            language: other.language.or(self.language),
            translate: other.translate.or(self.translate),
            encode: other.encode.or(self.encode),
            vad_filter: other.vad_filter.or(self.vad_filter),
            initial_prompt: other.initial_prompt.or(self.initial_prompt),
            timestamps: other.timestamps.or(self.timestamps),
            timestamp_format: other.timestamp_format.or(self.timestamp_format),
            timestamp_interval: other.timestamp_interval.or(self.timestamp_interval),
            word_timestamps: other.word_timestamps.or(self.word_timestamps),
            embed_summary: other.embed_summary.or(self.embed_summary),
            embed_outline: other.embed_outline.or(self.embed_outline),
            embed_keywords: other.embed_keywords.or(self.embed_keywords),
            embed_transcript_link: other.embed_transcript_link.or(self.embed_transcript_link),
            poll_attempts: other.poll_attempts.or(self.poll_attempts),
            debug: other.debug.or(self.debug),
            cloud: Self::merge_cloud_config(self.cloud, other.cloud),
        }
    }

    /// Merge cloud config sections
    fn merge_cloud_config(
        base: Option<CloudConfig>,
        other: Option<CloudConfig>,
    ) -> Option<CloudConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(CloudConfig {
                api_url: o.api_url.or(b.api_url),
                upload_url: o.upload_url.or(b.upload_url),
                storage_url: o.storage_url.or(b.storage_url),
                dashboard_url: o.dashboard_url.or(b.dashboard_url),
                access_token: o.access_token.or(b.access_token),
                account_id: o.account_id.or(b.account_id),
            }),
        }
    }

    /// Get backend as parsed BackendKind, or default if not set/invalid
    pub fn backend_or_default(&self) -> BackendKind {
        self.backend
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get the ordered ASR server failover list
    pub fn asr_urls_or_default(&self) -> Vec<String> {
        self.asr_urls.clone().unwrap_or_default()
    }

    /// Get language hint, or "auto" if not set
    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or("auto")
    }

    pub fn translate_or_default(&self) -> bool {
        self.translate.unwrap_or(false)
    }

    pub fn encode_or_default(&self) -> bool {
        self.encode.unwrap_or(true)
    }

    pub fn vad_filter_or_default(&self) -> bool {
        self.vad_filter.unwrap_or(false)
    }

    pub fn timestamps_or_default(&self) -> bool {
        self.timestamps.unwrap_or(false)
    }

    /// Get timestamp format as parsed TimestampFormat, or auto if not set/invalid
    pub fn timestamp_format_or_default(&self) -> TimestampFormat {
        self.timestamp_format
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Bucket width in seconds; 0 renders one line per segment
    pub fn timestamp_interval_or_default(&self) -> u32 {
        self.timestamp_interval.unwrap_or(0)
    }

    pub fn word_timestamps_or_default(&self) -> bool {
        self.word_timestamps.unwrap_or(false)
    }

    pub fn embed_summary_or_default(&self) -> bool {
        self.embed_summary.unwrap_or(true)
    }

    pub fn embed_outline_or_default(&self) -> bool {
        self.embed_outline.unwrap_or(true)
    }

    pub fn embed_keywords_or_default(&self) -> bool {
        self.embed_keywords.unwrap_or(true)
    }

    pub fn embed_transcript_link_or_default(&self) -> bool {
        self.embed_transcript_link.unwrap_or(true)
    }

    pub fn poll_attempts_or_default(&self) -> u32 {
        self.poll_attempts.unwrap_or(DEFAULT_POLL_ATTEMPTS)
    }

    pub fn debug_or_default(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    /// Whether any cloud enrichment (summary/outline/keywords) is requested
    pub fn wants_enrichment(&self) -> bool {
        self.embed_summary_or_default()
            || self.embed_outline_or_default()
            || self.embed_keywords_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.backend_or_default(), BackendKind::WhisperAsr);
        assert_eq!(
            config.asr_urls_or_default(),
            vec!["http://localhost:9000".to_string()]
        );
        assert_eq!(config.language_or_default(), "auto");
        assert!(!config.translate_or_default());
        assert!(config.encode_or_default());
        assert!(!config.vad_filter_or_default());
        assert!(!config.timestamps_or_default());
        assert_eq!(config.timestamp_format_or_default(), TimestampFormat::Auto);
        assert_eq!(config.timestamp_interval_or_default(), 0);
        assert!(config.embed_summary_or_default());
        assert_eq!(config.poll_attempts_or_default(), DEFAULT_POLL_ATTEMPTS);
        assert!(!config.debug_or_default());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.backend.is_none());
        assert!(config.asr_urls.is_none());
        assert!(config.language.is_none());
        assert!(config.cloud.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            backend: Some("whisper-asr".to_string()),
            language: Some("en".to_string()),
            timestamps: Some(false),
            ..Default::default()
        };

        let other = AppConfig {
            backend: Some("cloud".to_string()),
            language: None, // Should not override
            timestamps: Some(true),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.backend, Some("cloud".to_string()));
        assert_eq!(merged.language, Some("en".to_string())); // Kept from base
        assert_eq!(merged.timestamps, Some(true));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            asr_urls: Some(vec!["http://a:9000".to_string()]),
            translate: Some(true),
            ..Default::default()
        };

        let merged = base.merge(AppConfig::empty());

        assert_eq!(merged.asr_urls, Some(vec!["http://a:9000".to_string()]));
        assert_eq!(merged.translate, Some(true));
    }

    #[test]
    fn merge_cloud_config_field_by_field() {
        let base = AppConfig {
            cloud: Some(CloudConfig {
                api_url: Some("https://api.example.com".to_string()),
                access_token: Some("base-token".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let other = AppConfig {
            cloud: Some(CloudConfig {
                access_token: Some("other-token".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        let cloud = merged.cloud.unwrap();
        assert_eq!(cloud.api_url, Some("https://api.example.com".to_string()));
        assert_eq!(cloud.access_token, Some("other-token".to_string()));
    }

    #[test]
    fn backend_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            backend: Some("bogus".to_string()),
            ..Default::default()
        };
        assert_eq!(config.backend_or_default(), BackendKind::WhisperAsr);
    }

    #[test]
    fn timestamp_format_parses() {
        let config = AppConfig {
            timestamp_format: Some("HH:mm:ss".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.timestamp_format_or_default(),
            TimestampFormat::HoursMinutesSeconds
        );
    }

    #[test]
    fn wants_enrichment_when_any_embed_set() {
        let none = AppConfig {
            embed_summary: Some(false),
            embed_outline: Some(false),
            embed_keywords: Some(false),
            ..Default::default()
        };
        assert!(!none.wants_enrichment());

        let one = AppConfig {
            embed_summary: Some(false),
            embed_outline: Some(true),
            embed_keywords: Some(false),
            ..Default::default()
        };
        assert!(one.wants_enrichment());
    }
}
