//! Transcription backend adapters

pub mod cloud;
pub mod poll;
pub mod whisper_asr;

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{ByteSource, StatusSink, TokenProvider, TranscribeError, Transcriber};
use crate::application::CancelHandle;
use crate::domain::config::{AppConfig, BackendKind};

pub use cloud::{CloudBackend, CloudBackendConfig};
pub use poll::{completion_statuses, poll_job, PollPlan, POLL_INTERVAL};
pub use whisper_asr::{WhisperAsrBackend, WhisperAsrConfig};

/// The configured transcription backend.
///
/// A tagged union rather than a name-keyed registry: adding a backend is
/// a compile error until every match below handles it.
pub enum Backend {
    WhisperAsr(WhisperAsrBackend),
    Cloud(CloudBackend),
}

#[async_trait]
impl Transcriber for Backend {
    async fn transcribe(
        &self,
        media: &dyn ByteSource,
        cancel: &CancelHandle,
    ) -> Result<String, TranscribeError> {
        match self {
            Self::WhisperAsr(backend) => backend.transcribe(media, cancel).await,
            Self::Cloud(backend) => backend.transcribe(media, cancel).await,
        }
    }
}

/// Build the backend selected by the configuration
pub fn build_backend(
    config: &AppConfig,
    auth: Arc<dyn TokenProvider>,
    status: Arc<dyn StatusSink>,
) -> Backend {
    match config.backend_or_default() {
        BackendKind::WhisperAsr => Backend::WhisperAsr(WhisperAsrBackend::new(WhisperAsrConfig {
            urls: config.asr_urls_or_default(),
            translate: config.translate_or_default(),
            language: config.language_or_default().to_string(),
            encode: config.encode_or_default(),
            vad_filter: config.vad_filter_or_default(),
            initial_prompt: config.initial_prompt.clone(),
            timestamps: config.timestamps_or_default(),
            timestamp_format: config.timestamp_format_or_default(),
            timestamp_interval: config.timestamp_interval_or_default(),
            word_timestamps: config.word_timestamps_or_default(),
        })),
        BackendKind::Cloud => {
            let cloud = config.cloud.clone().unwrap_or_default();
            let defaults = CloudBackendConfig::default();
            Backend::Cloud(CloudBackend::new(
                CloudBackendConfig {
                    api_url: cloud.api_url.unwrap_or(defaults.api_url),
                    upload_url: cloud.upload_url.unwrap_or(defaults.upload_url),
                    storage_url: cloud.storage_url.unwrap_or(defaults.storage_url),
                    dashboard_url: cloud.dashboard_url.unwrap_or(defaults.dashboard_url),
                    language: config.language_or_default().to_string(),
                    timestamps: config.timestamps_or_default(),
                    timestamp_format: config.timestamp_format_or_default(),
                    timestamp_interval: config.timestamp_interval_or_default(),
                    embed_summary: config.embed_summary_or_default(),
                    embed_outline: config.embed_outline_or_default(),
                    embed_keywords: config.embed_keywords_or_default(),
                    embed_transcript_link: config.embed_transcript_link_or_default(),
                    poll_attempts: config.poll_attempts_or_default(),
                    poll_interval: POLL_INTERVAL,
                },
                auth,
                status,
            ))
        }
    }
}
