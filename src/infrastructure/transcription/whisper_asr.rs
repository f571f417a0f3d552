//! Self-hosted Whisper ASR backend adapter
//!
//! One synchronous POST per candidate server URL, tried in order; the
//! first success wins. The multipart body is framed manually by the
//! codec in `infrastructure::http::multipart`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ports::{ByteSource, TranscribeError, Transcriber};
use crate::application::CancelHandle;
use crate::domain::transcript::{
    flatten_to_words, format_transcript, normalize_segments, TimestampFormat,
};
use crate::infrastructure::http::{BoundaryToken, MultipartForm};

/// Configuration record for the self-hosted backend
#[derive(Debug, Clone)]
pub struct WhisperAsrConfig {
    /// Candidate server base URLs, tried in order
    pub urls: Vec<String>,
    /// Request translation to English instead of transcription
    pub translate: bool,
    /// Language hint; "auto" lets the server detect
    pub language: String,
    /// Ask the server to re-encode the audio first
    pub encode: bool,
    /// Apply voice-activity filtering
    pub vad_filter: bool,
    /// Optional priming prompt
    pub initial_prompt: Option<String>,
    /// Render timestamps instead of flat text
    pub timestamps: bool,
    pub timestamp_format: TimestampFormat,
    /// Bucket width in seconds; 0 = one line per segment
    pub timestamp_interval: u32,
    /// Render one line per word
    pub word_timestamps: bool,
}

impl Default for WhisperAsrConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            translate: false,
            language: "auto".to_string(),
            encode: true,
            vad_filter: false,
            initial_prompt: None,
            timestamps: false,
            timestamp_format: TimestampFormat::Auto,
            timestamp_interval: 0,
            word_timestamps: false,
        }
    }
}

/// Response shape of the ASR endpoint. `segments` stays raw here; it may
/// be tuple- or object-encoded and is normalized before use.
#[derive(Debug, Deserialize)]
struct AsrResponse {
    text: String,
    #[serde(default)]
    segments: Option<serde_json::Value>,
}

/// Self-hosted Whisper ASR transcriber
pub struct WhisperAsrBackend {
    client: reqwest::Client,
    config: WhisperAsrConfig,
}

impl WhisperAsrBackend {
    pub fn new(config: WhisperAsrConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Assemble query parameters, appending optional ones only when they
    /// differ from the server's defaults
    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = Vec::new();
        if self.config.translate {
            params.push(("task", "translate".to_string()));
        }
        if self.config.language != "auto" && !self.config.language.is_empty() {
            params.push(("language", self.config.language.clone()));
        }
        if !self.config.encode {
            params.push(("encode", "false".to_string()));
        }
        if self.config.vad_filter {
            params.push(("vad_filter", "true".to_string()));
        }
        if let Some(prompt) = self.config.initial_prompt.as_deref() {
            if !prompt.is_empty() {
                params.push(("initial_prompt", prompt.to_string()));
            }
        }
        params.push(("output", "json".to_string()));
        if self.config.word_timestamps {
            params.push(("word_timestamps", "true".to_string()));
        }
        params
    }

    /// Render the response according to the timestamp configuration
    fn render(&self, response: AsrResponse) -> Result<String, TranscribeError> {
        if !self.config.timestamps {
            return Ok(response.text.trim().to_string());
        }

        let Some(raw_segments) = response.segments else {
            // Server produced no segment timing; flat text is all there is
            return Ok(response.text.trim().to_string());
        };

        let mut segments = normalize_segments(&raw_segments)
            .map_err(|e| TranscribeError::MalformedResponse(e.to_string()))?;
        if segments.is_empty() {
            return Ok(response.text.trim().to_string());
        }
        if self.config.word_timestamps {
            segments = flatten_to_words(&segments);
        }

        Ok(format_transcript(
            &segments,
            self.config.timestamp_format,
            self.config.timestamp_interval,
        ))
    }

    async fn post_to(
        &self,
        base_url: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<AsrResponse, TranscribeError> {
        let endpoint = format!("{}/asr", base_url.trim_end_matches('/'));
        debug!(%endpoint, "posting audio to ASR server");

        let response = self
            .client
            .post(&endpoint)
            .query(&self.query_params())
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::PAYMENT_REQUIRED {
            return Err(TranscribeError::QuotaExceeded);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::RequestFailed(format!("{}: {}", status, text)));
        }

        response
            .json()
            .await
            .map_err(|e| TranscribeError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl Transcriber for WhisperAsrBackend {
    async fn transcribe(
        &self,
        media: &dyn ByteSource,
        cancel: &CancelHandle,
    ) -> Result<String, TranscribeError> {
        if self.config.urls.is_empty() {
            return Err(TranscribeError::MissingServerUrl);
        }

        let bytes = media.read().await?;
        let boundary = BoundaryToken::generate();
        let body = MultipartForm::new().bytes("audio_file", bytes).encode(&boundary);
        let content_type = boundary.content_type();

        let mut failures: Vec<String> = Vec::new();
        for url in &self.config.urls {
            if cancel.is_cancelled() {
                return Err(TranscribeError::Cancelled);
            }

            match self.post_to(url, body.clone(), &content_type).await {
                Ok(response) => return self.render(response),
                Err(e @ TranscribeError::QuotaExceeded) => return Err(e),
                Err(e) => {
                    warn!(%url, error = %e, "ASR server failed, trying next");
                    failures.push(format!("{}: {}", url, e));
                }
            }
        }

        Err(TranscribeError::AllServersFailed(failures.join("; ")))
    }
}
