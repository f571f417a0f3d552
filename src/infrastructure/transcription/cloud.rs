//! Cloud transcription backend adapter
//!
//! Pipeline per file: resolve the current session, upload the bytes via
//! the resumable upload client, create a transcription job referencing
//! the uploaded object, poll the job to a terminal state, then compose
//! the note body from the transcript payload.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info};

use crate::application::ports::{
    ByteSource, ProgressCallback, StatusSink, TokenProvider, TranscribeError, Transcriber,
};
use crate::application::CancelHandle;
use crate::domain::transcript::{
    format_transcript, normalize_segments, TimestampFormat, TranscriptionJob,
};
use crate::infrastructure::http::TusClient;

use super::poll::{completion_statuses, poll_job, PollPlan, POLL_INTERVAL};

/// Storage bucket holding uploaded media
const STORAGE_BUCKET: &str = "swiftink-upload";

/// Configuration record for the cloud backend
#[derive(Debug, Clone)]
pub struct CloudBackendConfig {
    pub api_url: String,
    pub upload_url: String,
    pub storage_url: String,
    pub dashboard_url: String,
    /// Language hint; "auto" omits the hint from the job request
    pub language: String,
    pub timestamps: bool,
    pub timestamp_format: TimestampFormat,
    pub timestamp_interval: u32,
    pub embed_summary: bool,
    pub embed_outline: bool,
    pub embed_keywords: bool,
    pub embed_transcript_link: bool,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
}

impl Default for CloudBackendConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.swiftink.io/v1".to_string(),
            upload_url: "https://upload.swiftink.io/files/".to_string(),
            storage_url: "https://storage.swiftink.io".to_string(),
            dashboard_url: "https://swiftink.io/dashboard".to_string(),
            language: "auto".to_string(),
            timestamps: false,
            timestamp_format: TimestampFormat::Auto,
            timestamp_interval: 0,
            embed_summary: true,
            embed_outline: true,
            embed_keywords: true,
            embed_transcript_link: true,
            poll_attempts: 100,
            poll_interval: POLL_INTERVAL,
        }
    }
}

impl CloudBackendConfig {
    fn wants_enrichment(&self) -> bool {
        self.embed_summary || self.embed_outline || self.embed_keywords
    }
}

#[derive(Debug, Serialize)]
struct CreateTranscriptRequest {
    name: String,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

/// Cloud transcription backend
pub struct CloudBackend {
    client: reqwest::Client,
    uploader: TusClient,
    config: CloudBackendConfig,
    auth: Arc<dyn TokenProvider>,
    status: Arc<dyn StatusSink>,
}

impl CloudBackend {
    pub fn new(
        config: CloudBackendConfig,
        auth: Arc<dyn TokenProvider>,
        status: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            uploader: TusClient::new(config.upload_url.clone()),
            config,
            auth,
            status,
        }
    }

    /// Reference to the uploaded object that the job service can resolve.
    ///
    /// Constructed client-side from knowledge of the bucket layout; a
    /// server-issued upload ticket would decouple this (see DESIGN.md).
    fn object_reference(&self, account_id: &str, object_key: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.storage_url.trim_end_matches('/'),
            STORAGE_BUCKET,
            account_id,
            object_key
        )
    }

    async fn create_job(
        &self,
        name: &str,
        url: String,
        access_token: &str,
    ) -> Result<TranscriptionJob, TranscribeError> {
        let request = CreateTranscriptRequest {
            name: name.to_string(),
            url,
            language: match self.config.language.as_str() {
                "auto" | "" => None,
                lang => Some(lang.to_string()),
            },
        };

        let endpoint = format!("{}/transcripts/", self.config.api_url.trim_end_matches('/'));
        debug!(%endpoint, name, "creating transcription job");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::PAYMENT_REQUIRED {
            return Err(TranscribeError::QuotaExceeded);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(TranscribeError::NotAuthenticated);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::RequestFailed(format!("{}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| TranscribeError::MalformedResponse(e.to_string()))
    }

    /// Render the transcript text, timestamped when configured and the
    /// payload carries segment timing
    fn render_transcript_text(&self, job: &TranscriptionJob) -> Result<String, TranscribeError> {
        if self.config.timestamps {
            if let Some(raw) = &job.text_segments {
                let segments = normalize_segments(raw)
                    .map_err(|e| TranscribeError::MalformedResponse(e.to_string()))?;
                if !segments.is_empty() {
                    return Ok(format_transcript(
                        &segments,
                        self.config.timestamp_format,
                        self.config.timestamp_interval,
                    ));
                }
            }
        }

        job.text
            .as_deref()
            .map(|t| t.trim().to_string())
            .ok_or_else(|| {
                TranscribeError::MalformedResponse("terminal job payload has no text".to_string())
            })
    }

    /// Compose the final note body: transcript plus the configured
    /// summary/outline/keyword sections and a deep link to the hosted job
    fn compose_note_body(&self, job: &TranscriptionJob) -> Result<String, TranscribeError> {
        let mut body = self.render_transcript_text(job)?;

        if self.config.embed_summary {
            if let Some(summary) = job.summary.as_deref().filter(|s| !s.is_empty()) {
                body.push_str("\n\n## Summary\n");
                body.push_str(summary);
            }
        }

        if self.config.embed_outline {
            if let Some(raw) = &job.heading_segments {
                let headings = normalize_segments(raw)
                    .map_err(|e| TranscribeError::MalformedResponse(e.to_string()))?;
                if !headings.is_empty() {
                    body.push_str("\n\n## Outline\n");
                    let lines: Vec<String> = headings
                        .iter()
                        .map(|h| format!("- {}", h.text.trim()))
                        .collect();
                    body.push_str(&lines.join("\n"));
                }
            }
        }

        if self.config.embed_keywords {
            if let Some(keywords) = job.keywords.as_deref().filter(|k| !k.is_empty()) {
                body.push_str("\n\n## Keywords\n");
                body.push_str(&keywords.join(", "));
            }
        }

        if self.config.embed_transcript_link {
            body.push_str(&format!(
                "\n\n[View on dashboard]({}/transcripts/{})",
                self.config.dashboard_url.trim_end_matches('/'),
                job.id
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl Transcriber for CloudBackend {
    async fn transcribe(
        &self,
        media: &dyn ByteSource,
        cancel: &CancelHandle,
    ) -> Result<String, TranscribeError> {
        // A missing session is fatal and user-visible; never proceed silently
        let session = self
            .auth
            .current_session()
            .await
            .map_err(|_| TranscribeError::NotAuthenticated)?;

        let bytes = media.read().await?;
        if cancel.is_cancelled() {
            return Err(TranscribeError::Cancelled);
        }

        let object_key = TusClient::sanitize_object_key(media.name());
        let destination = format!("{}/{}", session.account_id, object_key);

        self.status.status(&format!("Uploading {}", media.label()));
        let sink = Arc::clone(&self.status);
        let on_progress: ProgressCallback = Arc::new(move |sent, total| {
            let percent = sent * 100 / total.max(1);
            sink.status(&format!("Uploading... {}%", percent));
        });
        self.uploader
            .upload(
                &bytes,
                STORAGE_BUCKET,
                &destination,
                &session.access_token,
                Some(on_progress),
            )
            .await?;

        if cancel.is_cancelled() {
            return Err(TranscribeError::Cancelled);
        }

        let reference = self.object_reference(&session.account_id, &object_key);
        let job = self
            .create_job(media.name(), reference, &session.access_token)
            .await?;
        info!(job = %job.id, "transcription job created");

        let job = poll_job(
            &self.client,
            PollPlan {
                url: format!(
                    "{}/transcripts/{}",
                    self.config.api_url.trim_end_matches('/'),
                    job.id
                ),
                access_token: &session.access_token,
                completed: completion_statuses(self.config.wants_enrichment()),
                max_attempts: self.config.poll_attempts,
                interval: self.config.poll_interval,
            },
            cancel,
            self.status.as_ref(),
        )
        .await?;

        self.compose_note_body(&job)
    }
}
