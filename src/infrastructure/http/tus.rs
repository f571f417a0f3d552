//! tus-protocol resumable upload client
//!
//! Uploads large payloads in fixed-size chunks: one creation POST, then
//! one PATCH per chunk at the returned upload location. Each chunk
//! retries independently with an increasing backoff schedule.

use std::time::Duration;

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::ports::{ProgressCallback, TranscribeError};

/// Chunk size accepted by the storage tier; larger chunks are rejected.
pub const CHUNK_SIZE: usize = 6 * 1024 * 1024;

/// Backoff waits applied after the immediate first attempt of each chunk
const RETRY_DELAYS: [Duration; 4] = [
    Duration::from_secs(3),
    Duration::from_secs(5),
    Duration::from_secs(10),
    Duration::from_secs(20),
];

const TUS_VERSION: &str = "1.0.0";

/// Upload errors
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    #[error("Failed to create upload: {0}")]
    CreateFailed(String),

    #[error("Chunk at offset {offset} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        offset: u64,
        attempts: u32,
        last_error: String,
    },

    #[error("Upload endpoint returned an unexpected response: {0}")]
    Protocol(String),
}

impl From<UploadError> for TranscribeError {
    fn from(err: UploadError) -> Self {
        TranscribeError::Upload(err.to_string())
    }
}

/// Client for a tus-compatible chunked upload endpoint
pub struct TusClient {
    client: reqwest::Client,
    endpoint: String,
    chunk_size: usize,
}

impl TusClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Create with a custom chunk size (tests)
    pub fn with_chunk_size(endpoint: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            chunk_size,
        }
    }

    /// Replace every character outside `[A-Za-z0-9.]` with a hyphen so the
    /// name satisfies storage key constraints
    pub fn sanitize_object_key(name: &str) -> String {
        name.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '-' })
            .collect()
    }

    /// Upload `data` to `bucket`/`object_key`.
    ///
    /// Resolves with no payload once the endpoint acknowledges the final
    /// chunk; the destination key is already known to the caller.
    /// `on_progress` receives (bytes_sent, bytes_total) after each chunk.
    pub async fn upload(
        &self,
        data: &[u8],
        bucket: &str,
        object_key: &str,
        access_token: &str,
        on_progress: Option<ProgressCallback>,
    ) -> Result<(), UploadError> {
        let location = self
            .create_upload(data.len() as u64, bucket, object_key, access_token)
            .await?;
        debug!(%location, total = data.len(), "tus upload created");

        let total = data.len() as u64;
        let mut offset: u64 = 0;

        for chunk in data.chunks(self.chunk_size.max(1)) {
            self.patch_chunk(&location, offset, chunk, access_token)
                .await?;
            offset += chunk.len() as u64;
            if let Some(ref progress) = on_progress {
                progress(offset, total);
            }
        }

        Ok(())
    }

    /// Issue the creation POST and return the upload location
    async fn create_upload(
        &self,
        length: u64,
        bucket: &str,
        object_key: &str,
        access_token: &str,
    ) -> Result<String, UploadError> {
        let b64 = base64::engine::general_purpose::STANDARD;
        let metadata = format!(
            "bucketName {},objectName {}",
            b64.encode(bucket),
            b64.encode(object_key)
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(Self::tus_headers(access_token))
            .header("Upload-Length", length.to_string())
            .header("Upload-Metadata", metadata)
            .send()
            .await
            .map_err(|e| UploadError::CreateFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::CreateFailed(format!("{}: {}", status, body)));
        }

        let location = response
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| UploadError::Protocol("creation response has no Location".to_string()))?;

        self.resolve_location(location)
    }

    /// Resolve a possibly-relative Location header against the endpoint
    fn resolve_location(&self, location: &str) -> Result<String, UploadError> {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Ok(location.to_string());
        }
        let base = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| UploadError::Protocol(format!("bad endpoint URL: {}", e)))?;
        let resolved = base
            .join(location)
            .map_err(|e| UploadError::Protocol(format!("bad Location header: {}", e)))?;
        Ok(resolved.to_string())
    }

    /// PATCH one chunk, retrying transient failures with backoff
    async fn patch_chunk(
        &self,
        location: &str,
        offset: u64,
        chunk: &[u8],
        access_token: &str,
    ) -> Result<(), UploadError> {
        let attempts = RETRY_DELAYS.len() as u32 + 1;
        let mut last_error = String::new();

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = RETRY_DELAYS[attempt as usize - 1];
                warn!(offset, attempt, ?delay, "retrying chunk upload");
                tokio::time::sleep(delay).await;
            }

            let result = self
                .client
                .patch(location)
                .headers(Self::tus_headers(access_token))
                .header("Upload-Offset", offset.to_string())
                .header(CONTENT_TYPE, "application/offset+octet-stream")
                .body(chunk.to_vec())
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    // Client errors other than rate limiting will not heal
                    if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
                        return Err(UploadError::Protocol(format!("{}: {}", status, body)));
                    }
                    last_error = format!("{}: {}", status, body);
                }
                Err(e) => last_error = e.to_string(),
            }
        }

        Err(UploadError::RetriesExhausted {
            offset,
            attempts,
            last_error,
        })
    }

    fn tus_headers(access_token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Tus-Resumable", HeaderValue::from_static(TUS_VERSION));
        if let Ok(auth) = HeaderValue::from_str(&format!("Bearer {}", access_token)) {
            headers.insert(AUTHORIZATION, auth);
        }
        headers
    }
}
