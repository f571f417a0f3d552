//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use super::byte_source::{ByteSource, MediaReadError};
use crate::application::CancelHandle;

/// Transcription errors.
///
/// Variants preserve the distinctions callers act on: auth problems are
/// fatal and not retried, a poll timeout means an unknown outcome rather
/// than a confirmed failure, and a server-reported `validation_failed`
/// stays separate from a generic processing failure.
#[derive(Debug, Clone, Error)]
pub enum TranscribeError {
    #[error("Not signed in. Set an access token in the config or NOTE_SCRIBE_TOKEN")]
    NotAuthenticated,

    #[error("No transcription server URL is configured")]
    MissingServerUrl,

    #[error("Failed to read media: {0}")]
    Media(#[from] MediaReadError),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("All transcription servers failed: {0}")]
    AllServersFailed(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Transcription job failed: {0}")]
    JobFailed(String),

    #[error("The server rejected the file as invalid: {0}")]
    InvalidInput(String),

    #[error("Timed out waiting for the transcription job after {attempts} status checks")]
    Timeout { attempts: u32 },

    #[error("Free tier exceeded. Upgrade your plan to continue transcribing files")]
    QuotaExceeded,

    #[error("Malformed server response: {0}")]
    MalformedResponse(String),

    #[error("Transcription cancelled")]
    Cancelled,
}

/// Port for media transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a media byte source to text.
    ///
    /// # Arguments
    /// * `media` - The byte source to transcribe
    /// * `cancel` - Cancellation signal for this transcription; checked
    ///   after every long-running step
    ///
    /// # Returns
    /// The rendered transcript text or an error
    async fn transcribe(
        &self,
        media: &dyn ByteSource,
        cancel: &CancelHandle,
    ) -> Result<String, TranscribeError>;
}
