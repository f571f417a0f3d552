//! Transcription job model for asynchronous backends

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-side job status. The client only ever reads these; unknown
/// status strings fail deserialization rather than mapping to a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Transcribing,
    Transcribed,
    Complete,
    Failed,
    ValidationFailed,
}

impl JobStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Transcribing => "transcribing",
            Self::Transcribed => "transcribed",
            Self::Complete => "complete",
            Self::Failed => "failed",
            Self::ValidationFailed => "validation_failed",
        }
    }

    /// Whether this status reports a server-side failure
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::ValidationFailed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transcription job as reported by the status endpoint.
///
/// Transcript payload fields arrive only once a success status is
/// reached; segment arrays are kept raw here and normalized by
/// [`crate::domain::transcript::normalize_segments`].
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionJob {
    pub id: String,
    pub status: JobStatus,
    /// Percent complete, present on some intermediate responses
    #[serde(default)]
    pub progress: Option<f32>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub text_segments: Option<serde_json::Value>,
    #[serde(default)]
    pub heading_segments: Option<serde_json::Value>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}
