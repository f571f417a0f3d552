//! Backend kind value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidBackendError;

/// All available backend kinds
pub const ALL_BACKENDS: &[BackendKind] = &[BackendKind::WhisperAsr, BackendKind::Cloud];

/// Transcription backend identifier.
/// Dispatch over backends is a match on this enum, so adding a variant
/// is a compile error until every dispatch site handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    #[default]
    WhisperAsr,
    Cloud,
}

impl BackendKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WhisperAsr => "whisper-asr",
            Self::Cloud => "cloud",
        }
    }

    /// Get the human-readable label for this backend
    pub const fn label(&self) -> &'static str {
        match self {
            Self::WhisperAsr => "Self-hosted Whisper ASR",
            Self::Cloud => "Cloud transcription service",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = InvalidBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whisper-asr" | "whisper_asr" => Ok(Self::WhisperAsr),
            "cloud" => Ok(Self::Cloud),
            _ => Err(InvalidBackendError {
                input: s.to_string(),
            }),
        }
    }
}
