//! Domain error types

use thiserror::Error;

/// Error when an invalid backend name is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid backend: \"{input}\". Valid backends are: whisper-asr, cloud")]
pub struct InvalidBackendError {
    pub input: String,
}

/// Error when an invalid timestamp format is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid timestamp format: \"{input}\". Valid formats are: HH:mm:ss, mm:ss, ss, auto")]
pub struct InvalidTimestampFormatError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
