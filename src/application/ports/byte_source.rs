//! Byte source port interface

use async_trait::async_trait;
use thiserror::Error;

/// Errors while reading media bytes
#[derive(Debug, Clone, Error)]
pub enum MediaReadError {
    #[error("Media file not found: {0}")]
    NotFound(String),

    #[error("Failed to read media file: {0}")]
    Io(String),

    #[error("Failed to fetch media from URL: {0}")]
    Fetch(String),
}

/// Port for an origin of binary media content.
///
/// Implementations cover vault-resident files, arbitrary local files, and
/// remote URLs; downstream code is agnostic to the origin. Reads are lazy
/// and uncached: each call fetches from the origin again.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// File name including extension
    fn name(&self) -> &str;

    /// Lowercased file extension
    fn extension(&self) -> &str;

    /// Short human-readable label for status lines
    fn label(&self) -> String;

    /// Fetch the full byte content from the origin
    async fn read(&self) -> Result<Vec<u8>, MediaReadError>;
}
