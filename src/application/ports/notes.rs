//! Note store port interface

use async_trait::async_trait;
use thiserror::Error;

use super::byte_source::ByteSource;

/// Note access errors
#[derive(Debug, Clone, Error)]
pub enum NoteError {
    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Failed to read note: {0}")]
    Read(String),

    #[error("Failed to write note: {0}")]
    Write(String),

    #[error("Link target could not be resolved: {0}")]
    UnresolvedLink(String),
}

/// A media file linked from a note.
///
/// `tag` is the exact link text as it appears in the note (used to locate
/// the splice anchor); `target` is the link destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLink {
    pub target: String,
    pub tag: String,
}

impl MediaLink {
    /// File name portion of the target
    pub fn file_name(&self) -> &str {
        self.target.rsplit('/').next().unwrap_or(&self.target)
    }
}

/// Port for the host document store.
///
/// Covers the editor collaborator surface: reading and writing note text
/// and enumerating transcribable media linked from a note.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Read a note's full text
    async fn read_note(&self, note: &str) -> Result<String, NoteError>;

    /// Overwrite a note's full text
    async fn write_note(&self, note: &str, content: &str) -> Result<(), NoteError>;

    /// Enumerate media links in a note whose extension is transcribable,
    /// in document order, deduplicated
    async fn linked_media(&self, note: &str) -> Result<Vec<MediaLink>, NoteError>;

    /// Construct a byte source for a media link
    fn open_media(&self, link: &MediaLink) -> Result<Box<dyn ByteSource>, NoteError>;
}
