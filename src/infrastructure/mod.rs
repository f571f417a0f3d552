//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the wire
//! codecs, remote transcription backends, note store, and config store.

pub mod auth;
pub mod config;
pub mod http;
pub mod media;
pub mod notes;
pub mod transcription;

// Re-export adapters
pub use auth::StaticTokenProvider;
pub use config::XdgConfigStore;
pub use http::{BoundaryToken, MultipartForm, TusClient};
pub use media::{FileSource, RemoteUrlSource};
pub use notes::MarkdownNoteStore;
pub use transcription::{build_backend, Backend, CloudBackend, WhisperAsrBackend};
