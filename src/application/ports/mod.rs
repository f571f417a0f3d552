//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod auth;
pub mod byte_source;
pub mod config;
pub mod notes;
pub mod status;
pub mod transcriber;

// Re-export common types
pub use auth::{AuthError, Session, TokenProvider};
pub use byte_source::{ByteSource, MediaReadError};
pub use config::ConfigStore;
pub use notes::{MediaLink, NoteError, NoteStore};
pub use status::{NullStatusSink, ProgressCallback, StatusSink};
pub use transcriber::{TranscribeError, Transcriber};
