//! NoteScribe - transcribe media linked from markdown notes
//!
//! This crate resolves audio/video files linked from a markdown note,
//! sends their bytes to a remote transcription backend, and splices the
//! resulting text into the note below each link.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Segment/timestamp rendering, job model, config, and errors
//! - **Application**: Use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (multipart codec, tus
//!   upload client, ASR/cloud backends, markdown note store)
//! - **CLI**: Command-line interface and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
