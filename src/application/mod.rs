//! Application layer - Use cases and ports

pub mod cancel;
pub mod ports;
mod transcribe_media;

pub use cancel::CancelHandle;
pub use transcribe_media::{
    splice_transcript, FileError, FileOutcome, FileReport, TranscribeInput,
    TranscribeLinkedMediaUseCase, TranscribeReport, TranscribeRunError,
};
