//! Transcript domain module

mod format;
mod job;
mod segment;

pub use format::{bucket_by_interval, flatten_to_words, format_transcript, TimestampFormat};
pub use job::{JobStatus, TranscriptionJob};
pub use segment::{normalize_segments, SegmentParseError, TimedSegment, WordSpan};
