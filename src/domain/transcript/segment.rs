//! Timed segment value objects and backend response normalization
//!
//! Backends return segment lists in two encodings: a compact positional
//! array (index, seek, start, end, text, tokens, temperature, avg_logprob,
//! compression_ratio, no_speech_prob, words-or-null) and a field-named
//! object. Both are normalized here before any consumer touches
//! `start`/`end`/`text`; unrecognized shapes are rejected, not coerced.

use serde::Deserialize;
use thiserror::Error;

/// Error when a backend segment list cannot be normalized
#[derive(Debug, Clone, Error)]
pub enum SegmentParseError {
    #[error("segment list is not an array")]
    NotAnArray,

    #[error("segment {index} has an unrecognized shape: {reason}")]
    BadSegment { index: usize, reason: String },

    #[error("segment {index} has an invalid time span ({start} - {end})")]
    InvalidSpan { index: usize, start: f64, end: f64 },
}

/// A single word with its own timing, nested inside a segment
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WordSpan {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// A time-aligned span of transcript text.
/// Offsets are elapsed media time in seconds; `end >= start >= 0` holds
/// for every normalized segment.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub words: Option<Vec<WordSpan>>,
}

impl TimedSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            words: None,
        }
    }
}

/// Positional segment layout. The leading fields (index, seek) and the
/// trailing scoring fields are decoded but unused.
type TupleSegment = (
    i64,                   // index
    f64,                   // seek
    f64,                   // start
    f64,                   // end
    String,                // text
    Vec<i64>,              // tokens
    f64,                   // temperature
    f64,                   // avg_logprob
    f64,                   // compression_ratio
    f64,                   // no_speech_prob
    Option<Vec<WordSpan>>, // word timestamps
);

/// Field-named segment layout. Extra backend fields are ignored.
#[derive(Debug, Deserialize)]
struct ObjectSegment {
    start: f64,
    end: f64,
    text: String,
    #[serde(default)]
    words: Option<Vec<WordSpan>>,
}

/// Normalize a raw backend segment list into [`TimedSegment`]s.
///
/// Detection rule: if the first entry is itself an array the whole list is
/// treated as tuple-encoded; otherwise every entry must be a field-named
/// object. An empty list normalizes to an empty vec.
pub fn normalize_segments(raw: &serde_json::Value) -> Result<Vec<TimedSegment>, SegmentParseError> {
    let entries = raw.as_array().ok_or(SegmentParseError::NotAnArray)?;

    let Some(first) = entries.first() else {
        return Ok(Vec::new());
    };
    let tuple_encoded = first.is_array();

    let mut segments = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let segment = if tuple_encoded {
            let (_, _, start, end, text, _, _, _, _, _, words): TupleSegment =
                serde_json::from_value(entry.clone()).map_err(|e| {
                    SegmentParseError::BadSegment {
                        index,
                        reason: e.to_string(),
                    }
                })?;
            TimedSegment {
                start,
                end,
                text,
                words,
            }
        } else {
            let obj: ObjectSegment = serde_json::from_value(entry.clone()).map_err(|e| {
                SegmentParseError::BadSegment {
                    index,
                    reason: e.to_string(),
                }
            })?;
            TimedSegment {
                start: obj.start,
                end: obj.end,
                text: obj.text,
                words: obj.words,
            }
        };

        if segment.start < 0.0 || segment.end < segment.start {
            return Err(SegmentParseError::InvalidSpan {
                index,
                start: segment.start,
                end: segment.end,
            });
        }
        segments.push(segment);
    }

    Ok(segments)
}
