//! Transcript rendering: timestamp formats and segment layout
//!
//! Offsets are elapsed media time, so rendering is plain integer
//! arithmetic on whole seconds; the local timezone can never skew the
//! clock values.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidTimestampFormatError;

use super::segment::TimedSegment;

/// Timestamp rendering pattern.
/// `Auto` picks `mm:ss` for transcripts under one hour and `HH:mm:ss`
/// otherwise, resolved once per formatting call from the maximum end time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    HoursMinutesSeconds,
    MinutesSeconds,
    Seconds,
    #[default]
    Auto,
}

impl TimestampFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HoursMinutesSeconds => "HH:mm:ss",
            Self::MinutesSeconds => "mm:ss",
            Self::Seconds => "ss",
            Self::Auto => "auto",
        }
    }

    /// Resolve `Auto` against the transcript's total duration in seconds
    fn resolve(self, max_end: f64) -> ResolvedFormat {
        match self {
            Self::HoursMinutesSeconds => ResolvedFormat::Hms,
            Self::MinutesSeconds => ResolvedFormat::Ms,
            Self::Seconds => ResolvedFormat::S,
            Self::Auto => {
                if max_end < 3600.0 {
                    ResolvedFormat::Ms
                } else {
                    ResolvedFormat::Hms
                }
            }
        }
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimestampFormat {
    type Err = InvalidTimestampFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HH:mm:ss" => Ok(Self::HoursMinutesSeconds),
            "mm:ss" => Ok(Self::MinutesSeconds),
            "ss" => Ok(Self::Seconds),
            "auto" => Ok(Self::Auto),
            _ => Err(InvalidTimestampFormatError {
                input: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolvedFormat {
    Hms,
    Ms,
    S,
}

fn render_timestamp(seconds: f64, format: ResolvedFormat) -> String {
    let total = seconds.max(0.0) as u64;
    match format {
        ResolvedFormat::Hms => format!(
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total / 60) % 60,
            total % 60
        ),
        ResolvedFormat::Ms => format!("{:02}:{:02}", total / 60, total % 60),
        ResolvedFormat::S => format!("{:02}", total),
    }
}

/// Render segments as one `<start> - <end>: <text>` line each.
///
/// `interval_secs > 0` groups segments into fixed-width buckets keyed by
/// start time before rendering. An empty segment list renders to an empty
/// string.
pub fn format_transcript(
    segments: &[TimedSegment],
    format: TimestampFormat,
    interval_secs: u32,
) -> String {
    if segments.is_empty() {
        return String::new();
    }

    let max_end = segments.iter().fold(0.0_f64, |acc, s| acc.max(s.end));
    let resolved = format.resolve(max_end);

    let rows = if interval_secs > 0 {
        bucket_by_interval(segments, interval_secs)
    } else {
        segments.to_vec()
    };

    rows.iter()
        .map(|seg| {
            format!(
                "{} - {}: {}",
                render_timestamp(seg.start, resolved),
                render_timestamp(seg.end, resolved),
                seg.text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flatten segments to one row per word where word timing is available.
/// Segments without word timestamps are kept whole.
pub fn flatten_to_words(segments: &[TimedSegment]) -> Vec<TimedSegment> {
    let mut rows = Vec::new();
    for segment in segments {
        match &segment.words {
            Some(words) if !words.is_empty() => {
                for word in words {
                    rows.push(TimedSegment::new(word.start, word.end, word.word.trim()));
                }
            }
            _ => rows.push(segment.clone()),
        }
    }
    rows
}

/// Group segments whose start time falls in the same fixed-width bucket.
/// Each bucket concatenates its segments' text and spans min-start to
/// max-end of its members.
pub fn bucket_by_interval(segments: &[TimedSegment], interval_secs: u32) -> Vec<TimedSegment> {
    let width = f64::from(interval_secs);
    let mut buckets: Vec<(u64, TimedSegment)> = Vec::new();

    for segment in segments {
        let key = (segment.start / width).floor() as u64;
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => {
                bucket.start = bucket.start.min(segment.start);
                bucket.end = bucket.end.max(segment.end);
                bucket.text.push_str(&segment.text);
            }
            None => buckets.push((key, segment.clone())),
        }
    }

    buckets.sort_by_key(|(k, _)| *k);
    buckets.into_iter().map(|(_, seg)| seg).collect()
}
