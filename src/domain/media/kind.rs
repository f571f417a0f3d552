//! Media kind value object

use std::fmt;

/// File extensions the transcription pipeline accepts.
pub const TRANSCRIBABLE_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "webm", "ogg", "flac", "m4a", "aac", "amr", "opus", "aiff", "3gp", "mp4", "m4v",
    "mov", "avi", "wmv", "flv", "mpeg", "mpg", "mkv",
];

/// Broad media category derived from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Derive the media kind from a file extension, if transcribable
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.to_lowercase();
        if !TRANSCRIBABLE_EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        match ext.as_str() {
            "mp4" | "m4v" | "mov" | "avi" | "wmv" | "flv" | "mpeg" | "mpg" | "mkv" | "3gp" => {
                Some(Self::Video)
            }
            _ => Some(Self::Audio),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check whether a file extension is in the transcribable set
pub fn is_transcribable(extension: &str) -> bool {
    MediaKind::from_extension(extension).is_some()
}

/// Truncate a file name for display, appending an ellipsis when clipped
pub fn clamp_file_name(max_length: usize, file_name: &str) -> String {
    if file_name.chars().count() <= max_length {
        return file_name.to_string();
    }
    let clipped: String = file_name.chars().take(max_length.saturating_sub(3)).collect();
    format!("{}...", clipped)
}
