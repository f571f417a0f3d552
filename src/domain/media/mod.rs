//! Media domain module

mod kind;

pub use kind::{clamp_file_name, is_transcribable, MediaKind, TRANSCRIBABLE_EXTENSIONS};
