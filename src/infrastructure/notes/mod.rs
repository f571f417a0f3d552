//! Note store adapters

mod markdown;

pub use markdown::MarkdownNoteStore;
