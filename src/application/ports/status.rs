//! Status side-channel port

use std::sync::Arc;

/// Progress callback type for reporting upload progress.
/// Parameters: (bytes_sent, bytes_total)
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Port for intermediate status updates (poll progress, upload phases).
/// Purely informational; implementations must not block the caller.
pub trait StatusSink: Send + Sync {
    fn status(&self, message: &str);
}

/// Status sink that discards all messages
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn status(&self, _message: &str) {}
}
