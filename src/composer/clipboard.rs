//! Clipboard capability and the transient "copied" indicator.

use std::time::{Duration, Instant};

use async_trait::async_trait;

/// How long the "Copied!" indicator stays up after a successful copy.
pub const COPY_FEEDBACK: Duration = Duration::from_millis(1500);

/// The clipboard write failed or is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// Host-provided clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard whose outcome was already decided by the client, e.g. a browser
/// reporting the result of its own `navigator.clipboard` call.
#[derive(Debug, Clone, Copy)]
pub struct ReportedClipboard {
    ok: bool,
}

impl ReportedClipboard {
    pub fn new(ok: bool) -> Self {
        Self { ok }
    }
}

#[async_trait]
impl Clipboard for ReportedClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        if self.ok {
            Ok(())
        } else {
            Err(ClipboardError("client reported failure".to_string()))
        }
    }
}

/// Self-clearing "copied" flag.
///
/// Set on a successful copy and read back against a clock; it lapses on its
/// own after [`COPY_FEEDBACK`], so no timer has to be cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    /// Record a copy attempt. Failures leave the flag unset.
    pub fn record(&mut self, outcome: &Result<(), ClipboardError>, now: Instant) {
        match outcome {
            Ok(()) => self.copied_at = Some(now),
            Err(e) => {
                tracing::debug!(error = %e, "Copy failed, leaving indicator unset");
                self.copied_at = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.copied_at = None;
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_FEEDBACK)
    }
}
