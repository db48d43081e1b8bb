//! Composer flow: the sender-facing wizard that produces a link.

pub mod clipboard;
pub mod state;

pub use clipboard::{COPY_FEEDBACK, Clipboard, ClipboardError, CopyFeedback, ReportedClipboard};
pub use state::{ComposerMode, ComposerState, ComposerStep, ComposerView};
