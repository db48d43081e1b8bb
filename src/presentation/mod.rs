//! Presentation flow: the recipient-facing question screen.

pub mod escalation;
pub mod evasion;
pub mod state;

pub use evasion::{HoverQuery, Offset, PointerCapability, Relocation, Viewport};
pub use state::{
    DeclineOutcome, FALLBACK_GREETING, PresentationPhase, PresentationState, PresentationView,
    greeting_for,
};
