//! Presentation state machine: the recipient's question screen.

use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::escalation;
use super::evasion::{PointerCapability, Relocation, SETTLE_WINDOW, Viewport, plan_relocations};
use crate::error::TransitionError;
use crate::invitation::Invitation;

/// Greeting used when the link carried no name.
pub const FALLBACK_GREETING: &str = "Hey You!";

/// Phases of the question screen.
///
/// `Asking` loops on itself for every decline; `Accepted` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationPhase {
    #[default]
    Asking,
    Accepted,
}

impl PresentationPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl std::fmt::Display for PresentationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asking => write!(f, "asking"),
            Self::Accepted => write!(f, "accepted"),
        }
    }
}

/// Per-session presentation state.
#[derive(Debug, Clone)]
pub struct PresentationState {
    invitation: Invitation,
    phase: PresentationPhase,
    /// Only ever increases.
    declines: u32,
    last_decline_at: Option<Instant>,
}

/// Snapshot of the question screen for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct PresentationView {
    pub phase: PresentationPhase,
    pub greeting: String,
    pub recipient_name: String,
    pub declines: u32,
    pub decline_label: &'static str,
    pub decline_scale: f64,
    pub accept_scale: f64,
    pub accept_font_px: u32,
    pub encouragement: Option<&'static str>,
}

/// Result of a decline interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclineOutcome {
    /// Counted; the control moves along these relocations.
    Counted(Vec<Relocation>),
    /// Arrived inside the settle window of the previous decline.
    Ignored,
}

pub fn greeting_for(invitation: &Invitation) -> String {
    if invitation.has_name() {
        format!("Hey {}!", invitation.recipient_name())
    } else {
        FALLBACK_GREETING.to_string()
    }
}

impl PresentationState {
    pub fn new(invitation: Invitation) -> Self {
        Self {
            invitation,
            phase: PresentationPhase::Asking,
            declines: 0,
            last_decline_at: None,
        }
    }

    pub fn invitation(&self) -> &Invitation {
        &self.invitation
    }

    pub fn phase(&self) -> PresentationPhase {
        self.phase
    }

    pub fn declines(&self) -> u32 {
        self.declines
    }

    /// `Asking --decline--> Asking`.
    ///
    /// Counts the decline and plans the control's escape. A decline inside
    /// the settle window of the previous one is ignored, so a hover followed
    /// by a click counts once.
    pub fn decline<R, P>(
        &mut self,
        rng: &mut R,
        viewport: Viewport,
        pointer: &P,
        now: Instant,
    ) -> Result<DeclineOutcome, TransitionError>
    where
        R: Rng,
        P: PointerCapability + ?Sized,
    {
        if self.phase.is_terminal() {
            return Err(TransitionError::Terminal {
                state: self.phase.to_string(),
                action: "decline".to_string(),
            });
        }

        if let Some(last) = self.last_decline_at {
            if now.saturating_duration_since(last) < SETTLE_WINDOW {
                return Ok(DeclineOutcome::Ignored);
            }
        }

        self.declines = self.declines.saturating_add(1);
        self.last_decline_at = Some(now);
        tracing::debug!(declines = self.declines, "Decline counted");

        Ok(DeclineOutcome::Counted(plan_relocations(
            rng, viewport, pointer,
        )))
    }

    /// `Asking --accept--> Accepted`. Reachable from any decline count;
    /// accepting again is a no-op.
    pub fn accept(&mut self) {
        if self.phase != PresentationPhase::Accepted {
            tracing::info!(declines = self.declines, "Invitation accepted");
            self.phase = PresentationPhase::Accepted;
        }
    }

    pub fn view(&self) -> PresentationView {
        PresentationView {
            phase: self.phase,
            greeting: greeting_for(&self.invitation),
            recipient_name: self.invitation.recipient_name().to_string(),
            declines: self.declines,
            decline_label: escalation::decline_label(self.declines),
            decline_scale: escalation::decline_scale(self.declines),
            accept_scale: escalation::accept_scale(self.declines),
            accept_font_px: escalation::accept_font_px(self.declines),
            encouragement: escalation::encouragement(self.declines),
        }
    }
}
