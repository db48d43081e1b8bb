//! Composer wizard: collects the recipient name and sender contact and
//! hands back a shareable link.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::clipboard::{Clipboard, ClipboardError, CopyFeedback};
use crate::error::ComposeError;
use crate::invitation::Invitation;
use crate::link::{LinkShape, build_link, share_message};
use crate::reply::{DeviceClass, reply_uri};

/// Steps of the composer.
///
/// The wizard walks Name → Contact → Ready. The single-step form collects
/// both fields at once and goes Name → Ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposerStep {
    #[default]
    Name,
    Contact,
    Ready,
}

impl std::fmt::Display for ComposerStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Contact => "contact",
            Self::Ready => "ready",
        };
        write!(f, "{s}")
    }
}

/// Which layout the composer uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposerMode {
    /// One field per screen; the contact is required.
    #[default]
    Wizard,
    /// Both fields on one screen; the contact is optional.
    SingleStep,
}

impl ComposerMode {
    /// Next step in this mode's linear progression, if any.
    pub fn next(&self, step: ComposerStep) -> Option<ComposerStep> {
        use ComposerStep::*;
        match (self, step) {
            (Self::Wizard, Name) => Some(Contact),
            (Self::Wizard, Contact) => Some(Ready),
            (Self::SingleStep, Name | Contact) => Some(Ready),
            (_, Ready) => None,
        }
    }

    /// Check if a forward transition is valid. There are no backward edges.
    pub fn can_transition_to(&self, from: ComposerStep, to: ComposerStep) -> bool {
        self.next(from) == Some(to)
    }
}

/// Per-session composer state.
#[derive(Debug, Clone)]
pub struct ComposerState {
    mode: ComposerMode,
    step: ComposerStep,
    shape: LinkShape,
    name_input: String,
    contact_input: String,
    /// Set when a link is generated; cleared by any edit.
    ready: bool,
    share_open: bool,
    recipient_input: String,
    copy: CopyFeedback,
}

/// Snapshot of the composer for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ComposerView {
    pub mode: ComposerMode,
    pub step: ComposerStep,
    pub name: String,
    pub contact: String,
    pub ready: bool,
    pub link: Option<String>,
    pub copied: bool,
    pub share_open: bool,
    pub recipient: String,
}

impl ComposerState {
    pub fn new(mode: ComposerMode, shape: LinkShape) -> Self {
        Self {
            mode,
            step: ComposerStep::Name,
            shape,
            name_input: String::new(),
            contact_input: String::new(),
            ready: false,
            share_open: false,
            recipient_input: String::new(),
            copy: CopyFeedback::default(),
        }
    }

    pub fn mode(&self) -> ComposerMode {
        self.mode
    }

    pub fn step(&self) -> ComposerStep {
        self.step
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Update the raw name input. Invalidates any generated link.
    pub fn set_name(&mut self, raw: &str) {
        self.name_input = raw.to_string();
        self.invalidate();
    }

    /// Update the raw contact input. Invalidates any generated link.
    pub fn set_contact(&mut self, raw: &str) {
        self.contact_input = raw.to_string();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        if self.ready {
            tracing::debug!(step = %self.step, "Composer input changed, link invalidated");
        }
        self.ready = false;
        self.share_open = false;
        self.recipient_input.clear();
        self.copy.clear();
    }

    /// The invitation the current inputs describe.
    pub fn invitation(&self) -> Invitation {
        Invitation::new(&self.name_input, &self.contact_input)
    }

    fn check_fields(&self, need_contact: bool) -> Result<Invitation, ComposeError> {
        let invitation = self.invitation();
        if !invitation.has_name() {
            return Err(ComposeError::MissingName);
        }
        if need_contact && invitation.sender_contact().is_none() {
            return Err(ComposeError::MissingContact);
        }
        Ok(invitation)
    }

    /// Submit the current step.
    ///
    /// Refuses to move on while the step's field is empty after
    /// normalization. Submitting at `Ready` regenerates the link after an
    /// edit and is otherwise a no-op.
    pub fn advance(&mut self) -> Result<ComposerStep, ComposeError> {
        let need_contact = self.mode == ComposerMode::Wizard;

        let next = match self.step {
            ComposerStep::Name if self.mode == ComposerMode::Wizard => {
                self.check_fields(false)?;
                ComposerStep::Contact
            }
            ComposerStep::Name | ComposerStep::Contact | ComposerStep::Ready => {
                self.check_fields(need_contact)?;
                self.ready = true;
                ComposerStep::Ready
            }
        };

        if next != self.step {
            debug_assert!(self.mode.can_transition_to(self.step, next));
            tracing::info!(mode = ?self.mode, from = %self.step, to = %next, "Composer advanced");
            self.step = next;
        }
        Ok(next)
    }

    /// The current link, only while it is ready.
    pub fn link(&self, origin: &str) -> Option<String> {
        (self.ready && self.step == ComposerStep::Ready)
            .then(|| build_link(origin, &self.invitation(), self.shape))
    }

    pub fn require_link(&self, origin: &str) -> Result<String, ComposeError> {
        self.link(origin).ok_or(ComposeError::NotReady)
    }

    /// Copy the link to the clipboard. Returns whether the copy succeeded.
    /// Does nothing while no link is ready.
    pub async fn copy_link(
        &mut self,
        clipboard: &dyn Clipboard,
        origin: &str,
        now: Instant,
    ) -> bool {
        let Some(link) = self.link(origin) else {
            return false;
        };
        let outcome = clipboard.write_text(&link).await;
        self.record_copy(&outcome, now);
        outcome.is_ok()
    }

    pub fn record_copy(&mut self, outcome: &Result<(), ClipboardError>, now: Instant) {
        if self.ready {
            self.copy.record(outcome, now);
        }
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copy.is_copied(now)
    }

    /// Reveal the "share to recipient" input.
    pub fn open_share(&mut self) -> Result<(), ComposeError> {
        if !self.ready {
            return Err(ComposeError::NotReady);
        }
        self.share_open = true;
        Ok(())
    }

    pub fn set_recipient(&mut self, raw: &str) {
        self.recipient_input = raw.to_string();
    }

    /// Deep link that sends the generated link to the recipient.
    ///
    /// `None` when no link is ready or the recipient number has no digits.
    pub fn share_to_recipient(&self, origin: &str, device: DeviceClass) -> Option<String> {
        let link = self.link(origin)?;
        reply_uri(&self.recipient_input, &share_message(&link), device)
    }

    pub fn view(&self, origin: &str, now: Instant) -> ComposerView {
        ComposerView {
            mode: self.mode,
            step: self.step,
            name: self.name_input.clone(),
            contact: self.contact_input.clone(),
            ready: self.ready,
            link: self.link(origin),
            copied: self.is_copied(now),
            share_open: self.share_open,
            recipient: self.recipient_input.clone(),
        }
    }
}

impl Default for ComposerState {
    fn default() -> Self {
        Self::new(ComposerMode::default(), LinkShape::default())
    }
}
