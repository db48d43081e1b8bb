//! Relocation plan for the decline control.
//!
//! Each counted decline moves the control to a random offset from its home
//! position, kept far enough from the viewport edges to stay visible. Touch
//! devices get two extra moves shortly after, so the control keeps dancing
//! under the finger.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::reply::DeviceClass;

pub const PADDING_X: f64 = 48.0;
pub const PADDING_Y: f64 = 64.0;

/// A decline arriving this soon after the previous counted one is ignored.
pub const SETTLE_WINDOW: Duration = Duration::from_millis(300);

/// Delays of the extra moves on devices without hover.
pub const TOUCH_EXTRA_DELAYS: [Duration; 2] =
    [Duration::from_millis(250), Duration::from_millis(500)];

/// Whether the primary pointer can hover. Injected so the touch heuristic
/// can be exercised without a device.
pub trait PointerCapability {
    fn prefers_hover(&self) -> bool;
}

/// Pointer capability as reported by the client's `(hover: hover)` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverQuery(pub bool);

impl PointerCapability for HoverQuery {
    fn prefers_hover(&self) -> bool {
        self.0
    }
}

/// Fallback when the client did not report: phones and tablets can't hover.
impl PointerCapability for DeviceClass {
    fn prefers_hover(&self) -> bool {
        matches!(self, DeviceClass::Desktop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    /// Largest offset from center that keeps the control on screen.
    pub fn bounds(&self) -> (f64, f64) {
        (
            (self.width / 2.0 - PADDING_X).max(0.0),
            (self.height / 2.0 - PADDING_Y).max(0.0),
        )
    }
}

/// Offset from the control's home position, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// One scheduled move of the decline control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Relocation {
    pub delay_ms: u64,
    pub offset: Offset,
}

fn random_offset<R: Rng>(rng: &mut R, viewport: Viewport) -> Offset {
    let (max_x, max_y) = viewport.bounds();
    Offset {
        x: rng.gen_range(-1.0..=1.0_f64) * max_x,
        y: rng.gen_range(-1.0..=1.0_f64) * max_y,
    }
}

/// Plan the moves for one counted decline: one immediate move, plus the
/// delayed extras when the pointer can't hover.
pub fn plan_relocations<R, P>(rng: &mut R, viewport: Viewport, pointer: &P) -> Vec<Relocation>
where
    R: Rng,
    P: PointerCapability + ?Sized,
{
    let mut moves = vec![Relocation {
        delay_ms: 0,
        offset: random_offset(rng, viewport),
    }];

    if !pointer.prefers_hover() {
        moves.extend(TOUCH_EXTRA_DELAYS.iter().map(|delay| Relocation {
            delay_ms: delay.as_millis() as u64,
            offset: random_offset(rng, viewport),
        }));
    }

    moves
}
