//! Cosmetic escalation driven by the decline count.

/// Labels for the decline control, in escalation order.
pub const DECLINE_LABELS: [&str; 8] = [
    "No",
    "Are you sure?",
    "Think again...",
    "Wait, I think you misclicked",
    "The 'Yes' button is right there!",
    "Okay, now you're just being mean 😢",
    "Please? 🥺",
    "I'll be sad forever 💔",
];

pub const BASE_SCALE: f64 = 1.0;
pub const DECLINE_MIN_SCALE: f64 = 0.5;
pub const DECLINE_SHRINK_STEP: f64 = 0.08;
pub const ACCEPT_GROW_STEP: f64 = 0.15;
pub const ACCEPT_BASE_FONT_PX: u32 = 18;
pub const ACCEPT_FONT_STEP_PX: u32 = 3;

pub fn decline_label(declines: u32) -> &'static str {
    let idx = (declines as usize).min(DECLINE_LABELS.len() - 1);
    DECLINE_LABELS[idx]
}

pub fn decline_scale(declines: u32) -> f64 {
    (BASE_SCALE - f64::from(declines) * DECLINE_SHRINK_STEP).max(DECLINE_MIN_SCALE)
}

/// Unbounded on purpose: the accept control keeps growing.
pub fn accept_scale(declines: u32) -> f64 {
    BASE_SCALE + f64::from(declines) * ACCEPT_GROW_STEP
}

pub fn accept_font_px(declines: u32) -> u32 {
    ACCEPT_BASE_FONT_PX.saturating_add(declines.saturating_mul(ACCEPT_FONT_STEP_PX))
}

/// Nudge shown under the buttons once the recipient has declined.
pub fn encouragement(declines: u32) -> Option<&'static str> {
    match declines {
        0 => None,
        1 => Some("Come on, give it a chance! 💗🌹"),
        2 => Some("The 'Yes' button is growing... just saying 😏💞"),
        3 => Some("You know you want to click 'Yes'! 🥰✨"),
        _ => Some("I'll keep trying! You can't escape love! 💘💖"),
    }
}
