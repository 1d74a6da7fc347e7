use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Payloads for the per-face visual feedback requests.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedbackPreferences {
    /// Seconds that transient states (blocked, success) last before reverting
    /// to normal.
    pub duration: f32,

    pub hover_color: Rgb,
    pub hover_opacity: f32,

    pub selected_color: Rgb,
    pub selected_opacity: f32,

    pub rotating_opacity: f32,

    pub blocked_color: Rgb,
    pub blocked_pulse: bool,

    pub preview_color: Rgb,
    pub preview_opacity: f32,

    pub success_color: Rgb,
}
impl Default for FeedbackPreferences {
    fn default() -> Self {
        crate::DEFAULT_PREFS.feedback.clone()
    }
}
