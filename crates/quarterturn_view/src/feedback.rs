//! Per-face visual feedback requests.

use quarterturn_core::{Face, TurnDirection};
use quarterturn_prefs::{FeedbackPreferences, Rgb};
use web_time::Duration;

use crate::secs;

/// Requested highlight for a face. The renderer decides how to draw it.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub enum FaceFeedback {
    /// No highlight.
    #[default]
    Normal,
    /// Pointer is over the face.
    Hover {
        /// Highlight color.
        color: Rgb,
        /// Highlight opacity.
        opacity: f32,
    },
    /// Face is the reference face of a drag.
    Selected {
        /// Highlight color.
        color: Rgb,
        /// Highlight opacity.
        opacity: f32,
    },
    /// Face is twisting.
    Rotating {
        /// Highlight opacity.
        opacity: f32,
    },
    /// Gesture on the face was rejected.
    Blocked {
        /// Highlight color.
        color: Rgb,
        /// Whether the highlight should pulse.
        pulse: bool,
    },
    /// Releasing the pointer now would twist the face.
    Preview {
        /// Highlight color.
        color: Rgb,
        /// Highlight opacity.
        opacity: f32,
        /// Direction the face would twist.
        direction: TurnDirection,
    },
    /// Twist finished.
    Success {
        /// Highlight color.
        color: Rgb,
    },
}
impl FaceFeedback {
    pub(crate) fn hover(prefs: &FeedbackPreferences) -> Self {
        Self::Hover {
            color: prefs.hover_color,
            opacity: prefs.hover_opacity,
        }
    }
    pub(crate) fn selected(prefs: &FeedbackPreferences) -> Self {
        Self::Selected {
            color: prefs.selected_color,
            opacity: prefs.selected_opacity,
        }
    }
    pub(crate) fn rotating(prefs: &FeedbackPreferences) -> Self {
        Self::Rotating {
            opacity: prefs.rotating_opacity,
        }
    }
    pub(crate) fn blocked(prefs: &FeedbackPreferences) -> Self {
        Self::Blocked {
            color: prefs.blocked_color,
            pulse: prefs.blocked_pulse,
        }
    }
    pub(crate) fn preview(prefs: &FeedbackPreferences, direction: TurnDirection) -> Self {
        Self::Preview {
            color: prefs.preview_color,
            opacity: prefs.preview_opacity,
            direction,
        }
    }
    pub(crate) fn success(prefs: &FeedbackPreferences) -> Self {
        Self::Success {
            color: prefs.success_color,
        }
    }

    /// Returns the name of the state, without its payload.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hover { .. } => "hover",
            Self::Selected { .. } => "selected",
            Self::Rotating { .. } => "rotating",
            Self::Blocked { .. } => "blocked",
            Self::Preview { .. } => "preview",
            Self::Success { .. } => "success",
        }
    }

    /// Returns whether the state reverts to normal on its own.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Blocked { .. } | Self::Success { .. })
    }

    /// Returns the RGBA color to draw over the face, or `None` if the face is
    /// drawn as-is. `Rotating` only changes opacity, so it has no overlay.
    ///
    /// `fade` scales the alpha of transient states; see
    /// [`FeedbackState::transient_amount()`].
    pub fn overlay(self, fade: f32) -> Option<[f32; 4]> {
        match self {
            Self::Normal | Self::Rotating { .. } => None,
            Self::Hover { color, opacity }
            | Self::Selected { color, opacity }
            | Self::Preview { color, opacity, .. } => Some(color.with_alpha(opacity)),
            Self::Blocked { color, .. } | Self::Success { color } => Some(color.with_alpha(fade)),
        }
    }
}

/// Current feedback for every face, with expiry for transient states.
#[derive(Debug, Default, Clone)]
pub struct FeedbackState {
    faces: [FaceFeedback; 6],
    /// Time at which each transient state reverts to normal.
    expiry: [Option<Duration>; 6],
}
impl FeedbackState {
    /// Returns the feedback for a face.
    pub fn get(&self, face: Face) -> FaceFeedback {
        self.faces[face.idx()]
    }

    /// Sets the feedback for a face. Returns whether it changed.
    ///
    /// Transient states expire `prefs.duration` seconds after `now`.
    pub fn set(
        &mut self,
        face: Face,
        feedback: FaceFeedback,
        now: Duration,
        prefs: &FeedbackPreferences,
    ) -> bool {
        self.expiry[face.idx()] = feedback
            .is_transient()
            .then(|| now + secs(prefs.duration));
        let old = std::mem::replace(&mut self.faces[face.idx()], feedback);
        old != feedback
    }

    /// Returns whether any transient state has yet to expire.
    pub fn has_pending(&self) -> bool {
        self.expiry.iter().any(Option::is_some)
    }

    /// Reverts expired transient states to normal. Returns the faces that
    /// changed.
    pub fn expire(&mut self, now: Duration) -> Vec<Face> {
        let mut changed = vec![];
        for face in Face::ALL {
            let i = face.idx();
            if self.expiry[i].is_some_and(|t| now >= t) {
                self.expiry[i] = None;
                self.faces[i] = FaceFeedback::Normal;
                changed.push(face);
            }
        }
        changed
    }

    /// Returns how strongly a transient state should be drawn, fading
    /// linearly from 1.0 when it is set down to 0.0 when it expires.
    pub fn transient_amount(&self, face: Face, now: Duration, prefs: &FeedbackPreferences) -> f32 {
        let total = secs(prefs.duration);
        match self.expiry[face.idx()] {
            Some(t) if !total.is_zero() => {
                let remaining = t.saturating_sub(now);
                (remaining.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}
