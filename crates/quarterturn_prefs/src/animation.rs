use serde::{Deserialize, Serialize};

pub use interpolation::InterpolateFn;

/// Settings for face twist animations.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnimationPreferences {
    /// Seconds for a quarter turn.
    pub twist_duration: f32,
    /// Multiplier on `twist_duration` for half turns.
    pub double_turn_duration_factor: f32,
    /// Easing curve applied to twist progress.
    pub twist_interpolation: InterpolateFn,
    /// Which in-flight animations block a new one.
    pub animation_lock: AnimationLock,
}
impl Default for AnimationPreferences {
    fn default() -> Self {
        crate::DEFAULT_PREFS.animation.clone()
    }
}

/// Policy for admitting a twist animation while others are in flight.
#[derive(
    Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq, Hash, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum AnimationLock {
    /// Reject a twist only if the same face is already animating.
    ///
    /// Two neighboring faces share pieces, so with this policy their twists
    /// can overlap and apply conflicting transforms to the shared pieces.
    Face,
    /// Reject a twist if any of its pieces belongs to an animation in flight.
    #[default]
    Pieces,
}

pub mod interpolation {
    //! Interpolation functions.

    use std::f32::consts::PI;

    use serde::{Deserialize, Serialize};

    /// Function that maps a float from the range 0.0 to 1.0 to another float
    /// from 0.0 to 1.0.
    ///
    /// Every curve is monotonic, starts at 0.0, and ends at 1.0.
    #[derive(
        Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq, Hash, strum::EnumIter,
    )]
    #[serde(rename_all = "snake_case")]
    pub enum InterpolateFn {
        /// Constant speed.
        Linear,
        /// Cosine from 0.0 to PI/2.0.
        EaseIn,
        /// Cosine from PI/2.0 to 0.0.
        EaseOut,
        /// Cosine from 0.0 to PI.
        #[default]
        EaseInOut,
    }

    impl InterpolateFn {
        /// Returns the interpolation value in the range [0, 1] for `t` in the
        /// range [0, 1].
        pub fn interpolate(self, t: f32) -> f32 {
            let t = t.clamp(0.0, 1.0);
            match self {
                Self::Linear => t,
                Self::EaseIn => 1.0 - (t * PI / 2.0).cos(),
                Self::EaseOut => ((1.0 - t) * PI / 2.0).cos(),
                Self::EaseInOut => (1.0 - (t * PI).cos()) / 2.0,
            }
        }
    }

}
