//! Interactive layer for a 3x3x3 twisty puzzle: turns pointer drags into face
//! twists, animates them, and reports per-face visual feedback.
//!
//! The [`Pipeline`] owns everything. It is driven by pointer samples and by
//! [`Pipeline::step()`] once per frame, and never reads a clock itself.

mod animator;
mod error;
mod feedback;
mod pipeline;
mod tracker;
mod validator;

pub use animator::*;
pub use error::*;
pub use feedback::*;
pub use pipeline::*;
pub use tracker::*;
pub use validator::*;
pub use web_time::Duration;

/// Converts seconds from preferences to a duration, treating negative and
/// non-finite values as zero.
pub(crate) fn secs(seconds: f32) -> Duration {
    Duration::try_from_secs_f32(seconds).unwrap_or_default()
}

#[cfg(test)]
mod tests;
