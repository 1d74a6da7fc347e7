//! Sign of a face along its axis.

use serde::{Deserialize, Serialize};

/// Which end of an axis a face is on.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sign {
    /// Negative end.
    Neg = -1,
    /// Positive end.
    Pos = 1,
}
impl Sign {
    /// Returns -1 or 1, which is also the grid coordinate of the face layer.
    pub const fn int(self) -> i8 {
        self as i8
    }
    /// Returns -1.0 or 1.0.
    pub const fn float(self) -> f32 {
        self.int() as f32
    }
    /// Returns the sign of a number, or `None` if it is zero or NaN.
    pub fn of(x: f32) -> Option<Sign> {
        if x > 0.0 {
            Some(Sign::Pos)
        } else if x < 0.0 {
            Some(Sign::Neg)
        } else {
            None
        }
    }
}
