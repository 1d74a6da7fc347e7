use quarterturn_core::{CubeError, DirectionError, Face, MoveParseError, SurfaceError};
use thiserror::Error;
use web_time::Duration;

/// Error returned from a [`crate::Pipeline`] operation.
///
/// None of these are fatal. The cube is never left partially mutated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Face or geometry lookup failed
    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveError),
    /// Picking failed because of a malformed ray or missing camera
    #[error("raycasting failed: {0}")]
    RaycastingFailed(#[from] SurfaceError),
    /// Pieces of the face are already being twisted
    #[error(transparent)]
    AnimationInProgress(#[from] AnimationConflict),
    /// Pointer data is malformed or out of order
    #[error("invalid gesture: {0}")]
    InvalidGesture(GestureError),
    /// More simultaneous contacts than supported
    #[error("{count} simultaneous contacts; at most {max} are supported")]
    MultiTouchConflict {
        /// Number of contacts including the rejected one.
        count: usize,
        /// Maximum number of contacts.
        max: usize,
    },
    /// The selection went stale and was discarded
    #[error("gesture timed out after {0:?} without an update")]
    GestureTimeout(Duration),
}
impl From<GestureError> for PipelineError {
    fn from(value: GestureError) -> Self {
        match value {
            GestureError::Timeout(idle) => Self::GestureTimeout(idle),
            other => Self::InvalidGesture(other),
        }
    }
}

/// Reason a move could not be derived or applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveError {
    /// Bad move notation
    #[error(transparent)]
    Parse(#[from] MoveParseError),
    /// No twist direction could be derived from the drag
    #[error(transparent)]
    Direction(#[from] DirectionError),
    /// Cube state is inconsistent
    #[error(transparent)]
    Cube(#[from] CubeError),
}

/// Problem with pointer input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GestureError {
    /// Pointer position is NaN or infinite
    #[error("pointer position is not finite")]
    NonFinite,
    /// Sample is timestamped before the previous one
    #[error("sample at {now:?} is earlier than previous sample at {last:?}")]
    TimeWentBackwards {
        /// Timestamp of the previous sample.
        last: Duration,
        /// Timestamp of the rejected sample.
        now: Duration,
    },
    /// Pointer went down twice without going up
    #[error("pointer {0} is already down")]
    DuplicateContact(u32),
    /// Selection expired
    #[error("no update for {0:?}")]
    Timeout(Duration),
}

/// Twist rejected because its pieces are already animating.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("cannot twist {face} while {blocking_face} is twisting")]
pub struct AnimationConflict {
    /// Face that could not be twisted.
    pub face: Face,
    /// Face whose twist is in the way.
    pub blocking_face: Face,
}
