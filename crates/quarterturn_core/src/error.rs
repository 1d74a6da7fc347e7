use thiserror::Error;

use crate::{Face, GridPos, PieceId};

/// Error produced when parsing move notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Empty move
    #[error("empty move")]
    Empty,
    /// Unknown face symbol
    #[error("unknown face {0:?}")]
    UnknownFace(char),
    /// Unknown suffix after the face symbol
    #[error("unknown move suffix {0:?}")]
    BadSuffix(String),
}

/// Error produced when picking a face with a ray.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// Ray has a zero-length or non-finite direction, or a non-finite origin
    #[error("malformed ray")]
    MalformedRay,
    /// No camera is attached to turn screen positions into rays
    #[error("no camera attached")]
    MissingCamera,
}

/// Error produced when deriving a twist direction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectionError {
    /// The two vectors are too close to parallel or antiparallel for their
    /// cross product to give a reliable direction
    #[error("ambiguous direction: angle of {degrees:.1} degrees is outside the accepted range")]
    Ambiguous {
        /// Angle between the two vectors, in degrees.
        degrees: f32,
    },
    /// The drag has no component along the face
    #[error("drag has no component parallel to {0:?}")]
    NoDrag(Face),
}

/// Violation of a cube state invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    /// Piece is not on the integer grid
    #[error("{0} is not on the grid")]
    OffGrid(PieceId),
    /// Two pieces occupy the same position
    #[error("{0} and {1} both occupy {2}")]
    Collision(PieceId, PieceId, GridPos),
    /// Face does not have exactly nine pieces
    #[error("{face:?} has {count} pieces instead of 9")]
    FaceMembership {
        /// Face with the wrong number of pieces.
        face: Face,
        /// Number of pieces on the face.
        count: usize,
    },
}
