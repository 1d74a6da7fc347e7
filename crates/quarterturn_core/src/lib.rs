//! Geometry model for a 3x3x3 twisty puzzle: pieces, faces, face membership,
//! surface picking, facelet adjacency, and twist direction solving.

pub use cgmath;

mod adjacency;
mod cube;
mod direction;
mod error;
mod face;
mod moves;
mod piece;
mod sign;
mod surface;

pub use adjacency::*;
pub use cube::*;
pub use direction::*;
pub use error::*;
pub use face::*;
pub use moves::*;
pub use piece::*;
pub use sign::Sign;
pub use surface::*;

/// Distance from the center of the cube to the center of each face.
pub const HALF_EXTENT: f32 = 1.5;

/// Small floating-point value used for comparisons.
pub const EPSILON: f32 = 0.0001;
