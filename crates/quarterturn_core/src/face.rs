//! Axes and faces of the cube.

use std::fmt;

use cgmath::{Point3, Vector3};
use float_ord::FloatOrd;
use serde::{Deserialize, Serialize};

use crate::{GridPos, HALF_EXTENT, Sign};

/// A 3-dimensional axis.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// X axis (right).
    X = 0,
    /// Y axis (up).
    Y = 1,
    /// Z axis (towards the camera).
    Z = 2,
}
impl Axis {
    /// All three axes.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns an integer index for this axis; X = 0, Y = 1, Z = 2.
    pub const fn int(self) -> usize {
        self as usize
    }
    /// Returns the unit vector along this axis.
    pub fn unit_vector(self) -> Vector3<f32> {
        let mut ret = Vector3::new(0.0, 0.0, 0.0);
        ret[self.int()] = 1.0;
        ret
    }
    /// Returns the axis whose component of `v` has the largest absolute value,
    /// ignoring `except`. Returns `None` if all considered components are zero.
    pub fn dominant(v: Vector3<f32>, except: Option<Axis>) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .filter(|&axis| Some(axis) != except)
            .filter(|&axis| v[axis.int()] != 0.0)
            .max_by_key(|&axis| FloatOrd(v[axis.int()].abs()))
    }
}

/// One of the six faces of the cube.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::EnumIter,
)]
pub enum Face {
    /// +X
    Right,
    /// -X
    Left,
    /// +Y
    Up,
    /// -Y
    Down,
    /// +Z
    Front,
    /// -Z
    Back,
}
impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
impl Face {
    /// All six faces, in index order.
    pub const ALL: [Face; 6] = [
        Face::Right,
        Face::Left,
        Face::Up,
        Face::Down,
        Face::Front,
        Face::Back,
    ];

    /// Returns the face on the given axis with the given sign.
    pub const fn new(axis: Axis, sign: Sign) -> Self {
        match (axis, sign) {
            (Axis::X, Sign::Pos) => Face::Right,
            (Axis::X, Sign::Neg) => Face::Left,
            (Axis::Y, Sign::Pos) => Face::Up,
            (Axis::Y, Sign::Neg) => Face::Down,
            (Axis::Z, Sign::Pos) => Face::Front,
            (Axis::Z, Sign::Neg) => Face::Back,
        }
    }
    /// Returns the face whose normal is closest to `v`, ignoring the
    /// component along `except`.
    pub fn dominant(v: Vector3<f32>, except: Option<Axis>) -> Option<Self> {
        let axis = Axis::dominant(v, except)?;
        Some(Face::new(axis, Sign::of(v[axis.int()])?))
    }

    /// Returns an index from 0 to 5.
    pub const fn idx(self) -> usize {
        self as usize
    }
    /// Returns the axis perpendicular to this face.
    pub const fn axis(self) -> Axis {
        match self {
            Face::Right | Face::Left => Axis::X,
            Face::Up | Face::Down => Axis::Y,
            Face::Front | Face::Back => Axis::Z,
        }
    }
    /// Returns the sign of this face along its perpendicular axis.
    pub const fn sign(self) -> Sign {
        match self {
            Face::Right | Face::Up | Face::Front => Sign::Pos,
            Face::Left | Face::Down | Face::Back => Sign::Neg,
        }
    }
    /// Returns the face on the other side of the cube.
    pub const fn opposite(self) -> Self {
        match self {
            Face::Right => Face::Left,
            Face::Left => Face::Right,
            Face::Up => Face::Down,
            Face::Down => Face::Up,
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }

    /// Returns the outward unit normal.
    pub fn normal(self) -> Vector3<f32> {
        self.axis().unit_vector() * self.sign().float()
    }
    /// Returns the point that face twists pivot around, which is the tip of
    /// the unit normal.
    pub fn pivot(self) -> Point3<f32> {
        Point3::new(0.0, 0.0, 0.0) + self.normal()
    }
    /// Returns the center of the face on the surface of the cube.
    pub fn surface_center(self) -> Point3<f32> {
        Point3::new(0.0, 0.0, 0.0) + self.normal() * HALF_EXTENT
    }
    /// Returns the direction that is "up" when looking at this face from
    /// outside the cube.
    ///
    /// Side faces use +Y. The top face uses -Z and the bottom face uses +Z, as
    /// in the usual unfolded net with the front face below the top face.
    pub fn up(self) -> Vector3<f32> {
        match self {
            Face::Up => -Axis::Z.unit_vector(),
            Face::Down => Axis::Z.unit_vector(),
            _ => Axis::Y.unit_vector(),
        }
    }
    /// Returns the direction that is "right" when looking at this face from
    /// outside the cube.
    pub fn right(self) -> Vector3<f32> {
        self.up().cross(self.normal())
    }

    /// Returns whether a piece at `pos` belongs to this face.
    pub fn contains(self, pos: GridPos) -> bool {
        pos[self.axis()] == self.sign().int()
    }

    /// Returns the single-character symbol used in move notation.
    pub const fn symbol(self) -> char {
        match self {
            Face::Right => 'R',
            Face::Left => 'L',
            Face::Up => 'U',
            Face::Down => 'D',
            Face::Front => 'F',
            Face::Back => 'B',
        }
    }
    /// Returns the face with the given move notation symbol.
    pub fn from_symbol(c: char) -> Option<Self> {
        Face::ALL.into_iter().find(|f| f.symbol() == c)
    }

    /// Returns whether two faces share an edge.
    pub fn is_adjacent_to(self, other: Face) -> bool {
        self.axis() != other.axis()
    }
}
