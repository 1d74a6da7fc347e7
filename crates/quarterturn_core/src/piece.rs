//! Pieces and sets of pieces.

use std::fmt;
use std::ops::Index;

use cgmath::{Matrix3, Point3, Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::Axis;

/// Number of pieces in the puzzle, including the hidden core.
pub const PIECE_COUNT: usize = 27;

/// Integer grid position of a piece, with each coordinate in `-1..=1`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos(pub [i8; 3]);
impl Index<Axis> for GridPos {
    type Output = i8;
    fn index(&self, axis: Axis) -> &i8 {
        &self.0[axis.int()]
    }
}
impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0;
        write!(f, "({x}, {y}, {z})")
    }
}
impl GridPos {
    /// Position of the hidden core piece.
    pub const CORE: Self = Self([0; 3]);

    /// Returns the grid position nearest to `p`, or `None` if it is outside
    /// the grid.
    pub fn round(p: Point3<f32>) -> Option<Self> {
        let mut ret = [0; 3];
        for axis in Axis::ALL {
            let i = p[axis.int()].round();
            if !(-1.0..=1.0).contains(&i) {
                return None;
            }
            ret[axis.int()] = i as i8;
        }
        Some(Self(ret))
    }
    /// Returns the grid position nearest to `p`, clamping each coordinate into
    /// the grid.
    pub fn round_clamped(p: Point3<f32>) -> Self {
        Self(Axis::ALL.map(|axis| p[axis.int()].round().clamp(-1.0, 1.0) as i8))
    }
    /// Returns the center of the piece.
    pub fn point(self) -> Point3<f32> {
        let [x, y, z] = self.0;
        Point3::new(x as f32, y as f32, z as f32)
    }
    /// Returns the number of coordinates that are nonzero, which is the number
    /// of faces the piece belongs to.
    pub fn face_count(self) -> usize {
        self.0.iter().filter(|&&c| c != 0).count()
    }
    /// Returns an iterator over all 27 grid positions, in piece ID order.
    pub fn iter() -> impl Iterator<Item = GridPos> {
        (0..PIECE_COUNT).map(PieceId::home)
    }
}

/// Identity of a piece, from 0 to 26.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u8);
impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece #{}", self.0)
    }
}
impl PieceId {
    /// Returns the grid position where the piece starts.
    pub fn home(i: usize) -> GridPos {
        let coord = |n: usize| (n % 3) as i8 - 1;
        GridPos([coord(i), coord(i / 3), coord(i / 9)])
    }
}

/// One of the 27 unit cubes of the puzzle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Piece {
    /// Identity of the piece.
    pub id: PieceId,
    /// Grid position where the piece starts.
    pub home: GridPos,
    /// Center of the piece. This is only fractional while the piece is being
    /// twisted.
    pub position: Point3<f32>,
    /// Rotation of the piece from its starting orientation.
    pub orientation: Quaternion<f32>,
}
impl Piece {
    /// Constructs a piece at its home position with identity orientation.
    pub fn new(id: PieceId) -> Self {
        let home = PieceId::home(id.0 as usize);
        Self {
            id,
            home,
            position: home.point(),
            orientation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }

    /// Returns the grid position nearest to the piece's current position.
    pub fn grid_pos(&self) -> GridPos {
        GridPos::round_clamped(self.position)
    }
    /// Returns the orientation as a rotation matrix.
    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        Matrix3::from(self.orientation)
    }
    /// Returns where a vector attached to the piece in its starting
    /// orientation now points.
    pub fn transform_vector(&self, v: Vector3<f32>) -> Vector3<f32> {
        self.orientation * v
    }
}

/// Set of pieces, stored as a bitmask.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PieceMask(pub u32);
impl FromIterator<PieceId> for PieceMask {
    fn from_iter<T: IntoIterator<Item = PieceId>>(iter: T) -> Self {
        let mut ret = Self::EMPTY;
        for piece in iter {
            ret.insert(piece);
        }
        ret
    }
}
impl PieceMask {
    /// Set containing no pieces.
    pub const EMPTY: Self = Self(0);

    fn bit(piece: PieceId) -> u32 {
        debug_assert!((piece.0 as usize) < PIECE_COUNT, "{piece} is out of range");
        1 << piece.0
    }

    /// Adds a piece to the set.
    pub fn insert(&mut self, piece: PieceId) {
        self.0 |= Self::bit(piece);
    }
    /// Returns whether the set contains a piece.
    pub fn contains(self, piece: PieceId) -> bool {
        self.0 & Self::bit(piece) != 0
    }
    /// Returns the number of pieces in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }
    /// Returns whether the set is empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
    /// Returns the pieces in both sets.
    #[must_use]
    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }
    /// Returns the pieces in either set.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
    /// Returns whether the sets share any piece.
    pub fn intersects(self, other: Self) -> bool {
        !self.intersection(other).is_empty()
    }
    /// Returns an iterator over the pieces in the set, in increasing order.
    pub fn iter(self) -> impl Iterator<Item = PieceId> {
        (0..PIECE_COUNT as u8)
            .map(PieceId)
            .filter(move |&p| self.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_positions_cover_grid() {
        let mut all: Vec<GridPos> = GridPos::iter().collect();
        assert_eq!(all[13], GridPos::CORE);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), PIECE_COUNT);
    }

    #[test]
    fn test_round() {
        assert_eq!(
            GridPos::round(Point3::new(0.9999, -1.00001, 0.00002)),
            Some(GridPos([1, -1, 0])),
        );
        assert_eq!(GridPos::round(Point3::new(1.7, 0.0, 0.0)), None);
        assert_eq!(
            GridPos::round_clamped(Point3::new(1.7, 0.0, -3.0)),
            GridPos([1, 0, -1]),
        );
    }

    #[test]
    fn test_piece_mask() {
        let a: PieceMask = [PieceId(0), PieceId(3), PieceId(26)].into_iter().collect();
        let b: PieceMask = [PieceId(3), PieceId(4)].into_iter().collect();
        assert_eq!(a.len(), 3);
        assert!(a.intersects(b));
        assert_eq!(a.intersection(b).iter().collect::<Vec<_>>(), vec![PieceId(3)]);
        assert_eq!(a.union(b).len(), 4);
        assert!(!a.intersects(PieceMask::EMPTY));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_piece_mask_rejects_bad_id() {
        let mut mask = PieceMask::EMPTY;
        mask.insert(PieceId(40));
    }
}
