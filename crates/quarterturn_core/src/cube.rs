//! Piece registry and face membership.

use cgmath::{InnerSpace, Matrix3, Point3, Quaternion, Rad, Rotation3, SquareMatrix, Vector3};

use crate::{CubeError, Face, GridPos, Move, PIECE_COUNT, Piece, PieceId, PieceMask};

/// State of a 3x3x3 puzzle cube: the position and orientation of every piece.
///
/// Which pieces belong to which face is derived from piece positions. The
/// result is cached, so it must be re-derived with
/// [`Cube::rederive_membership()`] whenever a twist finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pieces: [Piece; PIECE_COUNT],
    membership: [PieceMask; 6],
}
impl Default for Cube {
    fn default() -> Self {
        Self::new()
    }
}
impl Cube {
    /// Constructs a solved cube.
    pub fn new() -> Self {
        let mut ret = Self {
            pieces: std::array::from_fn(|i| Piece::new(PieceId(i as u8))),
            membership: [PieceMask::EMPTY; 6],
        };
        ret.rederive_membership();
        ret
    }

    /// Returns all pieces, indexed by ID.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
    /// Returns a piece.
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0 as usize]
    }
    /// Returns the piece nearest to a grid position.
    pub fn piece_at(&self, pos: GridPos) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.grid_pos() == pos)
    }

    /// Returns the pieces on a face as of the last time membership was
    /// derived.
    pub fn face_members(&self, face: Face) -> PieceMask {
        self.membership[face.idx()]
    }
    /// Computes the pieces on a face from the current piece positions.
    pub fn derive_face_members(&self, face: Face) -> PieceMask {
        self.pieces
            .iter()
            .filter(|p| face.contains(p.grid_pos()))
            .map(|p| p.id)
            .collect()
    }
    /// Re-derives the pieces on every face. This must be called after piece
    /// positions change.
    pub fn rederive_membership(&mut self) {
        for face in Face::ALL {
            self.membership[face.idx()] = self.derive_face_members(face);
        }
    }

    /// Rotates a set of pieces by `angle` around the line through `pivot`
    /// along `axis`. Both position and orientation are rotated.
    pub fn rotate_pieces(
        &mut self,
        pieces: PieceMask,
        axis: Vector3<f32>,
        pivot: Point3<f32>,
        angle: Rad<f32>,
    ) {
        let rot = Quaternion::from_axis_angle(axis.normalize(), angle);
        for id in pieces.iter() {
            let piece = &mut self.pieces[id.0 as usize];
            piece.position = pivot + rot * (piece.position - pivot);
            piece.orientation = (rot * piece.orientation).normalize();
        }
    }

    /// Snaps each piece in the set to the nearest grid position and to the
    /// nearest orientation that is a multiple of 90 degrees around each axis.
    pub fn snap_pieces(&mut self, pieces: PieceMask) {
        for id in pieces.iter() {
            let piece = &mut self.pieces[id.0 as usize];
            piece.position = piece.grid_pos().point();
            match snap_orientation(piece.orientation) {
                Some(q) => piece.orientation = q,
                None => log::error!("cannot snap orientation of {id}: {:?}", piece.orientation),
            }
        }
    }

    /// Applies a move instantly, without animation.
    pub fn apply_move(&mut self, m: Move) {
        let members = self.face_members(m.face);
        self.rotate_pieces(
            members,
            m.face.normal(),
            m.face.pivot(),
            m.direction.angle(),
        );
        self.rederive_membership();
        self.snap_pieces(members);
    }

    /// Returns whether every piece is at its home position with its original
    /// orientation.
    pub fn is_solved(&self) -> bool {
        self.pieces.iter().all(|p| {
            p.grid_pos() == p.home && snap_orientation(p.orientation) == Some(identity())
        })
    }

    /// Checks that every piece is on the grid, no two pieces overlap, and
    /// every face has exactly nine pieces.
    pub fn check_invariants(&self) -> Result<(), CubeError> {
        let mut occupied: [Option<PieceId>; PIECE_COUNT] = [None; PIECE_COUNT];
        for piece in &self.pieces {
            let pos = GridPos::round(piece.position).ok_or(CubeError::OffGrid(piece.id))?;
            if (piece.position - pos.point()).magnitude() > GRID_TOLERANCE {
                return Err(CubeError::OffGrid(piece.id));
            }
            let slot = &mut occupied[grid_index(pos)];
            if let Some(other) = *slot {
                return Err(CubeError::Collision(other, piece.id, pos));
            }
            *slot = Some(piece.id);
        }
        for face in Face::ALL {
            let count = self.face_members(face).len();
            if count != 9 {
                return Err(CubeError::FaceMembership { face, count });
            }
        }
        Ok(())
    }
}

/// Maximum distance from a grid point for a piece to count as on the grid.
const GRID_TOLERANCE: f32 = 0.001;

fn grid_index(pos: GridPos) -> usize {
    let [x, y, z] = pos.0.map(|c| (c + 1) as usize);
    x + 3 * y + 9 * z
}

fn identity() -> Quaternion<f32> {
    Quaternion::from(Matrix3::identity())
}

/// Rounds an orientation to the nearest one that maps each axis onto an axis.
///
/// Returns `None` if the rounded rotation matrix is not a rotation, which
/// means the orientation was more than about 45 degrees away from any
/// axis-aligned orientation.
pub fn snap_orientation(q: Quaternion<f32>) -> Option<Quaternion<f32>> {
    let m = Matrix3::from(q.normalize());
    let round = |v: Vector3<f32>| v.map(|x| x.round());
    let snapped = Matrix3::from_cols(round(m.x), round(m.y), round(m.z));

    // Each column must be a signed unit axis, and the result must not be a
    // reflection.
    let is_axis = |v: Vector3<f32>| v.x.abs() + v.y.abs() + v.z.abs() == 1.0;
    if !(is_axis(snapped.x) && is_axis(snapped.y) && is_axis(snapped.z)) {
        return None;
    }
    if snapped.determinant() != 1.0 {
        return None;
    }

    let ret = Quaternion::from(snapped).normalize();
    // Pick a canonical sign so equal orientations compare equal.
    Some(if ret.s < 0.0 { -ret } else { ret })
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::TurnDirection;

    #[test]
    fn test_new_cube_is_solved() {
        let cube = Cube::new();
        assert!(cube.is_solved());
        cube.check_invariants().unwrap();
        for face in Face::ALL {
            assert_eq!(cube.face_members(face).len(), 9);
        }
    }

    #[test]
    fn test_front_clockwise_moves_top_edge_to_right() {
        let mut cube = Cube::new();
        let top_front = cube.piece_at(GridPos([0, 1, 1])).unwrap().id;
        cube.apply_move(Move::new(Face::Front, TurnDirection::Clockwise));
        assert_eq!(cube.piece(top_front).grid_pos(), GridPos([1, 0, 1]));
        // The sticker that faced up now faces right.
        assert_abs_diff_eq!(
            cube.piece(top_front).transform_vector(Face::Up.normal()),
            Face::Right.normal(),
            epsilon = 1e-6,
        );
        cube.check_invariants().unwrap();
        assert!(!cube.is_solved());
    }

    #[test]
    fn test_membership_is_rederived() {
        let mut cube = Cube::new();
        let corner = cube.piece_at(GridPos([1, 1, 1])).unwrap().id;
        assert!(cube.face_members(Face::Up).contains(corner));
        cube.apply_move(Move::new(Face::Front, TurnDirection::Clockwise));
        // (1, 1, 1) moved to (1, -1, 1).
        assert!(!cube.face_members(Face::Up).contains(corner));
        assert!(cube.face_members(Face::Down).contains(corner));
        assert!(cube.face_members(Face::Front).contains(corner));
    }

    #[test]
    fn test_snap_orientation() {
        let q = Quaternion::from_axis_angle(Vector3::unit_z(), Rad(FRAC_PI_2 + 0.01));
        let snapped = snap_orientation(q).unwrap();
        let expected = Quaternion::from_axis_angle(Vector3::unit_z(), Rad(FRAC_PI_2));
        assert_abs_diff_eq!(snapped, expected, epsilon = 1e-6);

        let halfway = Quaternion::from_axis_angle(Vector3::new(1.0, 1.0, 0.0).normalize(), Rad(0.9));
        assert_eq!(snap_orientation(halfway), None);
    }

    #[test]
    fn test_snap_removes_drift() {
        let mut cube = Cube::new();
        let members = cube.face_members(Face::Right);
        for _ in 0..400 {
            cube.rotate_pieces(members, Vector3::unit_x(), Face::Right.pivot(), Rad(FRAC_PI_2 / 100.0));
        }
        cube.rederive_membership();
        cube.snap_pieces(members);
        cube.check_invariants().unwrap();
        assert!(cube.is_solved());
        for piece in cube.pieces() {
            assert_eq!(piece.position, piece.home.point());
        }
    }
}
