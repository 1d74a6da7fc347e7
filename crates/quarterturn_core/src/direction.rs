//! Deriving a twist direction from a drag.

use cgmath::{Deg, InnerSpace, Point3, Vector3};
use quarterturn_prefs::DirectionPreferences;

use crate::{DirectionError, EPSILON, Face, Move, TurnDirection};

/// Twist derived from a drag on a face.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionSolution {
    /// Face to twist.
    pub face: Face,
    /// Neighboring face that the drag moves toward.
    pub target: Face,
    /// Unit vector perpendicular to both face normals.
    pub axis: Vector3<f32>,
    /// Direction to twist `face`.
    pub direction: TurnDirection,
}
impl DirectionSolution {
    /// Returns the move that twists the face.
    pub fn to_move(&self) -> Move {
        Move::new(self.face, self.direction)
    }
}

/// Solves for the twist of `reference` when the grip point is dragged toward
/// the neighboring face `target`.
pub fn solve_between_faces(
    reference: Face,
    target: Face,
    grip: Point3<f32>,
    prefs: &DirectionPreferences,
) -> Result<DirectionSolution, DirectionError> {
    check_angle(angle_degrees(reference.normal(), target.normal()), prefs)?;
    solve_toward(reference, target, grip, target.normal(), prefs)
}

/// Solves for the twist of `reference` when the point `grip` on it is dragged
/// along `drag`.
///
/// The component of the drag perpendicular to the face is ignored. The
/// neighboring face in the direction of the drag becomes the target, and the
/// direction is the same as for [`solve_between_faces()`] with that target.
pub fn solve_from_drag(
    reference: Face,
    grip: Point3<f32>,
    drag: Vector3<f32>,
    prefs: &DirectionPreferences,
) -> Result<DirectionSolution, DirectionError> {
    let push = project_onto_face(reference, drag);
    if push.magnitude() < EPSILON {
        return Err(DirectionError::NoDrag(reference));
    }
    let target =
        Face::dominant(push, Some(reference.axis())).ok_or(DirectionError::NoDrag(reference))?;
    check_angle(angle_degrees(reference.normal(), target.normal()), prefs)?;
    solve_toward(reference, target, grip, push, prefs)
}

/// Picks the direction for a drag that pushes along `push` toward `target`.
///
/// By default only the two normals matter. The axis `n_ref × n_target` is
/// compared against the reference face's up-right diagonal, so a clockwise
/// twist is a drag toward the right or bottom neighbor and a counterclockwise
/// twist is a drag toward the left or top neighbor.
///
/// With `grip_sensitive` set, the twist instead follows the torque the drag
/// applies to the grip point around the face center.
fn solve_toward(
    reference: Face,
    target: Face,
    grip: Point3<f32>,
    push: Vector3<f32>,
    prefs: &DirectionPreferences,
) -> Result<DirectionSolution, DirectionError> {
    let normal = reference.normal();
    let axis = normal.cross(target.normal());

    let clockwise = if prefs.grip_sensitive {
        // Near the center there is no meaningful lever arm, so pretend the
        // grip is above the center.
        let mut lever = project_onto_face(reference, grip - reference.surface_center());
        if lever.magnitude() < prefs.center_grip_radius {
            lever = reference.up();
        }
        check_angle(angle_degrees(lever, push), prefs)?;
        normal.cross(push).dot(lever) > 0.0
    } else {
        axis.dot(reference.up() + reference.right()) > 0.0
    };
    let direction = if clockwise {
        TurnDirection::Clockwise
    } else {
        TurnDirection::CounterClockwise
    };
    log::trace!("drag on {reference} toward {target} gives {direction:?}");

    Ok(DirectionSolution {
        face: reference,
        target,
        axis,
        direction,
    })
}

fn project_onto_face(face: Face, v: Vector3<f32>) -> Vector3<f32> {
    let n = face.normal();
    v - n * v.dot(n)
}

fn angle_degrees(a: Vector3<f32>, b: Vector3<f32>) -> f32 {
    Deg::from(a.angle(b)).0
}

fn check_angle(degrees: f32, prefs: &DirectionPreferences) -> Result<(), DirectionError> {
    if (prefs.minimum_torque_angle..=prefs.maximum_torque_angle).contains(&degrees) {
        Ok(())
    } else {
        Err(DirectionError::Ambiguous { degrees })
    }
}
