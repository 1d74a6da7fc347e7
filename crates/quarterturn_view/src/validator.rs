//! Turning a tracked drag into a twist command.

use cgmath::Rad;
use quarterturn_core::{Classification, DirectionSolution, Face, Move, Relationship, TurnDirection};
use thiserror::Error;

use crate::GestureTracker;

/// Twist to animate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RotationCommand {
    /// Face to twist.
    pub face: Face,
    /// Direction to twist it.
    pub direction: TurnDirection,
    /// Angle the twist has reached.
    pub angle: Rad<f32>,
    /// Angle at which the twist is done.
    pub target_angle: Rad<f32>,
    /// Whether the twist has been applied in full.
    pub is_complete: bool,
}
impl From<Move> for RotationCommand {
    fn from(m: Move) -> Self {
        Self {
            face: m.face,
            direction: m.direction,
            angle: Rad(0.0),
            target_angle: m.direction.angle(),
            is_complete: false,
        }
    }
}
impl RotationCommand {
    /// Returns the move in notation form.
    pub fn to_move(&self) -> Move {
        Move::new(self.face, self.direction)
    }
}

/// Reason a drag did not produce a twist.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Nothing is selected
    #[error("no selection")]
    Inactive,
    /// The drag went too far
    #[error("gesture was invalidated")]
    Invalidated,
    /// The drag is too short
    #[error("drag of {distance} is shorter than {minimum}")]
    NotEnoughDrag {
        /// Length of the drag.
        distance: f32,
        /// Minimum length.
        minimum: f32,
    },
    /// The drag never reached a neighboring face
    #[error("no adjacent face found")]
    NoAdjacency,
}

/// Confirms the tracker's adjacency if `classification` says the drag reached
/// a neighbor. Returns whether it did.
pub fn confirm_adjacency(
    tracker: &mut GestureTracker,
    classification: Option<Classification>,
) -> bool {
    let adjacent = classification.is_some_and(|c| c.relationship == Relationship::Adjacent);
    if adjacent {
        tracker.confirm_valid_adjacency()
    } else {
        tracker.revoke_adjacency();
        false
    }
}

/// Checks that the tracked drag may twist and combines it with the derived
/// direction.
pub fn validate(
    tracker: &GestureTracker,
    solution: Option<&DirectionSolution>,
) -> Result<RotationCommand, Rejection> {
    let state = tracker.state().ok_or(Rejection::Inactive)?;
    if !state.is_valid_for_rotation {
        return Err(Rejection::Invalidated);
    }
    let minimum = tracker.prefs().minimum_drag_distance;
    if state.drag_distance < minimum {
        return Err(Rejection::NotEnoughDrag {
            distance: state.drag_distance,
            minimum,
        });
    }
    let solution = solution
        .filter(|s| state.has_valid_adjacency && s.face == state.reference_face)
        .ok_or(Rejection::NoAdjacency)?;
    Ok(RotationCommand::from(solution.to_move()))
}

#[cfg(test)]
mod tests {
    use cgmath::{Point2, Point3};
    use pretty_assertions::assert_eq;
    use quarterturn_core::{
        OrthographicCamera, RayCaster, classify_faces, resolve, solve_from_drag,
    };
    use quarterturn_prefs::Preferences;
    use web_time::Duration;

    use super::*;

    fn select_front_center(tracker: &mut GestureTracker) {
        let ray = OrthographicCamera::facing(Face::Front)
            .ray_through(Point2::new(0.0, 0.0))
            .unwrap();
        tracker.select(&resolve(&ray).unwrap().unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_validate() {
        let prefs = Preferences::default();
        let mut tracker = GestureTracker::new(prefs.gesture.clone());
        assert_eq!(validate(&tracker, None), Err(Rejection::Inactive));

        select_front_center(&mut tracker);
        assert!(matches!(
            validate(&tracker, None),
            Err(Rejection::NotEnoughDrag { .. }),
        ));

        let point = Point3::new(1.0, 0.0, 1.5);
        tracker.update(point, Duration::from_millis(50)).unwrap();
        let state = tracker.state().unwrap();
        let solution = solve_from_drag(
            Face::Front,
            state.initial_selection_point,
            state.drag_vector(),
            &prefs.direction,
        )
        .unwrap();
        assert_eq!(validate(&tracker, Some(&solution)), Err(Rejection::NoAdjacency));

        let classification = classify_faces(Face::Front, solution.target, &prefs.adjacency);
        assert!(confirm_adjacency(&mut tracker, classification));
        let command = validate(&tracker, Some(&solution)).unwrap();
        assert_eq!(command.face, Face::Front);
        assert_eq!(command.direction, TurnDirection::Clockwise);
        assert_eq!(command.target_angle, TurnDirection::Clockwise.angle());
        assert!(!command.is_complete);
    }

    #[test]
    fn test_invalidated() {
        let mut tracker = GestureTracker::new(Preferences::default().gesture);
        select_front_center(&mut tracker);
        tracker.confirm_valid_adjacency();
        tracker
            .update(Point3::new(6.0, 0.0, 1.5), Duration::from_millis(50))
            .unwrap();
        assert_eq!(validate(&tracker, None), Err(Rejection::Invalidated));
    }

    #[test]
    fn test_non_adjacent_revokes() {
        let mut tracker = GestureTracker::new(Preferences::default().gesture);
        select_front_center(&mut tracker);
        tracker.confirm_valid_adjacency();
        assert!(!confirm_adjacency(&mut tracker, None));
        assert!(!tracker.state().unwrap().has_valid_adjacency);
    }
}
