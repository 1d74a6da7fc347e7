//! Frame-by-frame face twist animation.

use std::fmt;

use cgmath::{Point3, Rad, Vector3};
use quarterturn_core::{Cube, Face, PieceMask};
use quarterturn_prefs::{AnimationLock, AnimationPreferences, InterpolateFn};
use web_time::Duration;

use crate::{AnimationConflict, RotationCommand, secs};

/// Identifier for one twist animation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);
impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "animation #{}", self.0)
    }
}

/// Phase of a twist animation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Pieces are partway through the twist.
    Animating,
    /// The twist has reached its end and is being finalized.
    Completing,
}

/// State of one in-flight twist.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    /// Identifier for this twist.
    pub id: AnimationId,
    /// Twist being animated.
    pub command: RotationCommand,
    /// Pieces being twisted, captured at the start.
    pub pieces: PieceMask,
    /// Unit rotation axis.
    pub axis: Vector3<f32>,
    /// Point that the pieces rotate around.
    pub pivot: Point3<f32>,
    /// Angle at the start of the twist.
    pub start_angle: Rad<f32>,
    /// Time since the twist started.
    pub elapsed: Duration,
    /// Total time for the twist.
    pub duration: Duration,
    /// Easing curve.
    pub easing: InterpolateFn,
    /// Phase.
    pub phase: AnimationPhase,
}
impl AnimationState {
    /// Returns the fraction of time elapsed, from 0.0 to 1.0.
    pub fn raw_progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
    /// Returns the angle that the easing curve puts the pieces at now.
    fn eased_angle(&self) -> Rad<f32> {
        let t = self.easing.interpolate(self.raw_progress());
        self.start_angle + (self.command.target_angle - self.start_angle) * t
    }
}

/// Animates face twists, one state machine per twist.
#[derive(Debug, Default, Clone)]
pub struct FaceAnimator {
    lock: AnimationLock,
    next_id: u64,
    active: Vec<AnimationState>,
}
impl FaceAnimator {
    /// Constructs an idle animator.
    pub fn new(lock: AnimationLock) -> Self {
        Self {
            lock,
            ..Default::default()
        }
    }

    /// Returns the policy for admitting new twists.
    pub fn lock(&self) -> AnimationLock {
        self.lock
    }
    /// Sets the policy for admitting new twists.
    pub fn set_lock(&mut self, lock: AnimationLock) {
        self.lock = lock;
    }

    /// Returns whether any twist is in flight.
    pub fn is_animating(&self) -> bool {
        !self.active.is_empty()
    }
    /// Returns whether a face is twisting.
    pub fn is_face_animating(&self, face: Face) -> bool {
        self.active.iter().any(|a| a.command.face == face)
    }
    /// Returns all twists in flight, oldest first.
    pub fn active(&self) -> &[AnimationState] {
        &self.active
    }
    /// Returns a twist in flight.
    pub fn get(&self, id: AnimationId) -> Option<&AnimationState> {
        self.active.iter().find(|a| a.id == id)
    }

    /// Returns the twist in flight that prevents twisting `face`, if any.
    pub fn blocker(&self, cube: &Cube, face: Face) -> Option<&AnimationState> {
        match self.lock {
            AnimationLock::Face => self.active.iter().find(|a| a.command.face == face),
            AnimationLock::Pieces => {
                let pieces = cube.face_members(face);
                self.active.iter().find(|a| a.pieces.intersects(pieces))
            }
        }
    }

    /// Starts a twist, capturing the pieces currently on the face.
    ///
    /// Nothing is mutated if the twist is rejected.
    pub fn start(
        &mut self,
        cube: &Cube,
        command: RotationCommand,
        duration: Duration,
        easing: InterpolateFn,
    ) -> Result<AnimationId, AnimationConflict> {
        let face = command.face;
        if let Some(blocking) = self.blocker(cube, face) {
            log::warn!("rejected {} while {} is in flight", command.to_move(), blocking.id);
            return Err(AnimationConflict {
                face,
                blocking_face: blocking.command.face,
            });
        }

        let id = AnimationId(self.next_id);
        self.next_id += 1;
        log::debug!("starting {id}: {} over {duration:?}", command.to_move());
        self.active.push(AnimationState {
            id,
            command,
            pieces: cube.face_members(face),
            axis: face.normal(),
            pivot: face.pivot(),
            start_angle: command.angle,
            elapsed: Duration::ZERO,
            duration,
            easing,
            phase: AnimationPhase::Animating,
        });
        Ok(id)
    }

    /// Starts a twist with the duration and easing from `prefs`.
    pub fn start_with_prefs(
        &mut self,
        cube: &Cube,
        command: RotationCommand,
        prefs: &AnimationPreferences,
    ) -> Result<AnimationId, AnimationConflict> {
        let quarter_turns = command.direction.quarter_turns();
        let mut duration = prefs.twist_duration;
        if quarter_turns > 1 {
            duration *= prefs.double_turn_duration_factor;
        }
        self.start(cube, command, secs(duration), prefs.twist_interpolation)
    }

    /// Advances every twist by `delta`, rotating pieces by the change in
    /// angle since the last frame. Returns the twists that finished, in the
    /// order they started.
    pub fn advance(&mut self, cube: &mut Cube, delta: Duration) -> Vec<(AnimationId, RotationCommand)> {
        for anim in &mut self.active {
            anim.elapsed += delta;
            let new_angle = anim.eased_angle();
            cube.rotate_pieces(anim.pieces, anim.axis, anim.pivot, new_angle - anim.command.angle);
            anim.command.angle = new_angle;
            log::trace!(
                "{} at {:.3} ({:?})",
                anim.id,
                anim.raw_progress(),
                anim.command.angle,
            );
            if anim.raw_progress() >= 1.0 {
                anim.phase = AnimationPhase::Completing;
            }
        }

        let mut finished = vec![];
        let mut i = 0;
        while i < self.active.len() {
            if self.active[i].phase == AnimationPhase::Completing {
                let anim = self.active.remove(i);
                finished.push((anim.id, Self::complete(cube, anim)));
            } else {
                i += 1;
            }
        }
        finished
    }

    /// Lands a twist exactly on its target angle, re-derives face membership,
    /// and snaps the twisted pieces to the grid.
    fn complete(cube: &mut Cube, anim: AnimationState) -> RotationCommand {
        let mut command = anim.command;
        let residual = command.target_angle - command.angle;
        cube.rotate_pieces(anim.pieces, anim.axis, anim.pivot, residual);
        command.angle = command.target_angle;
        command.is_complete = true;

        cube.rederive_membership();
        cube.snap_pieces(anim.pieces);
        log::debug!("completed {}: {}", anim.id, command.to_move());
        command
    }

    /// Runs every twist to completion immediately.
    pub fn finish_all(&mut self, cube: &mut Cube) -> Vec<(AnimationId, RotationCommand)> {
        for anim in &mut self.active {
            anim.elapsed = anim.elapsed.max(anim.duration);
        }
        self.advance(cube, Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_4;

    use approx::assert_abs_diff_eq;
    use cgmath::{EuclideanSpace, InnerSpace};
    use pretty_assertions::assert_eq;
    use quarterturn_core::{GridPos, Move, TurnDirection};

    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn command(s: &str) -> RotationCommand {
        RotationCommand::from(s.parse::<Move>().unwrap())
    }

    fn run(animator: &mut FaceAnimator, cube: &mut Cube) -> Vec<RotationCommand> {
        let mut done = vec![];
        for _ in 0..1000 {
            if !animator.is_animating() {
                break;
            }
            done.extend(animator.advance(cube, FRAME).into_iter().map(|(_, c)| c));
        }
        done
    }

    #[test]
    fn test_front_twist() {
        let mut cube = Cube::new();
        let mut animator = FaceAnimator::default();
        let front_before = cube.face_members(Face::Front);
        let top_front = cube.piece_at(GridPos([0, 1, 1])).unwrap().id;

        let id = animator
            .start(&cube, command("F"), Duration::from_millis(200), InterpolateFn::EaseInOut)
            .unwrap();
        assert!(animator.is_face_animating(Face::Front));

        animator.advance(&mut cube, Duration::from_millis(100));
        let anim = animator.get(id).unwrap();
        assert_eq!(anim.phase, AnimationPhase::Animating);
        // Halfway through an ease-in-out curve is exactly halfway through the
        // twist.
        assert_abs_diff_eq!(anim.command.angle, Rad(-FRAC_PI_4), epsilon = 1e-4);
        // Pieces keep their distance from the pivot axis.
        let p = cube.piece(top_front).position;
        assert!(((p - Face::Front.pivot()).magnitude() - 1.0).abs() < 1e-5);

        let done = run(&mut animator, &mut cube);
        assert_eq!(done.len(), 1);
        assert!(done[0].is_complete);
        assert_eq!(done[0].angle, done[0].target_angle);

        // Front membership is unchanged as a set, but the pieces moved.
        assert_eq!(cube.face_members(Face::Front), front_before);
        assert_eq!(cube.piece(top_front).grid_pos(), GridPos([1, 0, 1]));
        assert_eq!(cube.piece(top_front).position, GridPos([1, 0, 1]).point());
        cube.check_invariants().unwrap();
    }

    #[test]
    fn test_same_face_rejected() {
        for lock in [AnimationLock::Face, AnimationLock::Pieces] {
            let mut cube = Cube::new();
            let mut animator = FaceAnimator::new(lock);
            animator
                .start(&cube, command("F"), Duration::from_millis(200), InterpolateFn::Linear)
                .unwrap();
            animator.advance(&mut cube, FRAME);
            let snapshot = animator.active().to_vec();

            let err = animator
                .start(&cube, command("F'"), Duration::from_millis(200), InterpolateFn::Linear)
                .unwrap_err();
            assert_eq!(err, AnimationConflict {
                face: Face::Front,
                blocking_face: Face::Front,
            });
            assert_eq!(animator.active(), snapshot.as_slice());

            assert_eq!(run(&mut animator, &mut cube).len(), 1);
            assert!(!cube.is_solved());
        }
    }

    #[test]
    fn test_lock_policy() {
        let mut cube = Cube::new();
        let mut animator = FaceAnimator::new(AnimationLock::Pieces);
        animator
            .start(&cube, command("F"), Duration::from_millis(200), InterpolateFn::Linear)
            .unwrap();
        // Right shares pieces with front.
        assert!(animator
            .start(&cube, command("R"), Duration::from_millis(200), InterpolateFn::Linear)
            .is_err());
        // Back does not.
        animator
            .start(&cube, command("B"), Duration::from_millis(200), InterpolateFn::Linear)
            .unwrap();
        assert_eq!(run(&mut animator, &mut cube).len(), 2);
        cube.check_invariants().unwrap();

        animator.set_lock(AnimationLock::Face);
        animator
            .start(&cube, command("F"), Duration::from_millis(200), InterpolateFn::Linear)
            .unwrap();
        assert!(animator
            .start(&cube, command("R"), Duration::from_millis(200), InterpolateFn::Linear)
            .is_ok());
    }

    #[test]
    fn test_four_animated_quarter_turns() {
        let mut cube = Cube::new();
        let mut animator = FaceAnimator::default();
        for _ in 0..4 {
            animator
                .start(&cube, command("U"), Duration::from_millis(150), InterpolateFn::EaseIn)
                .unwrap();
            run(&mut animator, &mut cube);
        }
        assert!(cube.is_solved());
        for piece in cube.pieces() {
            assert_eq!(piece.position, piece.home.point());
        }
    }

    #[test]
    fn test_zero_duration_and_finish_all() {
        let mut cube = Cube::new();
        let mut animator = FaceAnimator::default();
        animator
            .start(&cube, command("L2"), Duration::ZERO, InterpolateFn::Linear)
            .unwrap();
        assert_eq!(animator.advance(&mut cube, Duration::ZERO).len(), 1);

        animator
            .start(&cube, command("L2"), Duration::from_secs(10), InterpolateFn::Linear)
            .unwrap();
        let done = animator.finish_all(&mut cube);
        assert_eq!(done[0].1.direction, TurnDirection::Double);
        assert!(cube.is_solved());
        assert_eq!(cube.piece_at(GridPos::CORE).map(|p| p.position), Some(Point3::origin()));
    }

    #[test]
    fn test_double_turn_duration() {
        let prefs = AnimationPreferences::default();
        let cube = Cube::new();
        let mut animator = FaceAnimator::default();
        let id = animator
            .start_with_prefs(&cube, command("D2"), &prefs)
            .unwrap();
        let expected = secs(prefs.twist_duration * prefs.double_turn_duration_factor);
        assert_eq!(animator.get(id).unwrap().duration, expected);
    }
}
