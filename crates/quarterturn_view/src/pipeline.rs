//! Pointer events in, twists and feedback out.

use cgmath::Point2;
use quarterturn_core::{
    Cube, DirectionSolution, Face, Move, Ray, RayCaster, Relationship, SurfaceError,
    SurfaceHit, classify, classify_faces, resolve, solve_between_faces, solve_from_drag,
};
use quarterturn_prefs::Preferences;
use smallvec::SmallVec;
use web_time::Duration;

use crate::{
    AnimationId, DragUpdate, FaceAnimator, FaceFeedback, FeedbackState, GestureError,
    GestureTracker, MoveError, PipelineError, Rejection, RotationCommand, confirm_adjacency,
    validate,
};

/// Pointer or touch position at a point in time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    /// Identifier that stays the same from pointer-down to pointer-up.
    pub id: u32,
    /// Screen position, in the coordinates the camera expects.
    pub position: Point2<f32>,
    /// Time on a monotonic clock.
    pub time: Duration,
}

/// Notification for consumers of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// The feedback for a face changed.
    Feedback {
        /// Face whose feedback changed.
        face: Face,
        /// New feedback.
        feedback: FaceFeedback,
    },
    /// A twist animation started.
    Started {
        /// Animation that started.
        id: AnimationId,
        /// Twist being animated.
        command: RotationCommand,
    },
    /// A twist finished and is now part of the cube state.
    Committed(Move),
    /// The cube became solved.
    Solved,
}

/// Gesture-to-twist pipeline for one cube.
pub struct Pipeline {
    prefs: Preferences,
    camera: Option<Box<dyn RayCaster>>,

    cube: Cube,
    tracker: GestureTracker,
    animator: FaceAnimator,
    feedback: FeedbackState,

    /// Pointers that are down, in the order they went down.
    contacts: SmallVec<[u32; 2]>,
    /// Pointer driving the current drag.
    gesture_pointer: Option<u32>,
    /// Twist that releasing the pointer would issue.
    candidate: Option<DirectionSolution>,
    /// Face currently showing hover feedback.
    hovered: Option<Face>,

    /// Committed moves, oldest first.
    history: Vec<Move>,
    events: Vec<PipelineEvent>,

    /// Time of the latest pointer sample.
    last_sample_time: Duration,
    /// Current time, advanced by pointer samples and frames.
    now: Duration,
}
impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("has_camera", &self.camera.is_some())
            .field("tracker", &self.tracker)
            .field("animator", &self.animator)
            .field("contacts", &self.contacts)
            .field("history", &self.history)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}
impl Pipeline {
    /// Constructs a pipeline with a solved cube and no camera.
    pub fn new(prefs: Preferences) -> Self {
        Self {
            camera: None,

            cube: Cube::new(),
            tracker: GestureTracker::new(prefs.gesture.clone()),
            animator: FaceAnimator::new(prefs.animation.animation_lock),
            feedback: FeedbackState::default(),

            contacts: SmallVec::new(),
            gesture_pointer: None,
            candidate: None,
            hovered: None,

            history: vec![],
            events: vec![],

            last_sample_time: Duration::ZERO,
            now: Duration::ZERO,

            prefs,
        }
    }
    /// Constructs a pipeline with a solved cube and a camera.
    pub fn with_camera(prefs: Preferences, camera: impl 'static + RayCaster) -> Self {
        let mut ret = Self::new(prefs);
        ret.set_camera(camera);
        ret
    }
    /// Sets the camera used to turn pointer positions into rays.
    pub fn set_camera(&mut self, camera: impl 'static + RayCaster) {
        self.camera = Some(Box::new(camera));
    }

    /// Returns the preferences.
    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }
    /// Returns the cube, including any twist in progress.
    pub fn cube(&self) -> &Cube {
        &self.cube
    }
    /// Returns the gesture tracker.
    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }
    /// Returns the animator.
    pub fn animator(&self) -> &FaceAnimator {
        &self.animator
    }
    /// Returns the twist that releasing the pointer would issue, if any.
    pub fn candidate(&self) -> Option<&DirectionSolution> {
        self.candidate.as_ref()
    }
    /// Returns the feedback for a face.
    pub fn feedback(&self, face: Face) -> FaceFeedback {
        self.feedback.get(face)
    }
    /// Returns every committed move, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }
    /// Returns whether a twist is in progress.
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }
    /// Returns the current time.
    pub fn now(&self) -> Duration {
        self.now
    }
    /// Removes and returns all pending events.
    pub fn drain_events(&mut self) -> Vec<PipelineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Handles a pointer going down.
    pub fn pointer_down(&mut self, sample: PointerSample) -> Result<(), PipelineError> {
        self.check_sample(&sample)?;
        if self.contacts.contains(&sample.id) {
            return Err(GestureError::DuplicateContact(sample.id).into());
        }
        let max = self.prefs.gesture.max_contacts;
        if self.contacts.len() >= max {
            log::warn!("rejected contact {}: {max} contacts already down", sample.id);
            return Err(PipelineError::MultiTouchConflict {
                count: self.contacts.len() + 1,
                max,
            });
        }
        // Pick before mutating anything so that a failure has no effect.
        let hit = if self.contacts.is_empty() {
            self.pick(sample.position)?
        } else {
            None
        };

        self.advance_clock(sample.time);
        self.contacts.push(sample.id);

        if self.contacts.len() > 1 {
            log::debug!("second contact {}; abandoning gesture", sample.id);
            self.abandon_gesture();
            return Ok(());
        }

        self.set_hover(None);
        if let Some(hit) = hit {
            self.gesture_pointer = Some(sample.id);
            if self.tracker.select(&hit, sample.time) {
                let selected = FaceFeedback::selected(&self.prefs.feedback);
                self.set_feedback(hit.face, selected);
            }
        }
        Ok(())
    }

    /// Handles a pointer moving, whether or not it is down.
    pub fn pointer_move(&mut self, sample: PointerSample) -> Result<(), PipelineError> {
        self.check_sample(&sample)?;

        if !self.contacts.contains(&sample.id) {
            if self.contacts.is_empty() {
                let face = self.pick(sample.position)?.map(|hit| hit.face);
                self.advance_clock(sample.time);
                self.set_hover(face);
            } else {
                self.advance_clock(sample.time);
            }
            return Ok(());
        }
        if self.gesture_pointer != Some(sample.id) {
            self.advance_clock(sample.time);
            return Ok(());
        }
        let Some(state) = self.tracker.state() else {
            self.advance_clock(sample.time);
            return Ok(());
        };
        let reference = state.reference_face;
        let start_facelet = state.facelet;
        let grip = state.initial_selection_point;

        let ray = self.camera_ray(sample.position)?;
        let live_hit = resolve(&ray)?;
        self.advance_clock(sample.time);
        self.check_timeout()?;

        // Project onto the plane of the reference face so the drag can be
        // measured after the pointer leaves the face.
        let Some(point) = ray.intersect_face_plane(reference) else {
            return Ok(());
        };
        let was_valid = self.tracker.state().is_some_and(|s| s.is_valid_for_rotation);
        if self.tracker.update(point, sample.time)? != DragUpdate::Accepted {
            return Ok(());
        }
        let Some(state) = self.tracker.state() else {
            return Ok(());
        };

        if !state.is_valid_for_rotation {
            if was_valid {
                self.candidate = None;
                let blocked = FaceFeedback::blocked(&self.prefs.feedback);
                self.set_feedback(reference, blocked);
            }
            return Ok(());
        }
        if !self.tracker.has_enough_drag() {
            return Ok(());
        }

        let drag = state.drag_vector();
        let prefs = &self.prefs;
        let (classification, solution) = match live_hit {
            // The pointer crossed onto another face. Unless the drag started
            // right at the edge, the facelets on either side are too far apart
            // to say anything, so fall back to the edge between the faces.
            Some(hit) if hit.face != reference => {
                let c = classify(start_facelet, hit.facelet(), &prefs.adjacency)
                    .filter(|c| c.relationship == Relationship::Adjacent)
                    .or_else(|| classify_faces(reference, hit.face, &prefs.adjacency));
                let solution = solve_between_faces(reference, hit.face, grip, &prefs.direction);
                (c, solution)
            }
            _ => {
                let solution = solve_from_drag(reference, grip, drag, &prefs.direction);
                let c = solution
                    .as_ref()
                    .ok()
                    .and_then(|s| classify_faces(reference, s.target, &prefs.adjacency));
                (c, solution)
            }
        };

        match solution {
            Ok(solution) if confirm_adjacency(&mut self.tracker, classification) => {
                let preview = FaceFeedback::preview(&self.prefs.feedback, solution.direction);
                self.candidate = Some(solution);
                self.set_feedback(reference, preview);
            }
            result => {
                if let Err(e) = result {
                    log::trace!("no twist for drag on {reference}: {e}");
                }
                self.tracker.revoke_adjacency();
                self.candidate = None;
                let selected = FaceFeedback::selected(&self.prefs.feedback);
                self.set_feedback(reference, selected);
            }
        }
        Ok(())
    }

    /// Handles a pointer going up. Returns the twist animation that it
    /// started, if any.
    pub fn pointer_up(&mut self, sample: PointerSample) -> Result<Option<AnimationId>, PipelineError> {
        self.check_sample(&sample)?;
        self.advance_clock(sample.time);
        let Some(i) = self.contacts.iter().position(|&id| id == sample.id) else {
            return Ok(None);
        };
        self.contacts.remove(i);
        if self.gesture_pointer != Some(sample.id) {
            return Ok(None);
        }
        self.gesture_pointer = None;
        let Some(reference) = self.tracker.state().map(|s| s.reference_face) else {
            return Ok(None);
        };
        self.check_timeout()?;

        let result = validate(&self.tracker, self.candidate.as_ref());
        self.tracker.clear();
        self.candidate = None;
        match result {
            Ok(command) => {
                self.set_feedback(reference, FaceFeedback::Normal);
                self.start(command).map(Some)
            }
            Err(rejection) => {
                log::debug!("no twist on release: {rejection}");
                let feedback = match rejection {
                    Rejection::Invalidated | Rejection::NoAdjacency => {
                        FaceFeedback::blocked(&self.prefs.feedback)
                    }
                    Rejection::Inactive | Rejection::NotEnoughDrag { .. } => FaceFeedback::Normal,
                };
                self.set_feedback(reference, feedback);
                Ok(None)
            }
        }
    }

    /// Cancels any gesture in progress, without touching the cube.
    pub fn cancel_gesture(&mut self) {
        self.contacts.clear();
        self.abandon_gesture();
    }

    /// Starts twisting a face without a gesture.
    pub fn do_move(&mut self, m: Move) -> Result<AnimationId, PipelineError> {
        self.start(RotationCommand::from(m))
    }
    /// Parses moves and starts each one, stopping at the first that cannot
    /// start.
    pub fn do_moves(&mut self, notation: &str) -> Result<Vec<AnimationId>, PipelineError> {
        let moves = quarterturn_core::parse_moves(notation).map_err(MoveError::from)?;
        moves.into_iter().map(|m| self.do_move(m)).collect()
    }

    /// Advances animations and timers by `delta`. Returns whether anything is
    /// still changing, in which case another frame should follow.
    pub fn step(&mut self, delta: Duration) -> bool {
        self.now += delta;

        if let Some(face) = self.tracker.state().map(|s| s.reference_face)
            && let Some(idle) = self.tracker.check_timeout(self.now)
        {
            log::warn!("selection of {face} discarded after {idle:?} idle");
            self.gesture_pointer = None;
            self.abandon_face(face);
        }

        for (_, command) in self.animator.advance(&mut self.cube, delta) {
            let m = command.to_move();
            self.history.push(m);
            self.events.push(PipelineEvent::Committed(m));
            let success = FaceFeedback::success(&self.prefs.feedback);
            self.set_feedback(command.face, success);
            if !self.animator.is_animating() && self.cube.is_solved() {
                self.events.push(PipelineEvent::Solved);
            }
        }

        for face in self.feedback.expire(self.now) {
            self.events.push(PipelineEvent::Feedback {
                face,
                feedback: FaceFeedback::Normal,
            });
        }

        self.animator.is_animating() || self.feedback.has_pending()
    }

    /// Finishes every twist in progress immediately.
    pub fn finish_animations(&mut self) {
        while self.animator.is_animating() {
            let remaining = self
                .animator
                .active()
                .iter()
                .map(|a| a.duration.saturating_sub(a.elapsed))
                .max()
                .unwrap_or_default();
            self.step(remaining);
        }
    }

    fn start(&mut self, command: RotationCommand) -> Result<AnimationId, PipelineError> {
        match self
            .animator
            .start_with_prefs(&self.cube, command, &self.prefs.animation)
        {
            Ok(id) => {
                self.events.push(PipelineEvent::Started { id, command });
                let rotating = FaceFeedback::rotating(&self.prefs.feedback);
                self.set_feedback(command.face, rotating);
                Ok(id)
            }
            Err(e) => {
                let blocked = FaceFeedback::blocked(&self.prefs.feedback);
                self.set_feedback(command.face, blocked);
                Err(e.into())
            }
        }
    }

    fn check_sample(&self, sample: &PointerSample) -> Result<(), GestureError> {
        if !(sample.position.x.is_finite() && sample.position.y.is_finite()) {
            return Err(GestureError::NonFinite);
        }
        if sample.time < self.last_sample_time {
            return Err(GestureError::TimeWentBackwards {
                last: self.last_sample_time,
                now: sample.time,
            });
        }
        Ok(())
    }

    fn advance_clock(&mut self, time: Duration) {
        self.last_sample_time = time;
        self.now = self.now.max(time);
    }

    fn check_timeout(&mut self) -> Result<(), PipelineError> {
        let Some(face) = self.tracker.state().map(|s| s.reference_face) else {
            return Ok(());
        };
        match self.tracker.check_timeout(self.now) {
            Some(idle) => {
                self.abandon_face(face);
                self.gesture_pointer = None;
                let blocked = FaceFeedback::blocked(&self.prefs.feedback);
                self.set_feedback(face, blocked);
                Err(GestureError::Timeout(idle).into())
            }
            None => Ok(()),
        }
    }

    fn camera_ray(&self, screen: Point2<f32>) -> Result<Ray, PipelineError> {
        let camera = self.camera.as_ref().ok_or(SurfaceError::MissingCamera)?;
        camera
            .ray_through(screen)
            .ok_or(PipelineError::RaycastingFailed(SurfaceError::MalformedRay))
    }

    fn pick(&self, screen: Point2<f32>) -> Result<Option<SurfaceHit>, PipelineError> {
        Ok(resolve(&self.camera_ray(screen)?)?)
    }

    fn abandon_gesture(&mut self) {
        if let Some(face) = self.tracker.state().map(|s| s.reference_face) {
            self.abandon_face(face);
        }
        self.tracker.clear();
        self.gesture_pointer = None;
    }

    fn abandon_face(&mut self, face: Face) {
        self.candidate = None;
        if !self.animator.is_face_animating(face) {
            self.set_feedback(face, FaceFeedback::Normal);
        }
    }

    fn set_hover(&mut self, face: Option<Face>) {
        if self.hovered == face {
            return;
        }
        if let Some(old) = self.hovered.take()
            && matches!(self.feedback.get(old), FaceFeedback::Hover { .. })
        {
            self.set_feedback(old, FaceFeedback::Normal);
        }
        if let Some(new) = face
            && self.feedback.get(new) == FaceFeedback::Normal
        {
            let hover = FaceFeedback::hover(&self.prefs.feedback);
            self.set_feedback(new, hover);
        }
        self.hovered = face;
    }

    fn set_feedback(&mut self, face: Face, feedback: FaceFeedback) {
        if self.feedback.set(face, feedback, self.now, &self.prefs.feedback) {
            self.events.push(PipelineEvent::Feedback { face, feedback });
        }
    }
}

