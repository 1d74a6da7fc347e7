//! Tracking the face selected at the start of a drag.

use cgmath::{InnerSpace, Point3, Vector3};
use quarterturn_core::{Face, Facelet, SurfaceHit};
use quarterturn_prefs::GesturePreferences;
use web_time::Duration;

use crate::{GestureError, secs};

/// Selection made at the start of a drag, and how far the drag has gone.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceState {
    /// Face that was selected, which is the face that will twist.
    pub reference_face: Face,
    /// Facelet under the pointer at selection.
    pub facelet: Facelet,
    /// Point on the surface where the drag started.
    pub initial_selection_point: Point3<f32>,
    /// Outward normal of the reference face.
    pub face_normal: Vector3<f32>,
    /// Time of the selection.
    pub selection_time: Duration,
    /// Time of the selection or the last accepted update, whichever is later.
    pub last_update_time: Duration,
    /// Distance from the initial selection point to the current drag point.
    pub drag_distance: f32,
    /// Latest accepted drag point, in the plane of the reference face.
    pub current_drag_point: Point3<f32>,
    /// Whether the drag is still short enough to twist. Once this is false it
    /// stays false until the next selection.
    pub is_valid_for_rotation: bool,
    /// Whether a neighboring facelet or face has been confirmed as the drag
    /// target.
    pub has_valid_adjacency: bool,
}
impl ReferenceState {
    /// Returns the vector from the initial selection point to the current
    /// drag point.
    pub fn drag_vector(&self) -> Vector3<f32> {
        self.current_drag_point - self.initial_selection_point
    }
}

/// Result of [`GestureTracker::update()`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DragUpdate {
    /// There is no active selection.
    Inactive,
    /// The pointer moved less than the hysteresis threshold, so nothing
    /// changed.
    Suppressed,
    /// The drag was updated.
    Accepted,
}

/// State machine for the face selection of a drag gesture.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    prefs: GesturePreferences,
    enabled: bool,
    state: Option<ReferenceState>,
    /// Start of the most recent drag. This survives `clear()` but not
    /// `reset()`.
    drag_origin: Option<Point3<f32>>,
}
impl GestureTracker {
    /// Constructs an idle tracker.
    pub fn new(prefs: GesturePreferences) -> Self {
        Self {
            prefs,
            enabled: true,
            state: None,
            drag_origin: None,
        }
    }

    /// Returns the tracker's thresholds.
    pub fn prefs(&self) -> &GesturePreferences {
        &self.prefs
    }
    /// Replaces the tracker's thresholds.
    pub fn set_prefs(&mut self, prefs: GesturePreferences) {
        self.prefs = prefs;
    }

    /// Returns whether new selections are accepted.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
    /// Enables or disables tracking. Disabling clears any selection.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
    }

    /// Returns the current selection, if there is one.
    pub fn state(&self) -> Option<&ReferenceState> {
        self.state.as_ref()
    }
    /// Returns whether there is a selection.
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }
    /// Returns the starting point of the most recent drag.
    pub fn drag_origin(&self) -> Option<Point3<f32>> {
        self.drag_origin
    }
    /// Returns whether the current drag is long enough to twist.
    pub fn has_enough_drag(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.drag_distance >= self.prefs.minimum_drag_distance)
    }

    /// Starts a new selection, replacing any existing one. Returns `false` if
    /// tracking is disabled.
    pub fn select(&mut self, hit: &SurfaceHit, time: Duration) -> bool {
        if !self.enabled {
            return false;
        }
        log::debug!("selected {} at {:?}", hit.face, hit.point);
        self.drag_origin = Some(hit.point);
        self.state = Some(ReferenceState {
            reference_face: hit.face,
            facelet: hit.facelet(),
            initial_selection_point: hit.point,
            face_normal: hit.normal,
            selection_time: time,
            last_update_time: time,
            drag_distance: 0.0,
            current_drag_point: hit.point,
            is_valid_for_rotation: true,
            has_valid_adjacency: false,
        });
        true
    }

    /// Moves the drag to `point`.
    pub fn update(&mut self, point: Point3<f32>, time: Duration) -> Result<DragUpdate, GestureError> {
        let hysteresis = self.prefs.hysteresis_threshold;
        let max_distance = self.prefs.maximum_drag_distance;
        let Some(state) = &mut self.state else {
            return Ok(DragUpdate::Inactive);
        };
        if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
            return Err(GestureError::NonFinite);
        }
        if time < state.last_update_time {
            return Err(GestureError::TimeWentBackwards {
                last: state.last_update_time,
                now: time,
            });
        }

        if (point - state.current_drag_point).magnitude() < hysteresis {
            log::trace!("suppressed drag update to {point:?}");
            return Ok(DragUpdate::Suppressed);
        }

        let origin = self.drag_origin.unwrap_or(state.initial_selection_point);
        state.drag_distance = (point - origin).magnitude();
        state.current_drag_point = point;
        state.last_update_time = time;
        if state.is_valid_for_rotation && state.drag_distance > max_distance {
            log::debug!(
                "drag of {} exceeds maximum {max_distance}; invalidating",
                state.drag_distance,
            );
            state.is_valid_for_rotation = false;
        }
        Ok(DragUpdate::Accepted)
    }

    /// Clears the selection if it has not been updated for longer than the
    /// validity timeout. Returns the idle time if it was cleared.
    pub fn check_timeout(&mut self, now: Duration) -> Option<Duration> {
        let state = self.state.as_ref()?;
        let idle = now.saturating_sub(state.last_update_time);
        if idle > secs(self.prefs.validity_timeout) {
            log::debug!("selection of {} timed out after {idle:?}", state.reference_face);
            self.clear();
            Some(idle)
        } else {
            None
        }
    }

    /// Marks that the drag has a valid neighboring target. Returns `false` if
    /// there is no selection.
    pub fn confirm_valid_adjacency(&mut self) -> bool {
        match &mut self.state {
            Some(state) => {
                if !state.has_valid_adjacency {
                    log::debug!("confirmed adjacency for {}", state.reference_face);
                }
                state.has_valid_adjacency = true;
                true
            }
            None => false,
        }
    }
    /// Withdraws a previous adjacency confirmation.
    pub fn revoke_adjacency(&mut self) {
        if let Some(state) = &mut self.state {
            state.has_valid_adjacency = false;
        }
    }

    /// Ends the selection.
    pub fn clear(&mut self) {
        if let Some(state) = self.state.take() {
            log::debug!("cleared selection of {}", state.reference_face);
        }
    }
    /// Ends the selection because the gesture is no longer usable.
    pub fn invalidate(&mut self, reason: &str) {
        if let Some(state) = &self.state {
            log::warn!("invalidated selection of {}: {reason}", state.reference_face);
        }
        self.clear();
    }
    /// Ends the selection and forgets where the last drag started.
    pub fn reset(&mut self) {
        self.clear();
        self.drag_origin = None;
    }
}
