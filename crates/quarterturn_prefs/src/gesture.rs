use serde::{Deserialize, Serialize};

/// Thresholds for tracking a pointer drag.
///
/// Distances are in cube-local units, where one piece is one unit wide and a
/// whole face is three units wide.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GesturePreferences {
    /// Seconds without an update after which a selection is discarded.
    pub validity_timeout: f32,
    /// Minimum movement since the last accepted update for a new update to be
    /// accepted.
    pub hysteresis_threshold: f32,
    /// Drag distance required before a twist can be issued.
    pub minimum_drag_distance: f32,
    /// Drag distance beyond which the gesture can no longer twist.
    pub maximum_drag_distance: f32,
    /// Maximum number of simultaneous pointer contacts.
    pub max_contacts: usize,
}
impl Default for GesturePreferences {
    fn default() -> Self {
        crate::DEFAULT_PREFS.gesture.clone()
    }
}

/// Distance thresholds for classifying two facelets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdjacencyPreferences {
    /// Facelet centers closer than this are adjacent.
    pub adjacency_threshold: f32,
    /// Facelet centers closer than this (but not adjacent) are diagonal.
    pub diagonal_threshold: f32,
}
impl Default for AdjacencyPreferences {
    fn default() -> Self {
        crate::DEFAULT_PREFS.adjacency.clone()
    }
}

/// Guards for deriving a twist direction from a drag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DirectionPreferences {
    /// Smallest accepted angle (in degrees) between the vectors whose cross
    /// product defines the rotation.
    pub minimum_torque_angle: f32,
    /// Largest accepted angle (in degrees) between the vectors whose cross
    /// product defines the rotation.
    pub maximum_torque_angle: f32,
    /// Whether the twist direction depends on where the face was gripped, so
    /// that dragging the bottom row to the right twists counterclockwise.
    /// Otherwise only the face being dragged toward matters.
    pub grip_sensitive: bool,
    /// With `grip_sensitive`, grip points closer than this to the center of a
    /// face use the face's "up" direction as their lever arm.
    pub center_grip_radius: f32,
}
impl Default for DirectionPreferences {
    fn default() -> Self {
        crate::DEFAULT_PREFS.direction.clone()
    }
}
