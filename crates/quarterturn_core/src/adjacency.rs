//! Classifying how two facelets relate.

use cgmath::{EuclideanSpace, InnerSpace, Point3};
use quarterturn_prefs::AdjacencyPreferences;
use serde::{Deserialize, Serialize};

use crate::{Axis, Face, Facelet, GridPos};

/// How close two facelets are.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    /// Neighbors that lie in a common layer. A drag from one to the other
    /// defines a twist.
    Adjacent,
    /// Close, but not in a common layer. Not rotatable.
    Diagonal,
    /// Too far apart to relate.
    NonAdjacent,
}

/// Slice of nine pieces perpendicular to an axis.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Layer {
    /// Axis perpendicular to the layer.
    pub axis: Axis,
    /// Coordinate of every piece in the layer along `axis`.
    pub coordinate: i8,
}
impl Layer {
    /// Returns whether a piece at `pos` is in the layer.
    pub fn contains(self, pos: GridPos) -> bool {
        pos[self.axis] == self.coordinate
    }
    /// Returns the face that twists this layer, or `None` for a middle slice.
    pub fn face(self) -> Option<Face> {
        Some(Face::new(self.axis, crate::Sign::of(self.coordinate as f32)?))
    }
}

/// Result of classifying two facelets.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Classification {
    /// How close the facelets are.
    pub relationship: Relationship,
    /// Layer that a drag between the facelets would twist. This is only
    /// present for adjacent facelets.
    pub shared_layer: Option<Layer>,
}

/// Classifies two facelets by the distance between their centers.
///
/// Returns `None` if the facelets are on opposite faces, which never share a
/// piece, or if they are the same facelet. The result is symmetric.
pub fn classify(a: Facelet, b: Facelet, prefs: &AdjacencyPreferences) -> Option<Classification> {
    if a == b || a.face == b.face.opposite() {
        return None;
    }
    let distance = (b.center() - a.center()).magnitude();

    let relationship = if distance < prefs.adjacency_threshold {
        match shared_layer(a, b) {
            Some(layer) => {
                return Some(Classification {
                    relationship: Relationship::Adjacent,
                    shared_layer: Some(layer),
                });
            }
            None => Relationship::Diagonal,
        }
    } else if distance < prefs.diagonal_threshold {
        Relationship::Diagonal
    } else {
        Relationship::NonAdjacent
    };

    Some(Classification {
        relationship,
        shared_layer: None,
    })
}

/// Classifies two faces by the facelets on either side of their common edge.
///
/// Returns `None` if the faces are identical or opposite.
pub fn classify_faces(a: Face, b: Face, prefs: &AdjacencyPreferences) -> Option<Classification> {
    if !a.is_adjacent_to(b) {
        return None;
    }
    let pos = GridPos::round_clamped(Point3::from_vec(a.normal() + b.normal()));
    classify(Facelet { face: a, pos }, Facelet { face: b, pos }, prefs)
}

/// Returns the layer containing both facelets, perpendicular to the direction
/// of travel from one to the other.
fn shared_layer(a: Facelet, b: Facelet) -> Option<Layer> {
    // Moving from `a` toward `b` along the surface turns around this axis.
    // Swapping `a` and `b` flips its sign but not which axis dominates.
    let travel = b.center() - a.center();
    let axis = Axis::dominant(a.face.normal().cross(travel), None)?;
    let coordinate = a.pos[axis];
    (coordinate == b.pos[axis]).then_some(Layer { axis, coordinate })
}
