//! Picking faces and facelets with rays.

use cgmath::{EuclideanSpace, InnerSpace, Point2, Point3, Vector3};

use crate::{Face, GridPos, HALF_EXTENT, SurfaceError};

/// Ray in cube-local coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Point3<f32>,
    /// Unit direction of the ray.
    pub direction: Vector3<f32>,
}
impl Ray {
    /// Constructs a ray, normalizing its direction.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Result<Self, SurfaceError> {
        let len = direction.magnitude();
        let finite = |v: [f32; 3]| v.iter().all(|x| x.is_finite());
        if !finite(origin.into()) || !finite(direction.into()) || !(len > 0.0) {
            return Err(SurfaceError::MalformedRay);
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Returns the point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Returns where the ray crosses the plane containing `face`, even outside
    /// the face itself. Returns `None` if the ray is parallel to the plane or
    /// crosses it behind the origin.
    pub fn intersect_face_plane(&self, face: Face) -> Option<Point3<f32>> {
        let n = face.normal();
        let denom = self.direction.dot(n);
        if denom.abs() < crate::EPSILON {
            return None;
        }
        let t = (HALF_EXTENT - self.origin.to_vec().dot(n)) / denom;
        (t >= 0.0).then(|| self.at(t))
    }
}

/// One sticker cell: a face of a piece on the surface of the cube.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Facelet {
    /// Face the sticker is on.
    pub face: Face,
    /// Grid position of the piece the sticker is attached to.
    pub pos: GridPos,
}
impl Facelet {
    /// Returns the center of the sticker.
    pub fn center(self) -> Point3<f32> {
        self.pos.point() + self.face.normal() * 0.5
    }
}

/// Point where a ray hits the surface of the cube.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceHit {
    /// Face that was hit.
    pub face: Face,
    /// Point on the surface, in cube-local coordinates.
    pub point: Point3<f32>,
    /// Outward normal of the face.
    pub normal: Vector3<f32>,
    /// Point within the face, in the face's own right/up frame, with each
    /// coordinate from `-HALF_EXTENT` to `HALF_EXTENT`.
    pub local: Point2<f32>,
    /// Distance along the ray.
    pub distance: f32,
}
impl SurfaceHit {
    /// Returns the facelet that was hit.
    pub fn facelet(&self) -> Facelet {
        Facelet {
            face: self.face,
            pos: GridPos::round_clamped(self.point - self.normal * 0.5),
        }
    }
}

/// Returns the point on `face` in the face's right/up frame.
pub fn face_local(face: Face, point: Point3<f32>) -> Point2<f32> {
    let v = point.to_vec();
    Point2::new(v.dot(face.right()), v.dot(face.up()))
}

/// Intersects a ray with the surface of the cube.
///
/// Returns `Ok(None)` if the ray misses.
pub fn resolve(ray: &Ray) -> Result<Option<SurfaceHit>, SurfaceError> {
    let ray = Ray::new(ray.origin, ray.direction)?;

    // Slab test against the bounding box.
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for i in 0..3 {
        let o = ray.origin[i];
        let d = ray.direction[i];
        if d == 0.0 {
            if o.abs() > HALF_EXTENT {
                return Ok(None);
            }
            continue;
        }
        let t1 = (-HALF_EXTENT - o) / d;
        let t2 = (HALF_EXTENT - o) / d;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
    }
    if t_exit < t_enter || t_exit < 0.0 {
        return Ok(None);
    }
    // If the origin is inside the cube, report where the ray leaves it.
    let t = if t_enter >= 0.0 { t_enter } else { t_exit };
    let point = ray.at(t);

    let Some(face) = Face::dominant(point.to_vec(), None) else {
        return Ok(None);
    };
    log::trace!("ray hit {face} at {point:?}");
    Ok(Some(SurfaceHit {
        face,
        point,
        normal: face.normal(),
        local: face_local(face, point),
        distance: t,
    }))
}

/// Turns screen positions into rays in cube-local coordinates.
pub trait RayCaster {
    /// Returns the ray through a screen position, or `None` if the position is
    /// outside the viewport.
    fn ray_through(&self, screen: Point2<f32>) -> Option<Ray>;
}

/// Orthographic camera looking at the cube from a fixed direction.
///
/// Screen coordinates are centered on the cube, with +X right and +Y up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthographicCamera {
    /// Unit direction the camera looks in.
    pub forward: Vector3<f32>,
    /// Unit screen-up direction, perpendicular to `forward`.
    pub up: Vector3<f32>,
    /// Cube-local units per screen unit.
    pub scale: f32,
}
impl OrthographicCamera {
    /// Distance from the center of the cube to the plane rays start from.
    const DISTANCE: f32 = 10.0;

    /// Constructs a camera looking in `forward`, with `up` projected to be
    /// perpendicular to it.
    ///
    /// Returns `None` if `forward` is zero or non-finite, if `up` is parallel
    /// to it, or if `scale` is not a positive finite number.
    pub fn new(forward: Vector3<f32>, up: Vector3<f32>, scale: f32) -> Option<Self> {
        if !(scale > 0.0 && scale.is_finite()) {
            return None;
        }
        let forward = forward.normalize();
        if !(forward.x.is_finite() && forward.y.is_finite() && forward.z.is_finite()) {
            return None;
        }
        let up = up - forward * up.dot(forward);
        let up_len = up.magnitude();
        if !(up_len > crate::EPSILON) {
            return None;
        }
        Some(Self {
            forward,
            up: up / up_len,
            scale,
        })
    }
    /// Constructs a camera looking straight at a face, with one screen unit
    /// equal to one piece.
    pub fn facing(face: Face) -> Self {
        Self {
            forward: -face.normal(),
            up: face.up(),
            scale: 1.0,
        }
    }

    /// Returns the screen-right direction.
    pub fn right(&self) -> Vector3<f32> {
        self.forward.cross(self.up)
    }
}
impl RayCaster for OrthographicCamera {
    fn ray_through(&self, screen: Point2<f32>) -> Option<Ray> {
        let offset = self.right() * screen.x * self.scale + self.up * screen.y * self.scale;
        let origin = Point3::origin() - self.forward * Self::DISTANCE + offset;
        Ray::new(origin, self.forward).ok()
    }
}
