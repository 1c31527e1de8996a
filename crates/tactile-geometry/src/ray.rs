//! View rays and ray/box intersection (slab method).

use glam::DVec3;

use crate::Aabb;

/// Unit forward vector for a viewer with the given yaw and pitch (radians).
///
/// Yaw 0 looks toward -Z, positive pitch looks up.
pub fn view_direction(yaw: f64, pitch: f64) -> DVec3 {
    DVec3::new(
        -yaw.sin() * pitch.cos(),
        pitch.sin(),
        -yaw.cos() * pitch.cos(),
    )
    .normalize()
}

/// A bounded ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: DVec3,
    /// Normalized direction vector.
    pub direction: DVec3,
    /// Hits farther than this along the ray are ignored.
    pub max_distance: f64,
}

/// Result of a ray/box intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Parametric distance along the ray to the entry point.
    pub distance: f64,
    /// World-space entry point.
    pub point: DVec3,
}

impl Ray {
    /// Creates a ray; `direction` is normalized here.
    pub fn new(origin: DVec3, direction: DVec3, max_distance: f64) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            max_distance,
        }
    }

    /// Intersects the ray with `aabb`.
    ///
    /// A ray starting inside the box hits at distance 0. Returns `None` when the
    /// box is missed, lies behind the origin, or starts beyond `max_distance`.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<RayHit> {
        let mut t_min = 0.0_f64;
        let mut t_max = self.max_distance;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

            if dir.abs() < f64::EPSILON {
                // Parallel to this slab: must already be within it.
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(RayHit {
            distance: t_min,
            point: self.origin + self.direction * t_min,
        })
    }
}
