//! Axis-aligned boxes, block shape helpers, and ray intersection used by cursor targeting
//! and placement prediction.

mod aabb;
mod ray;

pub use aabb::{Aabb, BoxData, merge_shapes};
pub use ray::{Ray, RayHit, view_direction};
