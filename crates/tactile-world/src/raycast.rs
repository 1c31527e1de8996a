//! Block raycasting using the DDA (Amanatides & Woo) algorithm.
//!
//! Hosts that keep their own block grid can use [`raycast_blocks`] to answer
//! [`WorldAccess::block_at_cursor`](crate::WorldAccess::block_at_cursor).

use glam::{DVec3, IVec3};

use crate::block::{Block, BlockHit, Face};

/// Casts a ray from `origin` along `direction` and returns the first block
/// with any cursor shape, skipping the block the ray starts in.
///
/// `lookup` returns the block at a grid position, or `None` for air/unloaded.
pub fn raycast_blocks(
    origin: DVec3,
    direction: DVec3,
    max_distance: f64,
    lookup: impl Fn(IVec3) -> Option<Block>,
) -> Option<BlockHit> {
    let dir = direction.normalize_or_zero();
    if dir == DVec3::ZERO {
        return None;
    }

    let mut voxel = origin.floor().as_ivec3();
    let sub = origin - voxel.as_dvec3();

    // Step direction per axis: +1 or -1.
    let step = IVec3::new(
        if dir.x >= 0.0 { 1 } else { -1 },
        if dir.y >= 0.0 { 1 } else { -1 },
        if dir.z >= 0.0 { 1 } else { -1 },
    );

    // Distance in t-units to cross one full block on each axis.
    let t_delta = DVec3::new(
        safe_inv(dir.x.abs()),
        safe_inv(dir.y.abs()),
        safe_inv(dir.z.abs()),
    );

    // Distance in t-units to the first block boundary on each axis.
    let mut t_max = DVec3::new(
        initial_t_max(sub.x, dir.x, t_delta.x),
        initial_t_max(sub.y, dir.y, t_delta.y),
        initial_t_max(sub.z, dir.z, t_delta.z),
    );

    loop {
        // Advance along the axis with the smallest t_max.
        let (t, normal) = if t_max.x < t_max.y && t_max.x < t_max.z {
            let t = t_max.x;
            t_max.x += t_delta.x;
            voxel.x += step.x;
            (t, IVec3::new(-step.x, 0, 0))
        } else if t_max.y < t_max.z {
            let t = t_max.y;
            t_max.y += t_delta.y;
            voxel.y += step.y;
            (t, IVec3::new(0, -step.y, 0))
        } else {
            let t = t_max.z;
            t_max.z += t_delta.z;
            voxel.z += step.z;
            (t, IVec3::new(0, 0, -step.z))
        };

        if t > max_distance {
            return None;
        }

        if let Some(block) = lookup(voxel)
            && !block.cursor_shapes().is_empty()
        {
            let face = Face::from_vector(normal)?;
            return Some(BlockHit {
                block,
                face,
                intersect: origin + dir * t,
            });
        }
    }
}

/// Safely compute 1.0 / x, clamping to `f64::MAX` when x ≈ 0.
fn safe_inv(x: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        f64::MAX
    } else {
        1.0 / x
    }
}

/// Compute the initial parametric distance to the first block boundary.
fn initial_t_max(sub: f64, dir_component: f64, t_delta: f64) -> f64 {
    if dir_component > 0.0 {
        (1.0 - sub) * t_delta
    } else if dir_component < 0.0 {
        sub * t_delta
    } else {
        f64::MAX
    }
}
