//! Dynamic object records.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tactile_geometry::Aabb;

/// Protocol entity identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub i32);

/// Snapshot of a tracked dynamic object as seen by the local client.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Protocol id.
    pub id: EntityId,
    /// Entity type name; `None` if the host never learned it.
    pub name: Option<String>,
    /// Feet position.
    pub position: DVec3,
    /// Hit box width (0 when unknown).
    pub width: f64,
    /// Hit box height (0 when unknown).
    pub height: f64,
    /// Type-specific client flag byte (armor stand marker/small/arms bits).
    pub client_flags: u8,
}

impl EntitySnapshot {
    /// Hit box around the entity's feet position, or `None` if the size is unknown.
    pub fn bounding_box(&self) -> Option<Aabb> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Aabb::entity_box(self.position, self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_size_has_no_box() {
        let e = EntitySnapshot {
            id: EntityId(3),
            name: Some("item".into()),
            position: DVec3::ZERO,
            width: 0.0,
            height: 0.25,
            client_flags: 0,
        };
        assert!(e.bounding_box().is_none());
    }
}
