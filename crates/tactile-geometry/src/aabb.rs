use glam::DVec3;

/// Axis-aligned bounding box in world (block) units.
///
/// Invariant: min.x <= max.x, min.y <= max.y, min.z <= max.z.
/// The constructor enforces this by swapping components if needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

/// Center and extents of a box, the form block highlight and hit-box
/// consumers want.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxData {
    /// Center of the box.
    pub position: DVec3,
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub height: f64,
    /// Extent along Z.
    pub depth: f64,
}

impl Aabb {
    /// A unit cube spanning `[0, 1]` on every axis.
    pub const UNIT: Aabb = Aabb {
        min: DVec3::ZERO,
        max: DVec3::ONE,
    };

    /// Create an AABB from two corners. Automatically sorts
    /// components so that min <= max on every axis.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB from a center point and half-extents.
    pub fn from_center_half_extents(center: DVec3, half: DVec3) -> Self {
        Self::new(center - half, center + half)
    }

    /// Create an AABB from a `[min_x, min_y, min_z, max_x, max_y, max_z]` shape array,
    /// the layout block collision shapes are stored in.
    pub fn from_shape(shape: [f64; 6]) -> Self {
        Self::new(
            DVec3::new(shape[0], shape[1], shape[2]),
            DVec3::new(shape[3], shape[4], shape[5]),
        )
    }

    /// Returns the `[min_x, min_y, min_z, max_x, max_y, max_z]` form of this box.
    pub fn to_shape(&self) -> [f64; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }

    /// Hit box of a dynamic object standing at `feet`: `width / 2` horizontal
    /// half-extent around the footprint, `height` upward from the feet.
    pub fn entity_box(feet: DVec3, width: f64, height: f64) -> Self {
        let w = width / 2.0;
        Self::new(
            DVec3::new(feet.x - w, feet.y, feet.z - w),
            DVec3::new(feet.x + w, feet.y + height, feet.z + w),
        )
    }

    /// Returns this box moved by `offset`.
    pub fn translate(&self, offset: DVec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains_point(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Returns true if the two boxes share interior volume.
    ///
    /// Boxes that only touch along a face or edge do not intersect, so an
    /// object standing on top of a block never overlaps it.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Returns the smallest AABB enclosing both self and other.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Returns the center point of the AABB.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size along each axis.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Center plus width/height/depth of the box.
    pub fn box_data(&self) -> BoxData {
        let size = self.size();
        BoxData {
            position: self.center(),
            width: size.x,
            height: size.y,
            depth: size.z,
        }
    }

    /// Returns true if the AABB has zero volume
    /// (degenerate on at least one axis).
    pub fn is_degenerate(&self) -> bool {
        self.min.x == self.max.x || self.min.y == self.max.y || self.min.z == self.max.z
    }
}

/// Merges a set of shapes into the single box enclosing all of them.
///
/// Returns `None` for an empty set (e.g. air, which has no cursor shape).
pub fn merge_shapes(shapes: &[Aabb]) -> Option<Aabb> {
    let (first, rest) = shapes.split_first()?;
    Some(rest.iter().fold(*first, |acc, cur| acc.union(cur)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64, z: f64) -> DVec3 {
        DVec3::new(x, y, z)
    }

    #[test]
    fn test_constructor_auto_sorts() {
        let aabb = Aabb::new(v(1.0, 1.0, 1.0), v(0.0, 0.0, 0.0));
        assert_eq!(aabb.min, DVec3::ZERO);
        assert_eq!(aabb.max, DVec3::ONE);
    }

    #[test]
    fn test_contains_point_on_edge() {
        assert!(Aabb::UNIT.contains_point(DVec3::ZERO));
        assert!(Aabb::UNIT.contains_point(v(1.0, 0.5, 0.5)));
        assert!(!Aabb::UNIT.contains_point(v(1.1, 0.5, 0.5)));
    }

    #[test]
    fn test_intersects_overlapping() {
        let a = Aabb::new(v(0.0, 0.0, 0.0), v(1.0, 1.0, 1.0));
        let b = Aabb::new(v(0.5, 0.5, 0.5), v(1.5, 1.5, 1.5));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a)); // symmetric
    }

    #[test]
    fn test_intersects_disjoint() {
        let a = Aabb::UNIT;
        let b = Aabb::UNIT.translate(v(3.0, 0.0, 0.0));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_touching_faces_do_not_intersect() {
        let block = Aabb::UNIT;
        // Player standing exactly on top of the block.
        let player = Aabb::entity_box(v(0.5, 1.0, 0.5), 0.6, 1.8);
        assert!(!block.intersects(&player));
        let sunk = Aabb::entity_box(v(0.5, 0.99, 0.5), 0.6, 1.8);
        assert!(block.intersects(&sunk));
    }

    #[test]
    fn test_entity_box_extents() {
        let b = Aabb::entity_box(v(10.0, 64.0, -3.0), 0.6, 1.8);
        assert!((b.min.x - 9.7).abs() < 1e-9);
        assert!((b.max.z - -2.7).abs() < 1e-9);
        assert_eq!(b.min.y, 64.0);
        assert!((b.max.y - 65.8).abs() < 1e-9);
    }

    #[test]
    fn test_shape_roundtrip_layout() {
        let slab = Aabb::from_shape([0.0, 0.0, 0.0, 1.0, 0.5, 1.0]);
        assert_eq!(slab.to_shape(), [0.0, 0.0, 0.0, 1.0, 0.5, 1.0]);
    }

    #[test]
    fn test_box_data_from_shape() {
        let slab = Aabb::from_shape([0.0, 0.5, 0.0, 1.0, 1.0, 1.0]);
        let data = slab.box_data();
        assert_eq!(data.position, v(0.5, 0.75, 0.5));
        assert_eq!(data.width, 1.0);
        assert_eq!(data.height, 0.5);
        assert_eq!(data.depth, 1.0);
    }

    #[test]
    fn test_merge_shapes_encloses_all() {
        // Fence-like post plus an arm.
        let post = Aabb::from_shape([0.375, 0.0, 0.375, 0.625, 1.5, 0.625]);
        let arm = Aabb::from_shape([0.4375, 0.375, 0.0, 0.5625, 0.9375, 0.375]);
        let merged = merge_shapes(&[post, arm]).unwrap();
        assert_eq!(merged.to_shape(), [0.375, 0.0, 0.0, 0.625, 1.5, 0.625]);
    }

    #[test]
    fn test_merge_shapes_empty() {
        assert!(merge_shapes(&[]).is_none());
    }

    #[test]
    fn test_is_degenerate() {
        assert!(!Aabb::UNIT.is_degenerate());
        assert!(Aabb::new(v(0.0, 0.0, 0.0), v(1.0, 0.0, 1.0)).is_degenerate());
    }
}
