//! Block records, faces, and cursor hits.

use glam::{DVec3, IVec3};
use tactile_geometry::{Aabb, merge_shapes};

use crate::catalog::StateId;

/// Integer block coordinate.
pub type BlockPos = IVec3;

/// Whether a block has any collision volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundingBox {
    /// Solid or partially solid block.
    Block,
    /// No collision volume (air, grass, flowers, fluids).
    Empty,
}

/// A block as stored in the world model.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// World position.
    pub position: BlockPos,
    /// Catalog name (e.g. `"stone"`, `"oak_slab"`).
    pub name: String,
    /// Full block state id.
    pub state_id: StateId,
    /// Collision classification.
    pub bounding_box: BoundingBox,
    /// Collision shapes in block-local coordinates.
    pub shapes: Vec<Aabb>,
    /// Extra outline-only shapes (e.g. the selectable part of a torch).
    pub interaction_shapes: Vec<Aabb>,
}

impl Block {
    /// Creates a full solid cube block.
    pub fn solid(position: BlockPos, name: impl Into<String>, state_id: StateId) -> Self {
        Self {
            position,
            name: name.into(),
            state_id,
            bounding_box: BoundingBox::Block,
            shapes: vec![Aabb::UNIT],
            interaction_shapes: Vec::new(),
        }
    }

    /// Creates an air block.
    pub fn air(position: BlockPos) -> Self {
        Self {
            position,
            name: "air".to_string(),
            state_id: StateId::AIR,
            bounding_box: BoundingBox::Empty,
            shapes: Vec::new(),
            interaction_shapes: Vec::new(),
        }
    }

    /// All shapes the cursor outline should cover (collision + interaction).
    pub fn cursor_shapes(&self) -> Vec<Aabb> {
        self.shapes
            .iter()
            .chain(self.interaction_shapes.iter())
            .copied()
            .collect()
    }

    /// Single box enclosing every cursor shape, or `None` if there are none.
    pub fn merged_cursor_shape(&self) -> Option<Aabb> {
        merge_shapes(&self.cursor_shapes())
    }
}

/// Result of the host's block raycast: the block under the cursor plus where
/// and on which face the ray entered it.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockHit {
    /// The block that was hit.
    pub block: Block,
    /// Face the ray entered through.
    pub face: Face,
    /// World-space point where the ray hit the block.
    pub intersect: DVec3,
}

impl BlockHit {
    /// Position of the hit block.
    pub fn position(&self) -> BlockPos {
        self.block.position
    }

    /// Cursor position relative to the block's minimum corner
    /// (each component nominally in `0.0..=1.0`).
    pub fn cursor_offset(&self) -> DVec3 {
        self.intersect - self.block.position.as_dvec3()
    }
}

/// Block axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Block state property value for this axis.
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// One of the six block faces, in protocol order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl Face {
    /// All faces in protocol order.
    pub const ALL: [Face; 6] = [
        Face::Down,
        Face::Up,
        Face::North,
        Face::South,
        Face::West,
        Face::East,
    ];

    /// Looks up a face by its protocol index `0..=5`.
    pub fn from_index(index: u8) -> Option<Face> {
        Self::ALL.get(index as usize).copied()
    }

    /// Protocol index of this face.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Unit offset from a block to its neighbour across this face.
    pub fn offset(self) -> IVec3 {
        match self {
            Face::Down => IVec3::new(0, -1, 0),
            Face::Up => IVec3::new(0, 1, 0),
            Face::North => IVec3::new(0, 0, -1),
            Face::South => IVec3::new(0, 0, 1),
            Face::West => IVec3::new(-1, 0, 0),
            Face::East => IVec3::new(1, 0, 0),
        }
    }

    /// Axis a block placed against this face is aligned to.
    pub fn axis(self) -> Axis {
        match self {
            Face::Down | Face::Up => Axis::Y,
            Face::North | Face::South => Axis::Z,
            Face::West | Face::East => Axis::X,
        }
    }

    /// `facing` property value requested when placing against this face.
    ///
    /// Downstream state selection depends on this exact table.
    pub fn facing_label(self) -> &'static str {
        match self {
            Face::Down => "south",
            Face::Up => "west",
            Face::North => "north",
            Face::South => "east",
            Face::West => "up",
            Face::East => "down",
        }
    }

    /// Maps a direction vector back to a face. Y wins over Z, Z over X.
    pub fn from_vector(v: IVec3) -> Option<Face> {
        if v.y < 0 {
            Some(Face::Down)
        } else if v.y > 0 {
            Some(Face::Up)
        } else if v.z < 0 {
            Some(Face::North)
        } else if v.z > 0 {
            Some(Face::South)
        } else if v.x < 0 {
            Some(Face::West)
        } else if v.x > 0 {
            Some(Face::East)
        } else {
            None
        }
    }
}
