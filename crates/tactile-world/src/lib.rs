//! Shared world model for the interaction engine: block and entity records, the
//! read-only block catalog, static classification tables, and the world access
//! boundary the host implements.

pub mod access;
pub mod block;
pub mod catalog;
pub mod classify;
pub mod entity;
pub mod player;
pub mod raycast;

pub use access::WorldAccess;
pub use block::{Axis, Block, BlockHit, BlockPos, BoundingBox, Face};
pub use catalog::{
    BlockCatalog, BlockDescriptor, CatalogError, ShapeRule, StateId, StateProperty, StaticCatalog,
};
pub use classify::{
    ACTIVATABLE_BLOCK_PATTERNS, ClassifyError, Classifier, DefaultClassifier, NamePattern,
    item_block_name,
};
pub use entity::{EntityId, EntitySnapshot};
pub use player::{GameMode, Hand, HeldSlot, ItemStack, OFFHAND_SLOT, PlayerView};
pub use raycast::raycast_blocks;
