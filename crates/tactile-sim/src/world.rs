//! In-memory host: a sparse block grid, a handful of entities and a manual clock.

use std::time::Duration;

use glam::{DVec3, IVec3};
use rustc_hash::FxHashMap;
use tactile_geometry::view_direction;
use tactile_interaction::{HostFeature, InteractionHost};
use tactile_world::{
    Block, BlockCatalog, BlockHit, BlockPos, BoundingBox, CatalogError, Classifier,
    DefaultClassifier, EntitySnapshot, PlayerView, ShapeRule, StateId, StateProperty,
    StaticCatalog, WorldAccess, raycast_blocks,
};

/// Blocks the simulated catalog knows about.
pub fn build_catalog() -> Result<StaticCatalog, CatalogError> {
    let mut catalog = StaticCatalog::new();
    catalog.register("stone", vec![], &[], ShapeRule::Full)?;
    catalog.register("dirt", vec![], &[], ShapeRule::Full)?;
    catalog.register("bedrock", vec![], &[], ShapeRule::Full)?;
    catalog.register("short_grass", vec![], &[], ShapeRule::Empty)?;
    catalog.register(
        "oak_slab",
        vec![
            StateProperty::new("type", &["top", "bottom", "double"]),
            StateProperty::new("waterlogged", &["true", "false"]),
        ],
        &["bottom", "false"],
        ShapeRule::Slab,
    )?;
    catalog.register(
        "oak_log",
        vec![StateProperty::new("axis", &["x", "y", "z"])],
        &["y"],
        ShapeRule::Full,
    )?;
    catalog.register(
        "red_bed",
        vec![],
        &[],
        ShapeRule::Fixed(vec![[0.0, 0.0, 0.0, 1.0, 0.5625, 1.0]]),
    )?;
    Ok(catalog)
}

pub struct SimWorld {
    now: Duration,
    pub player: PlayerView,
    pub entities: Vec<EntitySnapshot>,
    blocks: FxHashMap<BlockPos, Block>,
    catalog: StaticCatalog,
    classifier: DefaultClassifier,
    /// Break time of every diggable block.
    pub dig_time: Duration,
    pub features: Vec<HostFeature>,
}

impl SimWorld {
    pub fn new(player: PlayerView, catalog: StaticCatalog) -> Self {
        Self {
            now: Duration::ZERO,
            player,
            entities: Vec::new(),
            blocks: FxHashMap::default(),
            catalog,
            classifier: DefaultClassifier::new(),
            dig_time: Duration::from_millis(750),
            features: Vec::new(),
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Time elapsed on the session clock since `since`.
    pub fn now_elapsed(&self, since: Duration) -> Duration {
        self.now.saturating_sub(since)
    }

    /// Places the default state of `name` at `pos`. Unknown names are ignored.
    pub fn place(&mut self, pos: IVec3, name: &str) {
        if let Some(state) = self.catalog.block_by_name(name).map(|d| d.default_state) {
            self.set_block_state_id(pos, state);
        } else {
            tracing::warn!(name, "unknown block");
        }
    }

    pub fn block(&self, pos: BlockPos) -> Option<&Block> {
        self.blocks.get(&pos)
    }

    /// Removes the block at `pos`, returning it.
    pub fn remove(&mut self, pos: BlockPos) -> Option<Block> {
        self.blocks.remove(&pos)
    }

    /// Removes every block inside the inclusive box `min..=max`.
    pub fn clear_region(&mut self, min: IVec3, max: IVec3) {
        self.blocks.retain(|pos, _| pos.cmplt(min).any() || pos.cmpgt(max).any());
    }

    fn eye(&self) -> DVec3 {
        let height = if self.player.sneaking { 1.27 } else { 1.62 };
        self.player.position + DVec3::new(0.0, height, 0.0)
    }
}

impl WorldAccess for SimWorld {
    fn block_at_cursor(&self, max_distance: f64) -> Option<BlockHit> {
        let dir = view_direction(self.player.yaw, self.player.pitch);
        raycast_blocks(self.eye(), dir, max_distance, |pos| self.blocks.get(&pos).cloned())
    }

    fn can_dig(&self, block: &Block) -> bool {
        block.name != "bedrock"
    }

    fn block_state_id(&self, pos: BlockPos) -> StateId {
        self.blocks.get(&pos).map_or(StateId::AIR, |b| b.state_id)
    }

    fn set_block_state_id(&mut self, pos: BlockPos, state: StateId) {
        let Some(desc) = self.catalog.block_by_state(state).filter(|_| !state.is_air()) else {
            self.blocks.remove(&pos);
            return;
        };
        let shapes = desc.collision_shapes(state);
        let block = Block {
            position: pos,
            name: desc.name.clone(),
            state_id: state,
            bounding_box: if shapes.is_empty() {
                BoundingBox::Empty
            } else {
                BoundingBox::Block
            },
            interaction_shapes: if shapes.is_empty() {
                vec![tactile_geometry::Aabb::from_shape([0.1, 0.0, 0.1, 0.9, 0.8, 0.9])]
            } else {
                Vec::new()
            },
            shapes,
        };
        self.blocks.insert(pos, block);
    }

    fn set_block(&mut self, block: &Block) {
        if block.state_id.is_air() {
            self.blocks.remove(&block.position);
        } else {
            self.blocks.insert(block.position, block.clone());
        }
    }
}

impl InteractionHost for SimWorld {
    fn now(&self) -> Duration {
        self.now
    }

    fn player(&self) -> Option<&PlayerView> {
        Some(&self.player)
    }

    fn entities(&self) -> &[EntitySnapshot] {
        &self.entities
    }

    fn dig_time(&self, _block: &Block) -> Duration {
        self.dig_time
    }

    fn supports_feature(&self, feature: HostFeature) -> bool {
        self.features.contains(&feature)
    }

    fn catalog(&self) -> &dyn BlockCatalog {
        &self.catalog
    }

    fn classifier(&self) -> &dyn Classifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactile_world::{Face, GameMode};

    fn player() -> PlayerView {
        PlayerView {
            id: tactile_world::EntityId(1),
            position: DVec3::new(0.5, 0.0, 0.5),
            yaw: 0.0,
            pitch: 0.0,
            on_ground: true,
            sneaking: false,
            game_mode: GameMode::Survival,
            held_item: None,
            offhand_item: None,
            quick_bar_slot: 0,
        }
    }

    #[test]
    fn test_cursor_hits_wall_in_front() {
        let mut world = SimWorld::new(player(), build_catalog().unwrap());
        world.place(IVec3::new(0, 1, -2), "stone");
        let hit = world.block_at_cursor(5.0).unwrap();
        assert_eq!(hit.position(), IVec3::new(0, 1, -2));
        assert_eq!(hit.face, Face::South);
    }

    #[test]
    fn test_air_state_removes_block() {
        let mut world = SimWorld::new(player(), build_catalog().unwrap());
        world.place(IVec3::ZERO, "dirt");
        assert!(world.block(IVec3::ZERO).is_some());
        world.set_block_state_id(IVec3::ZERO, StateId::AIR);
        assert!(world.block(IVec3::ZERO).is_none());
    }

    #[test]
    fn test_slab_state_gets_half_shape() {
        let mut world = SimWorld::new(player(), build_catalog().unwrap());
        world.place(IVec3::ZERO, "oak_slab");
        let slab = world.block(IVec3::ZERO).unwrap();
        assert_eq!(slab.shapes.len(), 1);
        assert_eq!(slab.shapes[0].max.y, 0.5);
    }
}
