//! Speculative placement: what block the server will put where, before it says so.

use std::sync::Arc;

use glam::DVec3;
use tactile_geometry::Aabb;
use tactile_world::{
    Block, BlockCatalog, BlockPos, BoundingBox, Classifier, EntityId, EntitySnapshot, Face,
    GameMode, ItemStack, StateId, item_block_name,
};

use crate::properties::{placement_requests, resolve_state};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inputs of a single placement prediction.
#[derive(Clone, Copy, Debug)]
pub struct PlacementRequest<'a> {
    /// Item in the placing hand.
    pub item: &'a ItemStack,
    /// Block that was clicked.
    pub reference: &'a Block,
    /// Face of the reference block that was clicked.
    pub face: Face,
    /// Cursor position within the reference block.
    pub cursor_offset: DVec3,
    /// Local player's game mode.
    pub game_mode: GameMode,
    /// Sneak control held.
    pub sneaking: bool,
}

/// A fully computed block the server is expected to place.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementPrediction {
    /// World position of the new block.
    pub position: BlockPos,
    /// Catalog name of the placed block.
    pub block_name: String,
    /// Resolved state id.
    pub state_id: StateId,
    /// Collision shapes in world coordinates.
    pub shapes: Vec<Aabb>,
}

/// Result of [`predict_placement`].
#[derive(Clone, Debug, PartialEq)]
pub enum PlacementOutcome {
    /// The click interacts with the reference block instead of placing.
    NotPlacement,
    /// The held item does not name a block.
    UnknownBlock,
    /// The block would overlap a tracked entity.
    BlockedByEntity(EntityId),
    /// The override hook vetoed the placement.
    Cancelled,
    /// Placement predicted; safe to write into the local world.
    Predicted(PlacementPrediction),
}

/// Decision returned by a [`PlacementOverride`].
#[derive(Clone, Debug, PartialEq)]
pub enum OverrideDecision {
    /// Keep the computed block.
    Accept,
    /// Do not predict this placement.
    Cancel,
    /// Predict a different block instead. The replacement is checked against
    /// entities like the computed block.
    Replace(PlacementPrediction),
}

/// Hook that reviews every computed placement before it is committed.
pub trait PlacementOverride {
    fn review(
        &self,
        request: &PlacementRequest<'_>,
        prediction: &PlacementPrediction,
    ) -> OverrideDecision;
}

impl<F> PlacementOverride for F
where
    F: Fn(&PlacementRequest<'_>, &PlacementPrediction) -> OverrideDecision,
{
    fn review(
        &self,
        request: &PlacementRequest<'_>,
        prediction: &PlacementPrediction,
    ) -> OverrideDecision {
        self(request, prediction)
    }
}

/// Read-only collaborators of a prediction.
#[derive(Clone, Copy)]
pub struct PlacementContext<'a> {
    pub catalog: &'a dyn BlockCatalog,
    pub classifier: &'a dyn Classifier,
    /// Entities to test for overlap; `None` skips the collision check.
    pub entities: Option<&'a [EntitySnapshot]>,
    pub override_hook: Option<&'a Arc<dyn PlacementOverride>>,
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// Returns `true` if right-clicking `request.reference` places a block rather
/// than interacting with it.
///
/// Adventure mode only allows blocks whitelisted by the item. Otherwise
/// activatable blocks (chests, doors, ...) swallow the click unless sneaking.
pub fn is_block_place_action(request: &PlacementRequest<'_>, classifier: &dyn Classifier) -> bool {
    let name = request.reference.name.as_str();
    match request.game_mode {
        GameMode::Adventure => request.item.can_place_on(name),
        _ => request.sneaking || !classifier.is_block_activatable_without_item(name),
    }
}

/// Position the new block lands on. Non-solid reference blocks (grass, snow
/// layers) are replaced in place.
pub fn target_position(reference: &Block, face: Face) -> BlockPos {
    match reference.bounding_box {
        BoundingBox::Empty => reference.position,
        BoundingBox::Block => reference.position + face.offset(),
    }
}

/// Computes the block the held item would place, ignoring collisions and hooks.
pub fn compute_placement(
    request: &PlacementRequest<'_>,
    catalog: &dyn BlockCatalog,
) -> Option<PlacementPrediction> {
    let desc = catalog.block_by_name(item_block_name(&request.item.name))?;
    let requests = placement_requests(request.face, request.cursor_offset.y);
    let state_id = resolve_state(desc, &requests)?;
    let position = target_position(request.reference, request.face);
    let origin = position.as_dvec3();
    let shapes = desc
        .collision_shapes(state_id)
        .into_iter()
        .map(|s| s.translate(origin))
        .collect();
    Some(PlacementPrediction {
        position,
        block_name: desc.name.clone(),
        state_id,
        shapes,
    })
}

/// First entity whose hit box overlaps any of the prediction's shapes.
pub fn colliding_entity(
    prediction: &PlacementPrediction,
    entities: &[EntitySnapshot],
) -> Option<EntityId> {
    entities.iter().find_map(|entity| {
        let hit_box = entity.bounding_box()?;
        prediction
            .shapes
            .iter()
            .any(|shape| shape.intersects(&hit_box))
            .then_some(entity.id)
    })
}

/// Predicts the outcome of placing `request.item` against `request.reference`.
pub fn predict_placement(
    request: &PlacementRequest<'_>,
    ctx: PlacementContext<'_>,
) -> PlacementOutcome {
    if !is_block_place_action(request, ctx.classifier) {
        return PlacementOutcome::NotPlacement;
    }
    let Some(mut prediction) = compute_placement(request, ctx.catalog) else {
        return PlacementOutcome::UnknownBlock;
    };

    if let Some(id) = blocking_entity(&prediction, &ctx) {
        return PlacementOutcome::BlockedByEntity(id);
    }

    if let Some(hook) = ctx.override_hook {
        match hook.review(request, &prediction) {
            OverrideDecision::Accept => {}
            OverrideDecision::Cancel => return PlacementOutcome::Cancelled,
            OverrideDecision::Replace(other) => {
                // The replacement may occupy different space.
                if let Some(id) = blocking_entity(&other, &ctx) {
                    return PlacementOutcome::BlockedByEntity(id);
                }
                prediction = other;
            }
        }
    }

    PlacementOutcome::Predicted(prediction)
}

fn blocking_entity(
    prediction: &PlacementPrediction,
    ctx: &PlacementContext<'_>,
) -> Option<EntityId> {
    let id = colliding_entity(prediction, ctx.entities?)?;
    tracing::debug!(pos = ?prediction.position, entity = ?id, "placement blocked by entity");
    Some(id)
}
