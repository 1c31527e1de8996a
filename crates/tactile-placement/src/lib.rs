//! Block placement prediction.
//!
//! Given the held item and the clicked face of a reference block, computes the
//! exact block state the server is expected to place so the client can show
//! it immediately. The prediction can be vetoed by an entity standing in the
//! way or by a user-supplied [`PlacementOverride`].

mod predict;
mod properties;

pub use predict::{
    OverrideDecision, PlacementContext, PlacementOutcome, PlacementOverride, PlacementPrediction,
    PlacementRequest, colliding_entity, compute_placement, is_block_place_action,
    predict_placement, target_position,
};
pub use properties::{Half, PropertyRequest, placement_requests, resolve_state};
