//! World query/mutation boundary implemented by the host.

use crate::block::{Block, BlockHit, BlockPos};
use crate::catalog::StateId;

/// Access to the host's local world model.
///
/// Reads reflect the locally predicted state; writes are local only and are
/// never sent to the server.
pub trait WorldAccess {
    /// Block under the viewer's cursor within `max_distance`, if any.
    fn block_at_cursor(&self, max_distance: f64) -> Option<BlockHit>;

    /// Whether the local player may dig `block` at all (not bedrock, in range, ...).
    fn can_dig(&self, block: &Block) -> bool;

    /// State id at `pos` (air for unloaded positions).
    fn block_state_id(&self, pos: BlockPos) -> StateId;

    /// Overwrites the state id at `pos`.
    fn set_block_state_id(&mut self, pos: BlockPos, state: StateId);

    /// Writes a full block record back at its own position.
    fn set_block(&mut self, block: &Block);
}
