//! The boundary a client implements to drive an [`InteractionController`](crate::InteractionController).

use std::time::Duration;

use tactile_world::{Block, BlockCatalog, Classifier, EntitySnapshot, PlayerView, WorldAccess};

/// Optional protocol behaviours that differ between server versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostFeature {
    /// The arm swing is sent before the entity interaction, not after.
    ArmAnimationBeforeUse,
    /// The protocol has no off-hand slot.
    NoOffhandSlot,
}

/// Everything the controller reads from the client besides its own state.
pub trait InteractionHost: WorldAccess {
    /// Monotonic session clock.
    fn now(&self) -> Duration;

    /// The local player, or `None` before spawn.
    fn player(&self) -> Option<&PlayerView>;

    /// Tracked entities near the player.
    fn entities(&self) -> &[EntitySnapshot];

    /// Time needed to break `block` with the current equipment and effects.
    fn dig_time(&self, block: &Block) -> Duration;

    /// Whether the connected server's protocol has `feature`.
    fn supports_feature(&self, feature: HostFeature) -> bool;

    fn catalog(&self) -> &dyn BlockCatalog;

    fn classifier(&self) -> &dyn Classifier;
}
