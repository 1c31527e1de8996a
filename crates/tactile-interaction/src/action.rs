//! Outbound protocol actions and engine events, queued in emission order and
//! drained by the host once per tick.

use std::fmt;

use glam::DVec3;
use tactile_world::{BlockPos, EntityId, Face, Hand};

/// Cursor sent with the positional entity interaction, on every axis.
pub const ENTITY_INTERACT_CURSOR: f64 = 0.581_012_585_759_162_9;

/// A fire-and-forget protocol action for the host to send.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolAction {
    /// Start digging the block at `position` from `face`.
    DigStart { position: BlockPos, face: Face },
    /// Stop any dig in progress. Harmless when nothing is being dug.
    DigStop,
    /// Right-click a block face with `hand`.
    PlaceBlock {
        position: BlockPos,
        face: Face,
        hand: Hand,
        /// Cursor within the clicked block.
        cursor: DVec3,
    },
    /// Activate a block (bed, lever) without placing.
    ActivateBlock {
        position: BlockPos,
        face: Face,
        cursor: DVec3,
    },
    /// Start using the item in `hand`.
    ActivateItem { hand: Hand },
    /// Release the item being used.
    DeactivateItem,
    /// Attack an entity.
    Attack { target: EntityId },
    /// Positional right-click on an entity.
    InteractAt {
        target: EntityId,
        cursor: DVec3,
        hand: Hand,
        sneaking: bool,
    },
    /// Plain right-click on an entity.
    Interact {
        target: EntityId,
        hand: Hand,
        sneaking: bool,
    },
    /// Arm swing animation.
    SwingArm { hand: Hand },
}

impl fmt::Display for ProtocolAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProtocolAction::DigStart { .. } => "dig start",
            ProtocolAction::DigStop => "dig stop",
            ProtocolAction::PlaceBlock { .. } => "place block",
            ProtocolAction::ActivateBlock { .. } => "activate block",
            ProtocolAction::ActivateItem { .. } => "activate item",
            ProtocolAction::DeactivateItem => "deactivate item",
            ProtocolAction::Attack { .. } => "attack",
            ProtocolAction::InteractAt { .. } => "interact at",
            ProtocolAction::Interact { .. } => "interact",
            ProtocolAction::SwingArm { .. } => "swing arm",
        };
        f.write_str(name)
    }
}

/// Kind of entity interaction dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityInteraction {
    Attack,
    Activate,
}

/// Notifications for UI, animation and logging layers.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// The highlighted block changed; `None` when nothing is highlighted.
    CursorHighlightChanged(Option<BlockPos>),
    /// Break progress of a block changed; `None` clears it.
    BreakProgress { position: BlockPos, stage: Option<u8> },
    /// A dig started on `position`.
    DigStarted { position: BlockPos },
    ArmSwingStarted(Hand),
    ArmSwingEnded(Hand),
    /// An item-use session started.
    ItemUseStarted { item: String, slot: u8, hand: Hand },
    /// An item-use session ended.
    ItemUseStopped { item: String, slot: u8, hand: Hand },
    /// A block was placed against `reference`.
    BlockPlaced {
        reference: BlockPos,
        face: Face,
        cursor: DVec3,
        hand: Hand,
        predicted: bool,
    },
    /// An attack or activation was sent to an entity.
    EntityInteractionDispatched {
        target: EntityId,
        kind: EntityInteraction,
    },
    /// The player is trying to sleep in the bed at `position`.
    GoingToSleep { position: BlockPos },
}
