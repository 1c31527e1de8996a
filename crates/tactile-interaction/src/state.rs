//! Session state records owned by the controller.

use std::fmt;
use std::time::Duration;

use tactile_world::{BlockHit, BlockPos, EntitySnapshot, Hand, HeldSlot, ItemStack};

/// Pointer buttons as the engine sees them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    /// Primary button.
    pub attack: bool,
    /// Middle button; tracked but never acted on.
    pub reserved: bool,
    /// Secondary button.
    pub use_item: bool,
}

/// Why a dig was stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    BlockChange,
    UserStopped,
    EntityInterference,
    DigTimeChanged,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::BlockChange => "block change",
            StopReason::UserStopped => "user stopped",
            StopReason::EntityInterference => "entity interference",
            StopReason::DigTimeChanged => "dig time changed",
        })
    }
}

/// Debug status of the dig lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DigStatus {
    #[default]
    None,
    Breaking,
    Success,
    Aborted,
    Stopped(StopReason),
}

impl fmt::Display for DigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigStatus::None => f.write_str("none"),
            DigStatus::Breaking => f.write_str("breaking"),
            DigStatus::Success => f.write_str("success"),
            DigStatus::Aborted => f.write_str("aborted"),
            DigStatus::Stopped(reason) => write!(f, "stopped by {reason}"),
        }
    }
}

/// An active dig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigSession {
    /// Block being dug.
    pub position: BlockPos,
    /// Session clock at dig start.
    pub started_at: Duration,
    /// Break time required when the dig started.
    pub dig_time: Duration,
}

/// The break progress currently shown on a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentBreak {
    pub position: BlockPos,
    /// Stage `0..=9`.
    pub stage: u8,
}

/// An item being used (bow drawn, food eaten, shield raised).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUseSession {
    pub item: ItemStack,
    pub hand: Hand,
    /// Slot the item is used from.
    pub slot: HeldSlot,
}

/// What the cursor is over this tick.
#[derive(Debug, Clone, Default)]
pub(crate) struct CursorState {
    pub block: Option<BlockHit>,
    /// `block` may be dug by the local player.
    pub diggable: bool,
    /// The highlighted block changed since the previous update.
    pub changed: bool,
    pub entity: Option<EntitySnapshot>,
}

impl CursorState {
    /// The cursor block when it is diggable.
    pub fn diggable_block(&self) -> Option<&BlockHit> {
        self.block.as_ref().filter(|_| self.diggable)
    }
}
