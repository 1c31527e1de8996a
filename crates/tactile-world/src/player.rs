//! Local player view, items, and hands.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Inventory slot index of the off-hand.
pub const OFFHAND_SLOT: u8 = 45;

/// Game mode of the local player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

/// Which hand performs an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    /// Main (right) hand.
    Main,
    /// Off (left) hand.
    Off,
}

/// Inventory slot an item is used from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeldSlot {
    /// Hotbar slot `0..9`.
    Hotbar(u8),
    /// The off-hand slot ([`OFFHAND_SLOT`]).
    Offhand,
}

impl HeldSlot {
    /// Inventory window slot number.
    pub fn inventory_index(self) -> u8 {
        match self {
            HeldSlot::Hotbar(i) => i,
            HeldSlot::Offhand => OFFHAND_SLOT,
        }
    }
}

/// An item stack, reduced to what interaction needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item name (e.g. `"oak_slab"`, `"bow"`).
    pub name: String,
    /// Adventure-mode "can place on" whitelist of block names.
    #[serde(default)]
    pub can_place_on: Vec<String>,
}

impl ItemStack {
    /// Item with no adventure-mode whitelist.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            can_place_on: Vec::new(),
        }
    }

    /// Returns `true` if the whitelist allows placing against `block_name`.
    pub fn can_place_on(&self, block_name: &str) -> bool {
        self.can_place_on.iter().any(|b| b == block_name)
    }
}

/// The local player's current state, as reported by the host each call.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerView {
    /// Local entity id.
    pub id: EntityId,
    /// Feet position.
    pub position: DVec3,
    /// Yaw in radians.
    pub yaw: f64,
    /// Pitch in radians.
    pub pitch: f64,
    /// Standing on a block.
    pub on_ground: bool,
    /// Sneak control held.
    pub sneaking: bool,
    /// Current game mode.
    pub game_mode: GameMode,
    /// Item in the selected hotbar slot.
    pub held_item: Option<ItemStack>,
    /// Item in the off-hand slot.
    pub offhand_item: Option<ItemStack>,
    /// Selected hotbar slot `0..9`.
    pub quick_bar_slot: u8,
}

impl PlayerView {
    /// Item held in `hand`.
    pub fn item_in(&self, hand: Hand) -> Option<&ItemStack> {
        match hand {
            Hand::Main => self.held_item.as_ref(),
            Hand::Off => self.offhand_item.as_ref(),
        }
    }

    /// Slot an item in `hand` is used from.
    pub fn slot_for(&self, hand: Hand) -> HeldSlot {
        match hand {
            Hand::Main => HeldSlot::Hotbar(self.quick_bar_slot),
            Hand::Off => HeldSlot::Offhand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offhand_slot_index() {
        assert_eq!(HeldSlot::Offhand.inventory_index(), 45);
        assert_eq!(HeldSlot::Hotbar(3).inventory_index(), 3);
    }

    #[test]
    fn test_can_place_on_whitelist() {
        let mut item = ItemStack::new("stone");
        assert!(!item.can_place_on("dirt"));
        item.can_place_on.push("dirt".into());
        assert!(item.can_place_on("dirt"));
    }
}
