//! Static classification tables: which blocks react to a bare right click,
//! which items are "used" rather than placed, and which entities can be attacked.

use std::borrow::Cow;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::BlockCatalog;
use crate::entity::{EntityId, EntitySnapshot};
use crate::player::ItemStack;

/// Errors from classification lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The entity has no type name, so it cannot be classified at all.
    #[error("entity {0:?} has no name")]
    UnnamedEntity(EntityId),
}

// ---------------------------------------------------------------------------
// NamePattern
// ---------------------------------------------------------------------------

/// A simple block/item name matcher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamePattern {
    /// Whole name equals the string.
    Exact(Cow<'static, str>),
    /// Name starts with the string.
    Prefix(Cow<'static, str>),
    /// Name ends with the string.
    Suffix(Cow<'static, str>),
    /// Name contains the string anywhere.
    Contains(Cow<'static, str>),
}

impl NamePattern {
    /// Returns `true` if `name` matches.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Exact(s) => name == s.as_ref(),
            NamePattern::Prefix(s) => name.starts_with(s.as_ref()),
            NamePattern::Suffix(s) => name.ends_with(s.as_ref()),
            NamePattern::Contains(s) => name.contains(s.as_ref()),
        }
    }
}

const fn exact(s: &'static str) -> NamePattern {
    NamePattern::Exact(Cow::Borrowed(s))
}

const fn suffix(s: &'static str) -> NamePattern {
    NamePattern::Suffix(Cow::Borrowed(s))
}

/// Blocks that do something when right-clicked with an empty hand, so a click
/// on them interacts instead of placing against them (unless sneaking).
///
/// Signs and fences are deliberately absent.
pub const ACTIVATABLE_BLOCK_PATTERNS: &[NamePattern] = &[
    // Containers
    exact("barrel"),
    exact("hopper"),
    exact("dispenser"),
    exact("dropper"),
    suffix("chest"),
    suffix("shulker_box"),
    suffix("furnace"),
    suffix("smoker"),
    exact("brewing_stand"),
    exact("beacon"),
    // Crafting
    suffix("table"),
    exact("grindstone"),
    exact("stonecutter"),
    exact("loom"),
    suffix("anvil"),
    // Redstone
    exact("lever"),
    exact("repeater"),
    exact("comparator"),
    exact("daylight_detector"),
    exact("observer"),
    exact("note_block"),
    exact("jukebox"),
    exact("bell"),
    suffix("button"),
    // Doors, gates and trapdoors
    suffix("door"),
    suffix("fence_gate"),
    // Functional blocks
    exact("lectern"),
    exact("composter"),
    exact("respawn_anchor"),
    exact("lodestone"),
    exact("conduit"),
    NamePattern::Contains(Cow::Borrowed("bee")),
    suffix("bed"),
    // Technical blocks
    exact("command_block"),
    exact("jigsaw"),
    exact("structure_block"),
    exact("moving_piston"),
    // Plants and natural blocks
    exact("dragon_egg"),
    exact("flower_pot"),
    exact("sweet_berry_bush"),
    NamePattern::Prefix(Cow::Borrowed("cave_vines")),
    NamePattern::Contains(Cow::Borrowed("candle")),
    // Misc
    exact("cake"),
    exact("decorated_pot"),
    exact("crafter"),
    exact("trial_spawner"),
    exact("vault"),
];

/// Block name an item places, for items whose name differs from the block's.
pub fn item_block_name(item: &str) -> &str {
    match item {
        "redstone" => "redstone_wire",
        "tripwire_hook" => "tripwire",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Static classification boundary consumed by the interaction engine.
pub trait Classifier {
    /// `true` if right-clicking with `item` uses it rather than placing a block.
    fn is_item_activatable(&self, item: &ItemStack, catalog: &dyn BlockCatalog) -> bool;

    /// `true` if a bare right click on this block interacts with it.
    fn is_block_activatable_without_item(&self, block_name: &str) -> bool;

    /// `true` if the entity can be attacked.
    ///
    /// # Errors
    ///
    /// [`ClassifyError::UnnamedEntity`] if the entity carries no type name.
    fn is_entity_attackable(&self, entity: &EntitySnapshot) -> Result<bool, ClassifyError>;
}

/// Armor stand client flag: the stand is a marker with no hit box.
const ARMOR_STAND_MARKER: u8 = 16;

/// Table-driven [`Classifier`].
#[derive(Clone, Debug)]
pub struct DefaultClassifier {
    attackable: FxHashSet<String>,
}

/// Entity types the default classifier treats as attackable.
const DEFAULT_ATTACKABLE: &[&str] = &[
    "player",
    "zombie",
    "zombie_villager",
    "husk",
    "drowned",
    "skeleton",
    "stray",
    "wither_skeleton",
    "creeper",
    "spider",
    "cave_spider",
    "enderman",
    "endermite",
    "silverfish",
    "slime",
    "magma_cube",
    "blaze",
    "ghast",
    "witch",
    "pillager",
    "vindicator",
    "evoker",
    "ravager",
    "phantom",
    "piglin",
    "piglin_brute",
    "zombified_piglin",
    "hoglin",
    "zoglin",
    "guardian",
    "elder_guardian",
    "shulker",
    "wither",
    "ender_dragon",
    "cow",
    "mooshroom",
    "pig",
    "sheep",
    "chicken",
    "rabbit",
    "horse",
    "donkey",
    "mule",
    "llama",
    "goat",
    "wolf",
    "cat",
    "ocelot",
    "fox",
    "panda",
    "polar_bear",
    "bee",
    "villager",
    "wandering_trader",
    "iron_golem",
    "snow_golem",
    "squid",
    "glow_squid",
    "turtle",
    "frog",
    "axolotl",
    "allay",
    "camel",
    "sniffer",
    "boat",
    "chest_boat",
    "minecart",
    "end_crystal",
    "item_frame",
    "glow_item_frame",
    "painting",
    "armor_stand",
];

impl DefaultClassifier {
    /// Classifier with the built-in attackable table.
    pub fn new() -> Self {
        Self::with_attackable(DEFAULT_ATTACKABLE.iter().copied())
    }

    /// Classifier with a custom attackable table.
    pub fn with_attackable<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            attackable: names.into_iter().map(str::to_string).collect(),
        }
    }
}

impl Default for DefaultClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for DefaultClassifier {
    fn is_item_activatable(&self, item: &ItemStack, catalog: &dyn BlockCatalog) -> bool {
        catalog
            .block_by_name(item_block_name(&item.name))
            .is_none()
    }

    fn is_block_activatable_without_item(&self, block_name: &str) -> bool {
        ACTIVATABLE_BLOCK_PATTERNS
            .iter()
            .any(|p| p.matches(block_name))
    }

    fn is_entity_attackable(&self, entity: &EntitySnapshot) -> Result<bool, ClassifyError> {
        let name = entity
            .name
            .as_deref()
            .ok_or(ClassifyError::UnnamedEntity(entity.id))?;

        if !self.attackable.contains(name) {
            tracing::trace!(name, "entity type not in attackable table");
            return Ok(false);
        }
        if name == "armor_stand" {
            return Ok(entity.client_flags & ARMOR_STAND_MARKER == 0);
        }
        Ok(true)
    }
}
