//! Read-only block catalog: block types, their state properties, and the
//! mapping between property values and flat state ids.
//!
//! State ids follow the usual mixed-radix layout: each block type owns the
//! contiguous range `min_state_id .. min_state_id + state_count`, and within
//! it the last declared property varies fastest.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tactile_geometry::Aabb;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Flat block state identifier. Air is always 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub u32);

impl StateId {
    /// The air state.
    pub const AIR: StateId = StateId(0);

    /// Returns `true` if this is the air state.
    pub fn is_air(self) -> bool {
        self.0 == 0
    }
}

/// A named state property and its allowed values, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateProperty {
    /// Property name (e.g. `"facing"`, `"type"`, `"axis"`).
    pub name: String,
    /// Allowed values.
    pub values: Vec<String>,
}

impl StateProperty {
    /// Convenience constructor from string slices.
    pub fn new(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Returns `true` if `value` is one of this property's values.
    pub fn supports(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Returns `true` if every value in `candidates` is supported.
    pub fn supports_all(&self, candidates: &[&str]) -> bool {
        candidates.iter().all(|c| self.supports(c))
    }
}

/// How a block type's collision shapes are derived from its state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ShapeRule {
    /// No collision (air, plants).
    Empty,
    /// Full cube in every state.
    Full,
    /// Half-height box selected by the `type` property (`bottom`/`top`/`double`).
    Slab,
    /// Fixed shapes in every state, block-local `[min.., max..]` arrays.
    Fixed(Vec<[f64; 6]>),
}

/// Catalog entry for one block type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// Catalog name.
    pub name: String,
    /// First state id owned by this block type.
    pub min_state_id: StateId,
    /// State the block takes when placed without any property overrides.
    pub default_state: StateId,
    /// State properties in declaration order.
    pub properties: Vec<StateProperty>,
    /// Collision shape rule.
    pub shape: ShapeRule,
}

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A block with the same name is already registered.
    #[error("duplicate block name: {0}")]
    DuplicateName(String),
    /// A default property value is not in the property's value list.
    #[error("invalid default value {value:?} for property {property:?} of {block}")]
    InvalidDefault {
        /// Block being registered.
        block: String,
        /// Offending property.
        property: String,
        /// Offending value.
        value: String,
    },
    /// Default values were supplied for a different number of properties.
    #[error("{block} declares {expected} properties but {got} defaults were given")]
    DefaultCountMismatch {
        /// Block being registered.
        block: String,
        /// Declared property count.
        expected: usize,
        /// Supplied default count.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// BlockDescriptor
// ---------------------------------------------------------------------------

impl BlockDescriptor {
    /// Number of distinct states this block type has.
    pub fn state_count(&self) -> u32 {
        self.properties
            .iter()
            .map(|p| p.values.len().max(1) as u32)
            .product()
    }

    /// Returns `true` if `state` belongs to this block type.
    pub fn owns(&self, state: StateId) -> bool {
        state.0 >= self.min_state_id.0 && state.0 < self.min_state_id.0 + self.state_count()
    }

    /// Property values of `state`, one per declared property.
    pub fn decode(&self, state: StateId) -> Option<Vec<&str>> {
        if !self.owns(state) {
            return None;
        }
        let mut rem = state.0 - self.min_state_id.0;
        let mut out = vec![""; self.properties.len()];
        for (i, prop) in self.properties.iter().enumerate().rev() {
            let n = prop.values.len().max(1) as u32;
            out[i] = prop.values.get((rem % n) as usize).map_or("", String::as_str);
            rem /= n;
        }
        Some(out)
    }

    /// State id for one value per declared property.
    pub fn encode(&self, values: &[&str]) -> Option<StateId> {
        if values.len() != self.properties.len() {
            return None;
        }
        let mut offset = 0u32;
        for (prop, value) in self.properties.iter().zip(values) {
            let idx = prop.values.iter().position(|v| v == value)?;
            offset = offset * prop.values.len() as u32 + idx as u32;
        }
        Some(StateId(self.min_state_id.0 + offset))
    }

    /// Value of a single named property in `state`.
    pub fn property_value(&self, state: StateId, property: &str) -> Option<&str> {
        let idx = self.properties.iter().position(|p| p.name == property)?;
        self.decode(state).map(|values| values[idx])
    }

    /// Collision shapes of `state`, in block-local coordinates.
    pub fn collision_shapes(&self, state: StateId) -> Vec<Aabb> {
        match &self.shape {
            ShapeRule::Empty => Vec::new(),
            ShapeRule::Full => vec![Aabb::UNIT],
            ShapeRule::Slab => match self.property_value(state, "type") {
                Some("top") => vec![Aabb::from_shape([0.0, 0.5, 0.0, 1.0, 1.0, 1.0])],
                Some("double") => vec![Aabb::UNIT],
                _ => vec![Aabb::from_shape([0.0, 0.0, 0.0, 1.0, 0.5, 1.0])],
            },
            ShapeRule::Fixed(shapes) => shapes.iter().map(|s| Aabb::from_shape(*s)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// Read-only lookup of block types by name or state id.
pub trait BlockCatalog {
    /// Looks up a block type by catalog name.
    fn block_by_name(&self, name: &str) -> Option<&BlockDescriptor>;

    /// Looks up the block type owning `state`.
    fn block_by_state(&self, state: StateId) -> Option<&BlockDescriptor>;
}

// ---------------------------------------------------------------------------
// StaticCatalog
// ---------------------------------------------------------------------------

/// In-memory [`BlockCatalog`] built once at startup.
///
/// Air is pre-registered with state id 0.
pub struct StaticCatalog {
    blocks: Vec<BlockDescriptor>,
    by_name: FxHashMap<String, usize>,
    next_state: u32,
}

impl StaticCatalog {
    /// Creates a catalog containing only air.
    pub fn new() -> Self {
        let mut catalog = Self {
            blocks: Vec::new(),
            by_name: FxHashMap::default(),
            next_state: 0,
        };
        // Air cannot collide with an empty catalog.
        let _ = catalog.register("air", Vec::new(), &[], ShapeRule::Empty);
        catalog
    }

    /// Registers a block type and returns its default state id.
    ///
    /// `defaults` holds one default value per property, in order.
    pub fn register(
        &mut self,
        name: &str,
        properties: Vec<StateProperty>,
        defaults: &[&str],
        shape: ShapeRule,
    ) -> Result<StateId, CatalogError> {
        if self.by_name.contains_key(name) {
            return Err(CatalogError::DuplicateName(name.to_string()));
        }
        if defaults.len() != properties.len() {
            return Err(CatalogError::DefaultCountMismatch {
                block: name.to_string(),
                expected: properties.len(),
                got: defaults.len(),
            });
        }

        let mut desc = BlockDescriptor {
            name: name.to_string(),
            min_state_id: StateId(self.next_state),
            default_state: StateId(self.next_state),
            properties,
            shape,
        };

        if let Some((prop, value)) = desc
            .properties
            .iter()
            .zip(defaults)
            .find(|(p, v)| !p.supports(v))
        {
            return Err(CatalogError::InvalidDefault {
                block: name.to_string(),
                property: prop.name.clone(),
                value: value.to_string(),
            });
        }
        // Every default was validated above.
        if let Some(default_state) = desc.encode(defaults) {
            desc.default_state = default_state;
        }

        self.next_state += desc.state_count();
        self.by_name.insert(name.to_string(), self.blocks.len());
        let default_state = desc.default_state;
        self.blocks.push(desc);
        Ok(default_state)
    }

    /// Number of registered block types, including air.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.blocks.len() <= 1
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockCatalog for StaticCatalog {
    fn block_by_name(&self, name: &str) -> Option<&BlockDescriptor> {
        self.by_name.get(name).map(|&i| &self.blocks[i])
    }

    fn block_by_state(&self, state: StateId) -> Option<&BlockDescriptor> {
        // Blocks are registered with ascending, contiguous state ranges.
        let idx = self
            .blocks
            .partition_point(|b| b.min_state_id.0 <= state.0)
            .checked_sub(1)?;
        self.blocks.get(idx).filter(|b| b.owns(state))
    }
}
