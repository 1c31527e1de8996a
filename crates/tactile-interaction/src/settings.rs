//! Runtime settings of an interaction session and the server-pushed overrides
//! that can change them mid-session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tactile_config::{BlockInteractionKind, BlockInteractionRule, Config, PredictionConfig};
use tactile_placement::PlacementOverride;
use tactile_targeting::ReachSettings;
use tactile_world::{Block, ItemStack, StateId};

// ---------------------------------------------------------------------------
// InteractionSettings
// ---------------------------------------------------------------------------

/// Settings an [`InteractionController`](crate::InteractionController) runs with.
#[derive(Clone)]
pub struct InteractionSettings {
    /// Ticks between repeated placements while use is held.
    pub place_cooldown_ticks: u32,
    /// Minimum time between a completed dig and the next dig start.
    pub dig_cooldown: Duration,
    /// Minimum time between idle arm swings.
    pub idle_swing_interval: Duration,
    /// Duration of an observed arm swing.
    pub arm_swing_duration: Duration,
    /// Length of the recently-broken ring.
    pub broken_history_len: usize,
    /// Cursor and entity reach.
    pub reach: ReachSettings,
    /// Placement prediction toggles.
    pub prediction: PredictionConfig,
    /// Special right-click behaviour per block, first match wins.
    pub block_interactions: Vec<BlockInteractionRule>,
    /// Log dig-state desync warnings.
    pub warnings: bool,
    /// Reviews every predicted placement before it is written.
    pub placement_override: Option<Arc<dyn PlacementOverride>>,
}

impl InteractionSettings {
    /// Builds settings from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        let i = &config.interaction;
        Self {
            place_cooldown_ticks: i.place_cooldown_ticks,
            dig_cooldown: Duration::from_millis(i.dig_cooldown_ms()),
            idle_swing_interval: Duration::from_millis(i.idle_swing_interval_ms),
            arm_swing_duration: Duration::from_millis(i.arm_swing_duration_ms),
            broken_history_len: i.broken_history_len,
            reach: ReachSettings {
                cursor_reach: i.cursor_reach,
                creative_entity_reach: i.creative_entity_reach,
                survival_entity_reach: i.survival_entity_reach,
                standing_eye_height: i.standing_eye_height,
                sneaking_eye_height: i.sneaking_eye_height,
            },
            prediction: config.prediction.clone(),
            block_interactions: config.block_interactions.clone(),
            warnings: config.debug.warnings,
            placement_override: None,
        }
    }

    /// Attaches a placement override hook.
    pub fn with_placement_override(mut self, hook: Arc<dyn PlacementOverride>) -> Self {
        self.placement_override = Some(hook);
        self
    }

    /// Special right-click behaviour for a block, if any rule matches.
    pub fn block_interaction_for(&self, block_name: &str) -> Option<BlockInteractionKind> {
        self.block_interactions
            .iter()
            .find(|rule| rule.pattern.matches(block_name))
            .map(|rule| rule.kind)
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// ---------------------------------------------------------------------------
// BreakTimeOverrides
// ---------------------------------------------------------------------------

/// Server-pushed break times, in seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakTimeOverrides {
    /// Per block state.
    pub by_state: FxHashMap<StateId, f64>,
    /// Per block name.
    pub by_name: FxHashMap<String, f64>,
    /// Applies to every block without a more specific entry.
    pub wildcard: Option<f64>,
    /// When non-empty, overrides only apply while holding one of these items.
    pub tool_allowance: FxHashSet<String>,
}

impl BreakTimeOverrides {
    /// Builds overrides from a key map whose keys are state ids, block names or `*`.
    pub fn from_keys(map: &HashMap<String, f64>) -> Self {
        let mut out = Self::default();
        for (key, &seconds) in map {
            if key == "*" {
                out.wildcard = Some(seconds);
            } else if let Ok(state) = key.parse::<u32>() {
                out.by_state.insert(StateId(state), seconds);
            } else {
                out.by_name.insert(key.clone(), seconds);
            }
        }
        out
    }

    /// Break time override for `block` when holding `held`, in seconds.
    pub fn lookup(&self, block: &Block, held: Option<&ItemStack>) -> Option<f64> {
        if !self.tool_allowance.is_empty() {
            let held_name = held.map_or("", |item| item.name.as_str());
            if !self.tool_allowance.contains(held_name) {
                return None;
            }
        }
        self.by_state
            .get(&block.state_id)
            .or_else(|| self.by_name.get(&block.name))
            .copied()
            .or(self.wildcard)
    }

    /// Returns `true` if nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.by_state.is_empty() && self.by_name.is_empty() && self.wildcard.is_none()
    }
}

// ---------------------------------------------------------------------------
// ServerSettings
// ---------------------------------------------------------------------------

/// Settings packet a server may push mid-session. Absent fields leave the
/// current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    /// Break times in seconds keyed by state id, block name, or `*`.
    pub custom_break_time: Option<HashMap<String, f64>>,
    /// Items the break time overrides are restricted to.
    pub custom_break_time_tool_allowance: Option<Vec<String>>,
    pub block_place_prediction: Option<bool>,
    /// Milliseconds.
    pub block_place_prediction_delay: Option<u64>,
    pub block_place_prediction_check_entities: Option<bool>,
}

impl ServerSettings {
    /// Applies every present field.
    pub fn apply(&self, settings: &mut InteractionSettings, break_times: &mut BreakTimeOverrides) {
        if let Some(map) = &self.custom_break_time {
            let allowance = std::mem::take(&mut break_times.tool_allowance);
            *break_times = BreakTimeOverrides::from_keys(map);
            break_times.tool_allowance = allowance;
        }
        if let Some(tools) = &self.custom_break_time_tool_allowance {
            break_times.tool_allowance = tools.iter().cloned().collect();
        }
        if let Some(enabled) = self.block_place_prediction {
            settings.prediction.enabled = enabled;
        }
        if let Some(delay) = self.block_place_prediction_delay {
            settings.prediction.delay_ms = delay;
        }
        if let Some(check) = self.block_place_prediction_check_entities {
            settings.prediction.check_entities = check;
        }
    }
}
