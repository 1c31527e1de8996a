//! Configuration structs with sensible defaults and RON persistence.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tactile_world::NamePattern;

use crate::error::ConfigError;

const APP_NAME: &str = "tactile";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Button timing, reach and eye-height settings.
    pub interaction: InteractionConfig,
    /// Local placement prediction.
    pub prediction: PredictionConfig,
    /// Blocks whose right click is handled specially, checked in order.
    pub block_interactions: Vec<BlockInteractionRule>,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Timing windows and reach of the interaction engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Ticks between repeated placements while the use button is held.
    pub place_cooldown_ticks: u32,
    /// Ticks after a completed dig before the next block may start breaking.
    pub dig_cooldown_ticks: u32,
    /// Length of one game tick in milliseconds.
    pub tick_interval_ms: u64,
    /// Minimum time between idle "punching air" swings.
    pub idle_swing_interval_ms: u64,
    /// How long an observed arm swing animation lasts.
    pub arm_swing_duration_ms: u64,
    /// Recently broken blocks kept for restoring after a server rejection.
    pub broken_history_len: usize,
    /// Block raycast reach.
    pub cursor_reach: f64,
    /// Entity reach in creative mode.
    pub creative_entity_reach: f64,
    /// Entity reach in the other game modes.
    pub survival_entity_reach: f64,
    /// Eye height while standing.
    pub standing_eye_height: f64,
    /// Eye height while sneaking.
    pub sneaking_eye_height: f64,
}

/// Local placement prediction settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictionConfig {
    /// Write predicted blocks into the local world.
    pub enabled: bool,
    /// Delay before a predicted block is written (0 = immediately).
    pub delay_ms: u64,
    /// Skip predictions that would overlap an entity.
    pub check_entities: bool,
}

/// What a special block does when right-clicked without sneaking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlockInteractionKind {
    /// Try to sleep in the block.
    Sleep,
    /// Activate the block; never place against it or use the held item.
    ActivateOnly,
    /// Ignore the click entirely.
    Suppress,
}

/// Maps a block name pattern to a [`BlockInteractionKind`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockInteractionRule {
    /// Blocks this rule applies to.
    pub pattern: NamePattern,
    /// What happens on right click.
    pub kind: BlockInteractionKind,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log warnings about desynced dig state.
    pub warnings: bool,
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            interaction: InteractionConfig::default(),
            prediction: PredictionConfig::default(),
            block_interactions: default_block_interactions(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            place_cooldown_ticks: 4,
            dig_cooldown_ticks: 5,
            tick_interval_ms: 50,
            idle_swing_interval_ms: 200,
            arm_swing_duration_ms: 250,
            broken_history_len: 5,
            cursor_reach: 5.0,
            creative_entity_reach: 5.0,
            survival_entity_reach: 3.0,
            standing_eye_height: 1.62,
            sneaking_eye_height: 1.27,
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 0,
            check_entities: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            warnings: true,
        }
    }
}

/// Beds (`bed` and every `*_bed`) start sleeping.
pub fn default_block_interactions() -> Vec<BlockInteractionRule> {
    vec![
        BlockInteractionRule {
            pattern: NamePattern::Exact(Cow::Borrowed("bed")),
            kind: BlockInteractionKind::Sleep,
        },
        BlockInteractionRule {
            pattern: NamePattern::Suffix(Cow::Borrowed("_bed")),
            kind: BlockInteractionKind::Sleep,
        },
    ]
}

impl InteractionConfig {
    /// Dig cooldown in milliseconds.
    pub fn dig_cooldown_ms(&self) -> u64 {
        u64::from(self.dig_cooldown_ticks) * self.tick_interval_ms
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory for this application.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("place_cooldown_ticks: 4"));
        assert!(ron_str.contains("dig_cooldown_ticks: 5"));
        assert!(ron_str.contains("Suffix(\"_bed\")"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(interaction: (place_cooldown_ticks: 6))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.interaction.place_cooldown_ticks, 6);
        assert_eq!(config.interaction.dig_cooldown_ticks, 5);
        assert_eq!(config.prediction, PredictionConfig::default());
        assert_eq!(config.block_interactions, default_block_interactions());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_custom_block_interactions() {
        let ron_str = r#"(block_interactions: [
            (pattern: Exact("lectern"), kind: ActivateOnly),
            (pattern: Contains("sign"), kind: Suppress),
        ])"#;
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.block_interactions.len(), 2);
        assert!(config.block_interactions[1].pattern.matches("oak_wall_sign"));
        assert_eq!(config.block_interactions[1].kind, BlockInteractionKind::Suppress);
    }

    #[test]
    fn test_dig_cooldown_ms() {
        assert_eq!(InteractionConfig::default().dig_cooldown_ms(), 250);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.prediction.delay_ms = 150;
        config.debug.log_level = "debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.prediction.enabled = false;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(!result.unwrap().prediction.enabled);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }
}
