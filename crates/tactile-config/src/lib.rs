//! Configuration for the interaction engine.
//!
//! Settings persist to disk as RON files, accept CLI overrides via clap, and
//! support hot-reload detection. Every section is `#[serde(default)]`, so
//! older or partial files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BlockInteractionKind, BlockInteractionRule, Config, DebugConfig, InteractionConfig,
    PredictionConfig, default_block_interactions,
};
pub use error::ConfigError;
