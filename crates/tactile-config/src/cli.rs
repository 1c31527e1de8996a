//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Command-line arguments shared by tactile binaries.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "tactile", about = "Input-to-action interaction engine")]
pub struct CliArgs {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable or disable local placement prediction.
    #[arg(long)]
    pub prediction: Option<bool>,

    /// Delay before predicted blocks are written, in milliseconds.
    #[arg(long)]
    pub prediction_delay_ms: Option<u64>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(enabled) = args.prediction {
            self.prediction.enabled = enabled;
        }
        if let Some(delay) = args.prediction_delay_ms {
            self.prediction.delay_ms = delay;
        }
    }
}
