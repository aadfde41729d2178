use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::traversal::traversal_model::TraversalConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-autofill",
    version,
    about = "Detects, matches and fills job-application web forms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: form-autofill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a page and print the detected field inventory
    Analyze {
        /// URL of the form page
        #[arg(long)]
        url: String,

        /// Emit the field records as JSON instead of a summary
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Detect, match and fill a multi-step form
    Fill {
        /// URL of the form page
        #[arg(long)]
        url: String,

        /// YAML or JSON file mapping data keys to values
        #[arg(long)]
        data: String,

        /// Maximum traversal steps before giving up
        #[arg(long)]
        max_steps: Option<u32>,

        /// Confidence floor below which a match is skipped (0-100)
        #[arg(long)]
        min_score: Option<u8>,

        /// Milliseconds to wait for the page to settle after navigation
        #[arg(long)]
        settle_ms: Option<u64>,

        /// Write a JSONL trace of the run to this file
        #[arg(long)]
        trace: Option<String>,

        /// Emit the run report as JSON instead of a summary
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Match a saved field inventory against a data file, offline
    Match {
        /// JSON file of field records (from `analyze --json`)
        #[arg(long)]
        fields: String,

        /// YAML or JSON file mapping data keys to values
        #[arg(long)]
        data: String,

        /// Confidence floor below which a match is reported as skipped
        #[arg(long)]
        min_score: Option<u8>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-autofill.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub fill: FillConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    #[serde(default = "default_min_score")]
    pub min_score: u8,

    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    pub trace: Option<String>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            max_steps: 200,
            min_score: 30,
            settle_ms: 3000,
            trace: None,
        }
    }
}

// Serde default helpers
fn default_max_steps() -> u32 { 200 }
fn default_min_score() -> u8 { 30 }
fn default_settle_ms() -> u64 { 3000 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("form-autofill.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build a TraversalConfig from CLI overrides layered over the config file.
pub fn build_traversal_config(
    config: &AppConfig,
    max_steps: Option<u32>,
    min_score: Option<u8>,
    settle_ms: Option<u64>,
) -> TraversalConfig {
    TraversalConfig {
        max_steps: max_steps.unwrap_or(config.fill.max_steps),
        min_score: min_score.unwrap_or(config.fill.min_score),
        settle_ms: settle_ms.unwrap_or(config.fill.settle_ms),
    }
}
