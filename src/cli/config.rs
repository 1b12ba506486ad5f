use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;
use crate::exec::strategy::ExecutionMode;
use crate::tally::tally::TallyConfig;
use crate::tally::verbosity::Verbosity;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "assert-tally",
    version,
    about = "Non-terminating assertion tallies for test runs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Diagnostic threshold (overrides the config file)
    #[arg(long, value_enum, global = true)]
    pub verbosity: Option<Verbosity>,

    /// Print passing assertions too (needs --verbosity all-assertions)
    #[arg(long, global = true)]
    pub debug: bool,

    /// JSONL trace file
    #[arg(long, global = true)]
    pub trace: Option<String>,

    /// Path to config file (default: assert-tally.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay test plans from YAML files
    Run {
        /// Path to a plan YAML file or a directory of YAML files
        #[arg(long)]
        plan: String,

        /// Execution strategy (overrides the config file)
        #[arg(long, value_enum)]
        mode: Option<ExecutionMode>,

        /// Output format: console, junit, json (default: console)
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

pub const DEFAULT_CONFIG_PATH: &str = "assert-tally.yaml";

/// Optional YAML config file: `assert-tally.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tally: TallyConfig,

    /// Whether the host framework runs in debug mode
    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_console")]
    pub format: String,

    pub output: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            format: "console".to_string(),
            output: None,
        }
    }
}

fn default_console() -> String {
    "console".to_string()
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing or
/// malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    match try_load_config(path) {
        Ok(config) => config,
        Err(HarnessError::Io { .. }) => AppConfig::default(),
        Err(e) => {
            eprintln!("Warning: {}; using defaults", e);
            AppConfig::default()
        }
    }
}

/// Strict variant of `load_config` that reports why loading failed.
pub fn try_load_config(path: Option<&str>) -> Result<AppConfig, HarnessError> {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let content = std::fs::read_to_string(config_path).map_err(|source| HarnessError::Io {
        path: config_path.to_string(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| HarnessError::ConfigParse {
        path: config_path.to_string(),
        source,
    })
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build the tally settings: CLI > config file > defaults.
pub fn build_tally_config(
    config: &AppConfig,
    verbosity: Option<Verbosity>,
    mode: Option<ExecutionMode>,
    trace: Option<&str>,
) -> TallyConfig {
    TallyConfig {
        verbosity: verbosity.unwrap_or(config.tally.verbosity),
        mode: mode.unwrap_or(config.tally.mode),
        trace_path: trace
            .map(str::to_string)
            .or_else(|| config.tally.trace_path.clone()),
    }
}
