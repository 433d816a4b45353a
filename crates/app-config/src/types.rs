// In crates/app-config/src/types.rs

use core_types::StrategyConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Where the position ledger lives.
    #[serde(default)]
    pub tracker: TrackerSettings,
    /// Which strategy to run and its parameters.
    pub strategy: StrategyConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,
    /// The log level for the application. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
        }
    }
}

/// Location of the ledger file: `{log_dir}/{team_name}_{strategy_name}_tracker.csv`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TrackerSettings {
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_team_name")]
    pub team_name: String,
    #[serde(default = "default_strategy_name")]
    pub strategy_name: String,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            team_name: default_team_name(),
            strategy_name: default_strategy_name(),
        }
    }
}

/// Helper functions for serde defaults
fn default_environment() -> String { "development".into() }
fn default_log_level() -> String { "info".into() }
fn default_log_dir() -> PathBuf { PathBuf::from("./strategy_logs") }
fn default_team_name() -> String { "YokAndPun".into() }
fn default_strategy_name() -> String { "YokAndPun_strategy".into() }
