// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{AppSettings, Settings, TrackerSettings};

/// Loads the application settings from the `config/` directory.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Same as [`load_settings`], reading the TOML files from `dir`.
pub fn load_settings_from(dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_for(dir, &environment)
}

/// Loads `base.toml` and then `{environment}.toml` from `dir`, followed by
/// `APP__` environment variables.
pub fn load_settings_for(dir: &Path, environment: &str) -> Result<Settings> {
    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::from(dir.join("base.toml")))
        // 2. Load the environment-specific configuration file.
        .add_source(File::from(dir.join(format!("{environment}.toml"))).required(false))
        // 3. Load settings from environment variables (e.g., `APP__TRACKER__LOG_DIR=...`).
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let settings: Settings = settings.try_deserialize()?;

    Ok(settings)
}

/// Renders the effective settings back to TOML.
pub fn to_toml(settings: &Settings) -> Result<String> {
    Ok(toml::to_string_pretty(settings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn base_file_is_loaded_with_defaults_filled_in() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            r#"
            [strategy]
            name = "dip_buyer"

            [strategy.params]
            symbols = ["PTT"]
            "#,
        )
        .unwrap();

        let settings = load_settings_from(dir.path()).unwrap();

        assert_eq!(settings.strategy.name, "dip_buyer");
        assert_eq!(settings.app.log_level, "info");
        assert_eq!(settings.tracker.team_name, "YokAndPun");
        assert_eq!(settings.tracker.log_dir, Path::new("./strategy_logs"));
    }

    #[test]
    fn environment_file_overrides_base() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            "[app]\nlog_level = \"info\"\n[strategy]\nname = \"dip_buyer\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            "[app]\nlog_level = \"debug\"\n[tracker]\nlog_dir = \"/tmp/ledger\"\n",
        )
        .unwrap();

        let staging = load_settings_for(dir.path(), "staging").unwrap();
        assert_eq!(staging.app.log_level, "debug");
        assert_eq!(staging.tracker.log_dir, Path::new("/tmp/ledger"));

        let production = load_settings_for(dir.path(), "production").unwrap();
        assert_eq!(production.app.log_level, "info");
    }

    #[test]
    fn missing_base_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_settings_from(dir.path()),
            Err(Error::LoadError(_))
        ));
    }

    #[test]
    fn settings_render_back_to_toml() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), "[strategy]\nname = \"dip_buyer\"\n").unwrap();
        let settings = load_settings_from(dir.path()).unwrap();

        let rendered = to_toml(&settings).unwrap();

        assert!(rendered.contains("dip_buyer"));
        assert!(rendered.contains("[tracker]"));
    }
}
