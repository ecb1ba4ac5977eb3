//! Pipeline configuration
//!
//! Loaded from TOML in two layers:
//! 1. An explicit path (CLI `--config`), or the user override at
//!    `<data_local_dir>/swas/config.toml`
//! 2. The default compiled into the binary
//!
//! Keys missing from the override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::forecast::ForecasterChain;

/// Embedded default config
const DEFAULT_CONFIG: &str = include_str!("../../../config/swas.toml");

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Forecast model names in preference order
    pub forecast_models: Vec<String>,
    /// Directory for JSON report files
    pub output_dir: PathBuf,
    /// SQLite database file
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forecast_models: vec!["heuristic".to_string()],
            output_dir: PathBuf::from("output"),
            db_path: PathBuf::from("swas.db"),
        }
    }
}

impl Config {
    /// Forecaster chain for the configured models
    pub fn forecaster_chain(&self) -> Result<ForecasterChain> {
        ForecasterChain::from_names(&self.forecast_models)
    }

    /// Path of a report file inside the output directory
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// User override location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("swas").join("config.toml"))
}

/// Load configuration (explicit path, then user override, then default)
///
/// An explicit path that does not exist is an error; a missing user
/// override silently falls back to the embedded default.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = parse_config(DEFAULT_CONFIG)?;

    let override_path = match path {
        Some(p) if !p.exists() => {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                p.display()
            )))
        }
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    if let Some(path) = override_path {
        debug!("Loading config override from {}", path.display());
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        apply_config(&mut config, &content)?;
    }

    Ok(config)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    forecast: Option<RawForecast>,
    output: Option<RawOutput>,
    database: Option<RawDatabase>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    models: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawDatabase {
    path: Option<PathBuf>,
}

/// Parse config from TOML on top of the built-in defaults
pub fn parse_config(content: &str) -> Result<Config> {
    let mut config = Config::default();
    apply_config(&mut config, content)?;
    Ok(config)
}

fn apply_config(config: &mut Config, content: &str) -> Result<()> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    if let Some(models) = raw.forecast.and_then(|f| f.models) {
        // Validate names now rather than at the first forecast
        ForecasterChain::from_names(&models)?;
        config.forecast_models = models;
    }
    if let Some(dir) = raw.output.and_then(|o| o.dir) {
        config.output_dir = dir;
    }
    if let Some(path) = raw.database.and_then(|d| d.path) {
        config.db_path = path;
    }

    Ok(())
}
