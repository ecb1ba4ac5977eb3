//! Shared command context and utilities
//!
//! This module contains:
//! - `AppContext` - Resolved config, database path, and clock for one invocation
//! - `open_db` - Shared utility to open the database
//! - `load_daily` - Read a daily revenue JSON file

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use swas_core::clock::{clock_for, pinned_date, Clock};
use swas_core::config::{load_config, Config};
use swas_core::db::Database;
use swas_core::import::parse_daily_revenue_json;
use swas_core::models::DailyRevenueRow;
use tracing::info;

/// Daily revenue file name inside the output directory
pub const DAILY_FILE: &str = "daily_revenue.json";
/// Forecast window file name inside the output directory
pub const FORECAST_FILE: &str = "weekly_forecast.json";
/// Weekly revenue file name inside the output directory
pub const WEEKLY_FILE: &str = "weekly_revenue.json";
/// Monthly growth file name inside the output directory
pub const MONTHLY_FILE: &str = "monthly_growth.json";

/// Everything a command needs, resolved once per invocation
pub struct AppContext {
    pub config: Config,
    pub clock: Box<dyn Clock>,
}

impl AppContext {
    pub fn new(config: Config, clock: Box<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Load config, apply the `--db` override, and resolve the clock
    pub fn load(
        config_path: Option<&Path>,
        db: Option<PathBuf>,
        today: Option<NaiveDate>,
    ) -> Result<Self> {
        let mut config = load_config(config_path).context("Failed to load configuration")?;
        if let Some(db) = db {
            config.db_path = db;
        }

        // Read the environment override once and reuse it for the clock
        let pinned = pinned_date(today);
        if let (None, Some(date)) = (today, pinned) {
            info!("Using current date override {}", date);
        }

        Ok(Self::new(config, clock_for(pinned)))
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.config.output_file(name)
    }

    pub fn open_db(&self) -> Result<Database> {
        open_db(&self.config.db_path)
    }
}

/// Open (or create) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).with_context(|| format!("Failed to open database {}", path_str))
}

/// Read a daily revenue JSON file
pub fn load_daily(path: &Path) -> Result<Vec<DailyRevenueRow>> {
    let file =
        File::open(path).with_context(|| format!("Input file not found: {}", path.display()))?;
    parse_daily_revenue_json(BufReader::new(file))
        .with_context(|| format!("Failed to parse daily revenue {}", path.display()))
}
