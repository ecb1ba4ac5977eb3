//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Swas - Branch revenue analytics
#[derive(Parser)]
#[command(name = "swas")]
#[command(about = "Weekly revenue forecasts and reports for multi-branch businesses", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database path (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Effective current date, YYYY-MM-DD
    ///
    /// Takes precedence over the SWAS_CURRENT_DATE environment variable.
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert the cleaned transaction CSV into daily revenue JSON
    Daily {
        /// Cleaned revenue CSV (date_time,transaction_id,revenue,branch_id)
        #[arg(long)]
        cleaned: PathBuf,

        /// Output file (defaults to <output>/daily_revenue.json)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Build the 17-week forecast window from daily revenue JSON
    Forecast {
        /// Daily revenue JSON
        file: PathBuf,

        /// Only write the JSON file, skip the database
        #[arg(long)]
        no_db: bool,
    },

    /// Aggregate daily revenue into the weekly revenue report
    Weekly {
        /// Daily revenue JSON
        file: PathBuf,

        /// Only write the JSON file, skip the database
        #[arg(long)]
        no_db: bool,
    },

    /// Build the twelve-month growth series
    Monthly {
        /// Daily revenue JSON
        file: PathBuf,

        /// Only write the JSON file, skip the database
        #[arg(long)]
        no_db: bool,
    },

    /// Store daily revenue rows in the sales_over_time table
    Sales {
        /// Daily revenue JSON
        file: PathBuf,
    },

    /// Run the whole pipeline: daily, forecast, weekly, sales, monthly
    Run {
        /// Cleaned revenue CSV
        #[arg(long)]
        cleaned: PathBuf,

        /// Only write JSON files, skip the database
        #[arg(long)]
        no_db: bool,
    },

    /// Show the stored forecast window
    Show,
}
