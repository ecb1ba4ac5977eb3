//! Swas Core Library
//!
//! Revenue analytics for a multi-branch business:
//! - Daily revenue import (cleaned transaction CSV, daily JSON)
//! - Monday-anchored weekly aggregation
//! - Weekly forecasting with a fallback chain ending in a robust heuristic
//! - The 17-week forecast window (4 past, current, 12 ahead)
//! - Weekly and monthly revenue reports
//! - SQLite persistence and JSON file sinks
//! - Explicit clock with a date override for backdated runs

pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod import;
pub mod models;
pub mod reports;
pub mod sink;
pub mod weekly;
pub mod window;

pub use clock::{resolve_clock, Clock, FixedClock, SystemClock};
pub use config::{load_config, Config};
pub use db::{Database, ReportTable};
pub use engine::ForecastEngine;
pub use error::{Error, Result};
pub use forecast::{Forecast, Forecaster, ForecasterChain, ForecasterKind, RobustHeuristicForecaster};
pub use models::{
    DailyRevenueRow, ForecastOutputRow, MonthlyGrowthRow, MonthlyRevenue, WeeklyRevenueRow,
};
pub use sink::{ForecastSink, JsonFileSink};
pub use weekly::{aggregate_weekly, WeeklyActuals};
