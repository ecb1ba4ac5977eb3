//! Report command implementations

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use swas_core::import::parse_date;
use swas_core::reports::{aggregate_monthly, build_twelve_month_series, target_year, weekly_revenue};
use swas_core::sink::write_json_atomic;
use tracing::{debug, warn};

use super::{load_daily, AppContext, FORECAST_FILE, MONTHLY_FILE, WEEKLY_FILE};

/// Earliest week of a previously written forecast file, if readable
pub fn forecast_start_week(path: &Path) -> Option<NaiveDate> {
    let content = fs::read_to_string(path).ok()?;
    let rows: Vec<Value> = match serde_json::from_str(&content) {
        Ok(rows) => rows,
        Err(e) => {
            debug!("Ignoring unreadable forecast file {}: {}", path.display(), e);
            return None;
        }
    };

    rows.iter()
        .filter_map(|row| {
            row.get("week_start")
                .or_else(|| row.get("date"))
                .and_then(Value::as_str)
                .and_then(parse_date)
        })
        .min()
}

/// Weekly revenue report, limited to the forecast window when one exists
pub fn cmd_weekly(ctx: &AppContext, file: &Path, no_db: bool) -> Result<()> {
    let rows = load_daily(file)?;
    let min_week = forecast_start_week(&ctx.output_file(FORECAST_FILE));
    let weekly = weekly_revenue(&rows, min_week);

    let out = ctx.output_file(WEEKLY_FILE);
    write_json_atomic(&out, &weekly).with_context(|| format!("Failed to write {}", out.display()))?;
    match min_week {
        Some(week) => println!(
            "📊 Wrote {} weeks (from {}) to {}",
            weekly.len(),
            week,
            out.display()
        ),
        None => println!("📊 Wrote {} weeks to {}", weekly.len(), out.display()),
    }

    if !no_db {
        let stored = ctx
            .open_db()
            .and_then(|db| Ok(db.replace_weekly_revenue(&weekly)?));
        match stored {
            Ok(count) => println!("   Stored {} rows in the weekly_revenue table", count),
            Err(e) => warn!("Failed to store weekly revenue in database: {:#}", e),
        }
    }

    Ok(())
}

/// Twelve-month growth series for the latest year with data
pub fn cmd_monthly(ctx: &AppContext, file: &Path, no_db: bool) -> Result<()> {
    let rows = load_daily(file)?;
    let monthly = aggregate_monthly(&rows);
    let year = target_year(&monthly, &*ctx.clock);
    let series = build_twelve_month_series(&monthly, &*ctx.clock);

    let out = ctx.output_file(MONTHLY_FILE);
    write_json_atomic(&out, &series).with_context(|| format!("Failed to write {}", out.display()))?;
    println!(
        "🗓️  Wrote {} months for {} to {} ({} months with data)",
        series.len(),
        year,
        out.display(),
        monthly.len()
    );

    if !no_db {
        let stored = ctx
            .open_db()
            .and_then(|db| Ok(db.replace_monthly_growth(year, &series)?));
        match stored {
            Ok(count) => println!("   Stored {} rows in the monthly_growth table", count),
            Err(e) => warn!("Failed to store monthly growth in database: {:#}", e),
        }
    }

    Ok(())
}

/// Copy daily rows into the sales_over_time table
pub fn cmd_sales(ctx: &AppContext, file: &Path) -> Result<()> {
    let rows = load_daily(file)?;
    let db = ctx.open_db()?;
    let count = db
        .replace_sales_over_time(&rows)
        .context("Failed to store sales over time")?;
    println!("💾 Stored {} daily rows in the sales_over_time table", count);
    Ok(())
}
