//! Forecast command

use std::path::Path;

use anyhow::{Context, Result};
use swas_core::engine::ForecastEngine;
use swas_core::sink::{ForecastSink, JsonFileSink};
use tracing::warn;

use super::{load_daily, AppContext, FORECAST_FILE};

/// Build the forecast window and hand it to the sinks
///
/// The JSON file is required. A database failure is only a warning so the
/// file output stays usable.
pub fn cmd_forecast(ctx: &AppContext, file: &Path, no_db: bool) -> Result<()> {
    let rows = load_daily(file)?;
    let chain = ctx
        .config
        .forecaster_chain()
        .context("Invalid forecast model configuration")?;
    let window = ForecastEngine::new(chain).run(&rows, &*ctx.clock);

    let json = JsonFileSink::new(ctx.output_file(FORECAST_FILE));
    json.replace_all(&window)
        .with_context(|| format!("Failed to write {}", json.path().display()))?;
    println!(
        "📈 Wrote {}-week forecast to {}",
        window.len(),
        json.path().display()
    );

    if !no_db {
        let stored = ctx.open_db().and_then(|db| Ok(db.replace_all(&window)?));
        match stored {
            Ok(count) => println!("   Stored {} rows in the forecast table", count),
            Err(e) => warn!("Failed to store forecast in database: {:#}", e),
        }
    }

    if let (Some(first), Some(last)) = (window.first(), window.last()) {
        println!("   Window: {} to {}", first.week_start, last.week_start);
    }

    Ok(())
}
