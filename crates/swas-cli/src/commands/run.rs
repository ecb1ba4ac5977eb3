//! Full pipeline command

use std::path::Path;

use anyhow::{bail, Result};
use tracing::{error, info};

use super::{cmd_daily, cmd_forecast, cmd_monthly, cmd_sales, cmd_weekly, AppContext};

/// Run every step in order
///
/// The daily step feeds all others, so its failure stops the run. Later
/// steps are independent: a failure is logged and the next step still runs.
pub fn cmd_run(ctx: &AppContext, cleaned: &Path, no_db: bool) -> Result<()> {
    println!("🚀 Running analytics pipeline for {}", ctx.today());

    let daily = cmd_daily(ctx, cleaned, None)?;

    let mut failed: Vec<&str> = Vec::new();
    let mut step = |name: &'static str, result: Result<()>| {
        if let Err(e) = result {
            error!("Step {} failed: {:#}", name, e);
            failed.push(name);
        }
    };

    step("forecast", cmd_forecast(ctx, &daily, no_db));
    step("weekly", cmd_weekly(ctx, &daily, no_db));
    if no_db {
        info!("Skipping sales step (--no-db)");
    } else {
        step("sales", cmd_sales(ctx, &daily));
    }
    step("monthly", cmd_monthly(ctx, &daily, no_db));

    if !failed.is_empty() {
        bail!("Pipeline finished with failed steps: {}", failed.join(", "));
    }

    println!("✅ Pipeline complete");
    Ok(())
}
