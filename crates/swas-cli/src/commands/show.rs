//! Show the stored forecast window

use anyhow::Result;
use swas_core::models::ForecastOutputRow;

use super::AppContext;

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

/// Render rows as a plain-text table
pub fn format_forecast_table(rows: &[ForecastOutputRow]) -> String {
    let mut out = format!(
        "{:<12} {:>12} {:>12} {:>12}\n",
        "Week", "Forecast", "Actual", "Shown"
    );
    out.push_str(&"-".repeat(51));
    out.push('\n');

    for row in rows {
        out.push_str(&format!(
            "{:<12} {:>12} {:>12} {:>12.2}\n",
            row.week_start.to_string(),
            cell(row.forecast_total),
            cell(row.actual_total),
            row.total
        ));
    }
    out
}

pub fn cmd_show(ctx: &AppContext) -> Result<()> {
    let db = ctx.open_db()?;
    let rows = db.list_forecast()?;

    if rows.is_empty() {
        println!("No forecast stored yet. Run: swas forecast daily_revenue.json");
        return Ok(());
    }

    println!("📈 Forecast window ({} weeks)\n", rows.len());
    print!("{}", format_forecast_table(&rows));
    Ok(())
}
