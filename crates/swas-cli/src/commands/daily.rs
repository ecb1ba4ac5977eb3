//! Daily revenue command

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use swas_core::import::parse_cleaned_revenue_csv;
use swas_core::sink::write_json_atomic;

use super::{AppContext, DAILY_FILE};

/// Convert the cleaned CSV into daily revenue JSON, returning the file written
pub fn cmd_daily(ctx: &AppContext, cleaned: &Path, out: Option<&Path>) -> Result<PathBuf> {
    let file = File::open(cleaned)
        .with_context(|| format!("Input file not found: {}", cleaned.display()))?;
    let rows = parse_cleaned_revenue_csv(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", cleaned.display()))?;

    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ctx.output_file(DAILY_FILE));
    write_json_atomic(&out, &rows).with_context(|| format!("Failed to write {}", out.display()))?;

    match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => println!(
            "📅 Wrote {} days of revenue ({} to {}) to {}",
            rows.len(),
            first.date,
            last.date,
            out.display()
        ),
        _ => println!("📅 No revenue rows found; wrote empty {}", out.display()),
    }

    Ok(out)
}
