//! Daily revenue import
//!
//! Two input shapes produce `DailyRevenueRow`s:
//! - `daily_revenue.json`: an array of flat objects `{date, <branch>: amount, ..., total}`
//! - the cleaned transaction export CSV: `date_time,transaction_id,revenue,branch_id`
//!
//! Rows without a usable date are skipped with a warning rather than failing
//! the whole import.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{BranchValues, DailyRevenueRow, TOTAL_KEY};

/// Branch used for cleaned revenue rows that carry no branch id
pub const UNKNOWN_BRANCH: &str = "UNKNOWN";

/// Parse a date or timestamp string, keeping only the calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Interpret a JSON value as an amount
///
/// Numbers pass through, numeric strings are parsed, everything else
/// (null, empty, text, objects, "NaN", "inf") counts as zero.
fn amount_from_json(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_amount(s),
        _ => 0.0,
    }
}

/// Finite amount from text, zero otherwise
fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Convert one flat JSON object into a daily row
pub fn parse_daily_object(obj: &Map<String, Value>) -> Result<DailyRevenueRow> {
    let date = obj
        .get("date")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedInputRow("missing date".into()))?;
    let date = parse_date(date)
        .ok_or_else(|| Error::MalformedInputRow(format!("unparseable date: {}", date)))?;

    let branches: BranchValues = obj
        .iter()
        .filter(|(key, _)| key.as_str() != "date" && key.as_str() != TOTAL_KEY)
        .map(|(key, value)| (key.clone(), amount_from_json(value)))
        .collect();

    let mut row = DailyRevenueRow::new(date, branches);
    if let Some(total) = obj.get(TOTAL_KEY) {
        row.total = amount_from_json(total);
    }
    Ok(row)
}

/// Parse `daily_revenue.json` content
///
/// Returns rows sorted by date. Malformed rows are skipped.
pub fn parse_daily_revenue_json<R: Read>(reader: R) -> Result<Vec<DailyRevenueRow>> {
    let raw: Vec<Value> = serde_json::from_reader(reader)?;
    let mut rows = Vec::with_capacity(raw.len());

    for (index, item) in raw.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            warn!(index, "Skipping daily revenue entry that is not an object");
            continue;
        };
        match parse_daily_object(obj) {
            Ok(row) => rows.push(row),
            Err(e) => warn!(index, error = %e, "Skipping daily revenue row"),
        }
    }

    rows.sort_by_key(|r| r.date);
    debug!("Parsed {} daily revenue rows", rows.len());
    Ok(rows)
}

/// Locate the first header matching any of the aliases
fn column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h.trim() == *alias))
}

/// Parse the cleaned transaction revenue CSV into daily rows
///
/// Revenue is summed per (date, branch). Every branch seen anywhere in the
/// file appears on every date, zero-filled, so the output has a stable
/// column set.
pub fn parse_cleaned_revenue_csv<R: Read>(reader: R) -> Result<Vec<DailyRevenueRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let date_col = column(&headers, &["date_time", "date"])
        .ok_or_else(|| Error::InvalidData("cleaned revenue CSV has no date_time column".into()))?;
    let revenue_col = column(&headers, &["revenue", "amount"]);
    let branch_col = column(&headers, &["branch_id", "branch", "branchId"]);

    let mut per_date: BTreeMap<NaiveDate, BranchValues> = BTreeMap::new();
    let mut all_branches: BTreeSet<String> = BTreeSet::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let record = result?;

        let raw_date = record.get(date_col).unwrap_or("").trim();
        if raw_date.is_empty() {
            skipped += 1;
            continue;
        }
        // Fall back to the date prefix for timestamps in unexpected formats
        let date = parse_date(raw_date).or_else(|| parse_date(raw_date.get(..10).unwrap_or("")));
        let Some(date) = date else {
            warn!(value = raw_date, "Skipping cleaned revenue row with bad date");
            skipped += 1;
            continue;
        };

        let branch = branch_col
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(UNKNOWN_BRANCH)
            .to_string();

        let revenue = revenue_col
            .and_then(|i| record.get(i))
            .map(parse_amount)
            .unwrap_or(0.0);

        all_branches.insert(branch.clone());
        *per_date.entry(date).or_default().entry(branch).or_insert(0.0) += revenue;
    }

    let rows: Vec<DailyRevenueRow> = per_date
        .into_iter()
        .map(|(date, amounts)| {
            let branches: BranchValues = all_branches
                .iter()
                .map(|b| (b.clone(), amounts.get(b).copied().unwrap_or(0.0)))
                .collect();
            DailyRevenueRow::new(date, branches)
        })
        .collect();

    debug!(
        days = rows.len(),
        branches = all_branches.len(),
        skipped,
        "Parsed cleaned revenue CSV"
    );
    Ok(rows)
}
