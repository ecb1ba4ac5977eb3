//! Weekly revenue report

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{round2, BranchValues, DailyRevenueRow, WeeklyRevenueRow};
use crate::weekly::week_start;

/// Sum daily rows into weeks that have at least one row
///
/// Unlike the forecast aggregation, weeks without rows are left out. When
/// `min_week` is given, earlier weeks are dropped.
pub fn weekly_revenue(
    rows: &[DailyRevenueRow],
    min_week: Option<NaiveDate>,
) -> Vec<WeeklyRevenueRow> {
    let mut weeks: BTreeMap<NaiveDate, BranchValues> = BTreeMap::new();

    for row in rows {
        let sums = weeks.entry(week_start(row.date)).or_default();
        for (branch, value) in &row.branches {
            *sums.entry(branch.clone()).or_insert(0.0) += value;
        }
    }

    weeks
        .into_iter()
        .filter(|(week, _)| min_week.map_or(true, |min| *week >= min))
        .map(|(week, sums)| WeeklyRevenueRow {
            week_start: week,
            total: round2(sums.values().sum()),
            branches: sums.into_iter().map(|(b, v)| (b, round2(v))).collect(),
        })
        .collect()
}
