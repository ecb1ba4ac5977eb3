//! Monthly revenue and the twelve-month growth series

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};

use crate::clock::Clock;
use crate::models::{round2, BranchValues, DailyRevenueRow, MonthlyGrowthRow, MonthlyRevenue};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Split a `YYYY-MM` key
fn parse_month_key(key: &str) -> Option<(i32, u32)> {
    let (year, month) = key.split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = month.get(..2)?.parse::<u32>().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

/// Per-branch sums for each calendar month, ascending by month
///
/// Branch values are rounded before the total is taken, so `total` always
/// matches the sum of what is displayed.
pub fn aggregate_monthly(rows: &[DailyRevenueRow]) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<String, BranchValues> = BTreeMap::new();

    for row in rows {
        let sums = months.entry(month_key(row.date)).or_default();
        for (branch, value) in &row.branches {
            *sums.entry(branch.clone()).or_insert(0.0) += value;
        }
    }

    months
        .into_iter()
        .map(|(month, sums)| {
            let branches: BranchValues = sums.into_iter().map(|(b, v)| (b, round2(v))).collect();
            MonthlyRevenue {
                month,
                total: round2(branches.values().sum()),
                branches,
            }
        })
        .collect()
}

/// Latest year with data, else the clock's year
pub fn target_year(monthly: &[MonthlyRevenue], clock: &dyn Clock) -> i32 {
    monthly
        .iter()
        .filter_map(|m| parse_month_key(&m.month))
        .map(|(year, _)| year)
        .max()
        .unwrap_or_else(|| clock.today().year())
}

/// Twelve rows, January to December, for the target year
///
/// Months after the latest month with non-zero revenue are zeroed. If the
/// year has no revenue at all, the latest month present is used instead.
pub fn build_twelve_month_series(
    monthly: &[MonthlyRevenue],
    clock: &dyn Clock,
) -> Vec<MonthlyGrowthRow> {
    let year = target_year(monthly, clock);

    let in_year: BTreeMap<u32, &MonthlyRevenue> = monthly
        .iter()
        .filter_map(|m| match parse_month_key(&m.month) {
            Some((y, month)) if y == year => Some((month, m)),
            _ => None,
        })
        .collect();

    let latest = in_year
        .iter()
        .filter(|(_, m)| m.total != 0.0)
        .map(|(month, _)| *month)
        .max()
        .or_else(|| in_year.keys().max().copied());

    let branches: BTreeSet<&String> = monthly.iter().flat_map(|m| m.branches.keys()).collect();

    (1..=12u32)
        .map(|month| {
            let zeroed = latest.is_some_and(|latest| month > latest);
            let source = in_year.get(&month).filter(|_| !zeroed);

            let values: BranchValues = branches
                .iter()
                .map(|b| {
                    let value = source
                        .and_then(|m| m.branches.get(*b))
                        .copied()
                        .unwrap_or(0.0);
                    ((*b).clone(), round2(value))
                })
                .collect();

            MonthlyGrowthRow {
                month: MONTH_NAMES[(month - 1) as usize].to_string(),
                year,
                total: round2(values.values().sum()),
                branches: values,
            }
        })
        .collect()
}
