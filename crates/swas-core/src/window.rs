//! Fixed 17-week reporting window
//!
//! The window spans four weeks back, the current week, and twelve weeks
//! ahead of the effective current date. Historical weeks inside it show the
//! model's hindcast next to the actual; weeks after the last actual show
//! forecasts only.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::forecast::Forecast;
use crate::models::{round2, BranchValues, ForecastOutputRow};
use crate::weekly::{week_start, WeeklyActuals};

pub const PAST_WEEKS: i64 = 4;
pub const FUTURE_WEEKS: i64 = 12;
pub const WINDOW_WEEKS: usize = (PAST_WEEKS + 1 + FUTURE_WEEKS) as usize;

/// The 17 Mondays of the window around `today`
pub fn window_weeks(today: NaiveDate) -> Vec<NaiveDate> {
    let start = week_start(today) - Duration::weeks(PAST_WEEKS);
    (0..WINDOW_WEEKS as i64)
        .map(|i| start + Duration::weeks(i))
        .collect()
}

/// Window weeks that come after the last actual week
///
/// With no history every window week counts as future.
pub fn future_weeks(window: &[NaiveDate], last_actual: Option<NaiveDate>) -> Vec<NaiveDate> {
    window
        .iter()
        .copied()
        .filter(|week| last_actual.map_or(true, |last| *week > last))
        .collect()
}

/// Number of forecast steps needed to reach the end of the window
pub fn future_count(actuals: &WeeklyActuals, today: NaiveDate) -> usize {
    let window = window_weeks(today);
    future_weeks(&window, actuals.last_week()).len()
}

/// Map one branch's forecast onto window weeks
fn branch_forecast_by_week(
    hist_weeks: &[NaiveDate],
    future: &[NaiveDate],
    window: &[NaiveDate],
    forecast: &Forecast,
) -> BTreeMap<NaiveDate, f64> {
    let mut by_week = BTreeMap::new();

    for week in window {
        if let Ok(index) = hist_weeks.binary_search(week) {
            if let Some(value) = forecast.hindcasts.get(index) {
                by_week.insert(*week, *value);
            }
        }
    }

    let fallback = forecast.future.last().copied().unwrap_or(0.0);
    for (step, week) in future.iter().enumerate() {
        let value = forecast.future.get(step).copied().unwrap_or(fallback);
        by_week.insert(*week, value);
    }

    by_week
}

/// Merge actuals and per-branch forecasts into window rows
///
/// Branches without an entry in `forecasts` get forecast nulls. Rows come out
/// ascending by week with exactly `WINDOW_WEEKS` entries.
pub fn build_window(
    actuals: &WeeklyActuals,
    forecasts: &BTreeMap<String, Forecast>,
    today: NaiveDate,
) -> Vec<ForecastOutputRow> {
    let window = window_weeks(today);
    let hist_weeks = actuals.hist_weeks();
    let future = future_weeks(&window, actuals.last_week());

    let mapped: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = forecasts
        .iter()
        .map(|(branch, forecast)| {
            (
                branch.as_str(),
                branch_forecast_by_week(&hist_weeks, &future, &window, forecast),
            )
        })
        .collect();

    window
        .iter()
        .map(|week| {
            let bucket = actuals.bucket(*week);

            let mut forecast = BTreeMap::new();
            let mut actual = BTreeMap::new();
            let mut display = BranchValues::new();
            let mut actual_sum: Option<f64> = None;

            for branch in &actuals.branches {
                let f = mapped
                    .get(branch.as_str())
                    .and_then(|m| m.get(week))
                    .map(|v| round2(*v));
                let raw_actual = bucket.map(|b| b.branches.get(branch).copied().unwrap_or(0.0));
                if let Some(a) = raw_actual {
                    *actual_sum.get_or_insert(0.0) += a;
                }
                let a = raw_actual.map(round2);

                display.insert(branch.clone(), f.or(a).unwrap_or(0.0));
                forecast.insert(branch.clone(), f);
                actual.insert(branch.clone(), a);
            }

            let present: Vec<f64> = forecast.values().flatten().copied().collect();
            let forecast_total = if present.is_empty() {
                None
            } else {
                Some(round2(present.iter().sum()))
            };

            ForecastOutputRow {
                week_start: *week,
                total: round2(display.values().sum()),
                forecast,
                forecast_total,
                actual,
                actual_total: actual_sum.map(round2),
                display,
            }
        })
        .collect()
}
