//! Weekly forecast engine
//!
//! Daily rows in, the 17-row window out. The engine holds no state between
//! runs, so calling `run` twice with the same rows and clock yields the same
//! window.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::forecast::{Forecast, ForecasterChain};
use crate::models::{DailyRevenueRow, ForecastOutputRow};
use crate::weekly::aggregate_weekly;
use crate::window::{build_window, future_count};

pub struct ForecastEngine {
    chain: ForecasterChain,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(ForecasterChain::default())
    }
}

impl ForecastEngine {
    pub fn new(chain: ForecasterChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ForecasterChain {
        &self.chain
    }

    /// Build the forecast window for `rows` as of `clock.today()`
    pub fn run(&self, rows: &[DailyRevenueRow], clock: &dyn Clock) -> Vec<ForecastOutputRow> {
        let today = clock.today();
        let actuals = aggregate_weekly(rows);
        let steps = future_count(&actuals, today);
        if actuals.is_empty() {
            debug!(today = %today, "No revenue history; window will be all zeros");
        }

        let mut forecasts: BTreeMap<String, Forecast> = BTreeMap::new();
        for series in actuals.all_series() {
            let values = series.values();
            let (forecast, model) = self.chain.forecast(&values, steps);
            debug!(
                branch = %series.branch,
                weeks = values.len(),
                steps,
                model = model.as_str(),
                "Forecast branch"
            );
            forecasts.insert(series.branch, forecast);
        }

        let window = build_window(&actuals, &forecasts, today);
        info!(
            branches = actuals.branches.len(),
            history_weeks = actuals.buckets.len(),
            today = %today,
            "Built {}-week forecast window",
            window.len()
        );
        window
    }
}
