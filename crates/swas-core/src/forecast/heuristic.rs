//! Robust heuristic forecaster
//!
//! Builds forecasts from medians rather than means so a single spike week
//! does not drag the whole window. Every value it produces (hindcast or
//! future) is clamped into a branch-specific plausible range derived from
//! the branch's own history.
//!
//! The recipe per branch:
//! 1. Summary statistics over the full history (median, mean, min, max) and
//!    the clamp range `[target_lower, target_upper]`.
//! 2. Hindcast pass: re-estimate each historical week from the weeks before
//!    it, blended with the previous hindcast and shrunk toward the median.
//! 3. Seasonal residuals: the last four `actual - hindcast` differences,
//!    capped, are replayed cyclically on the future.
//! 4. Future pass: same baseline/trend/shrink recipe, each forecast feeding
//!    back into the history for the next step.

use super::{median, Forecast, Forecaster, ForecasterKind};
use crate::error::Result;

/// Clamp without panicking when the bounds cross
fn bound(value: f64, lower: f64, upper: f64) -> f64 {
    value.min(upper).max(lower)
}

/// Per-branch statistics over the full history
#[derive(Debug, Clone, PartialEq)]
pub struct BranchStats {
    pub median: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Lower clamp for all produced values
    pub target_lower: f64,
    /// Upper clamp for all produced values
    pub target_upper: f64,
    /// Cap for seasonal residuals and scale of the synthetic wiggle
    pub base_variation: f64,
}

impl BranchStats {
    /// Compute statistics, or None for an empty history
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let median = median(values);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let lower_bound = (min * 0.5).max(0.0);
        let upper_ref = if max > 0.0 { max } else { mean.max(median) };
        let upper_bound = if upper_ref != 0.0 {
            (upper_ref * 1.2).max(lower_bound + 300.0)
        } else {
            lower_bound + 300.0
        };

        let (target_lower, target_upper) = if median != 0.0 {
            (
                (min * 0.6).max(lower_bound),
                upper_bound.min(median * 1.3),
            )
        } else {
            (lower_bound, upper_bound)
        };

        let center = if median != 0.0 { median } else { mean };
        let base_variation = ((max - min) * 0.25).max(center * 0.12);

        Some(Self {
            median,
            mean,
            min,
            max,
            target_lower,
            target_upper,
            base_variation,
        })
    }

    /// Clamp into the branch's plausible range
    pub fn clamp(&self, value: f64) -> f64 {
        bound(value, self.target_lower, self.target_upper)
    }

    /// Outlier-resistant level estimate for a history prefix
    pub fn robust_baseline(&self, history: &[f64]) -> f64 {
        match history.len() {
            0 => self.median,
            1 => 0.5 * self.median + 0.5 * self.min,
            n => {
                let recent = median(&history[n.saturating_sub(4)..]);
                if n == 2 {
                    0.45 * recent + 0.35 * self.median + 0.2 * self.min
                } else {
                    0.55 * recent + 0.25 * median(history) + 0.15 * self.median + 0.05 * self.min
                }
            }
        }
    }

    /// Half the average step over the last five points, capped
    pub fn trend_adjust(&self, history: &[f64]) -> f64 {
        if history.len() < 3 {
            return 0.0;
        }

        let span = history.len().min(5);
        let window = &history[history.len() - span..];
        let avg_diff = window.windows(2).map(|w| w[1] - w[0]).sum::<f64>() / (span - 1) as f64;

        let cap = if self.median != 0.0 {
            (self.median * 0.08).max(40.0)
        } else {
            40.0
        };
        bound(avg_diff * 0.5, -cap, cap)
    }

    /// Pull a candidate toward the branch median
    fn shrink(&self, candidate: f64, weight: f64) -> f64 {
        if self.median != 0.0 {
            weight * candidate + (1.0 - weight) * self.median
        } else {
            candidate
        }
    }
}

/// Dependency-free forecaster that never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct RobustHeuristicForecaster;

impl RobustHeuristicForecaster {
    /// Compute hindcasts and `future_count` forecasts
    ///
    /// An empty history forecasts zeros.
    pub fn compute(&self, values: &[f64], future_count: usize) -> Forecast {
        let Some(stats) = BranchStats::from_values(values) else {
            return Forecast {
                hindcasts: Vec::new(),
                future: vec![0.0; future_count],
            };
        };

        let hindcasts = Self::hindcast(&stats, values);
        let seasonal_pattern = Self::seasonal_pattern(&stats, values, &hindcasts);
        let future = Self::project(&stats, values, &seasonal_pattern, future_count);

        Forecast { hindcasts, future }
    }

    fn hindcast(stats: &BranchStats, values: &[f64]) -> Vec<f64> {
        let mut hindcasts: Vec<f64> = Vec::with_capacity(values.len());

        for idx in 0..values.len() {
            if idx == 0 {
                hindcasts.push(stats.clamp(values[0]));
                continue;
            }

            let history = &values[..idx];
            let mut candidate = stats.robust_baseline(history) + stats.trend_adjust(history);
            candidate = 0.7 * candidate + 0.3 * hindcasts[idx - 1];

            let weight = if history.len() > 3 {
                0.5
            } else if history.len() > 1 {
                0.3
            } else {
                0.15
            };
            candidate = stats.shrink(candidate, weight);

            hindcasts.push(stats.clamp(candidate));
        }

        hindcasts
    }

    /// Last (up to) four residuals, capped at the base variation
    fn seasonal_pattern(stats: &BranchStats, values: &[f64], hindcasts: &[f64]) -> Vec<f64> {
        let residuals: Vec<f64> = values
            .iter()
            .zip(hindcasts)
            .map(|(actual, smoothed)| actual - smoothed)
            .collect();

        let len = residuals.len().min(4);
        residuals[residuals.len() - len..]
            .iter()
            .map(|r| bound(*r, -stats.base_variation, stats.base_variation))
            .collect()
    }

    fn project(
        stats: &BranchStats,
        values: &[f64],
        seasonal_pattern: &[f64],
        future_count: usize,
    ) -> Vec<f64> {
        let residual_scale = if seasonal_pattern.is_empty() { 0.0 } else { 0.5 };
        let local_range = stats.max - stats.min;

        let mut history = values.to_vec();
        let mut future: Vec<f64> = Vec::with_capacity(future_count);

        for step in 0..future_count {
            let mut candidate = stats.robust_baseline(&history) + stats.trend_adjust(&history);
            if let Some(previous) = future.last() {
                candidate = 0.75 * candidate + 0.25 * previous;
            }

            let weight = if history.len() > 5 {
                0.55
            } else if history.len() > 2 {
                0.35
            } else {
                0.2
            };
            candidate = stats.shrink(candidate, weight);

            let mut seasonal_adj = if seasonal_pattern.is_empty() {
                0.0
            } else {
                seasonal_pattern[step % seasonal_pattern.len()] * residual_scale
            };
            // A flat residual still gets a mild four-phase wiggle when the
            // branch has any spread at all
            if seasonal_adj == 0.0 && local_range > 0.0 {
                let phase = (step % 4) as f64;
                seasonal_adj = ((phase - 1.5) / 1.5) * stats.base_variation * 0.1;
            }

            let value = stats.clamp(candidate + seasonal_adj);
            future.push(value);
            history.push(value);
        }

        future
    }
}

impl Forecaster for RobustHeuristicForecaster {
    fn kind(&self) -> ForecasterKind {
        ForecasterKind::Heuristic
    }

    fn forecast(&self, values: &[f64], future_count: usize) -> Result<Forecast> {
        Ok(self.compute(values, future_count))
    }
}
