//! Holt's linear trend smoothing

use super::{Forecast, Forecaster, ForecasterKind};
use crate::error::{Error, Result};

const MIN_OBSERVATIONS: usize = 3;

/// Holt's method with alpha and beta picked by grid search
#[derive(Debug, Clone)]
pub struct TrendSmoothingForecaster {
    /// Candidate values tried for both alpha and beta
    grid: Vec<f64>,
}

impl Default for TrendSmoothingForecaster {
    fn default() -> Self {
        Self {
            grid: (1..=9).map(|i| i as f64 / 10.0).collect(),
        }
    }
}

/// Result of one smoothing pass
struct Fit {
    level: f64,
    trend: f64,
    fitted: Vec<f64>,
    sse: f64,
}

fn smooth(values: &[f64], alpha: f64, beta: f64) -> Fit {
    let mut level = values[0];
    let mut trend = values[1] - values[0];
    let mut fitted = Vec::with_capacity(values.len());
    let mut sse = 0.0;

    fitted.push(values[0]);
    for &value in &values[1..] {
        let predicted = level + trend;
        fitted.push(predicted);
        sse += (value - predicted).powi(2);

        let prev_level = level;
        level = alpha * value + (1.0 - alpha) * (level + trend);
        trend = beta * (level - prev_level) + (1.0 - beta) * trend;
    }

    Fit {
        level,
        trend,
        fitted,
        sse,
    }
}

impl Forecaster for TrendSmoothingForecaster {
    fn kind(&self) -> ForecasterKind {
        ForecasterKind::TrendSmoothing
    }

    fn forecast(&self, values: &[f64], future_count: usize) -> Result<Forecast> {
        if values.len() < MIN_OBSERVATIONS {
            return Err(Error::FitFailure(format!(
                "trend smoothing needs {} observations, got {}",
                MIN_OBSERVATIONS,
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::FitFailure("non-finite observation".into()));
        }

        let mut best: Option<Fit> = None;
        for &alpha in &self.grid {
            for &beta in &self.grid {
                let fit = smooth(values, alpha, beta);
                if best.as_ref().map_or(true, |b| fit.sse < b.sse) {
                    best = Some(fit);
                }
            }
        }
        let best = best.ok_or_else(|| Error::FitFailure("empty parameter grid".into()))?;

        let future = (1..=future_count)
            .map(|h| (best.level + h as f64 * best.trend).max(0.0))
            .collect();
        let hindcasts = best.fitted.into_iter().map(|v| v.max(0.0)).collect();

        Ok(Forecast { hindcasts, future })
    }
}
