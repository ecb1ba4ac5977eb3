//! Linear trend with period-4 seasonal factors

use super::{Forecast, Forecaster, ForecasterKind};
use crate::error::{Error, Result};

/// Weeks per seasonal cycle
const PERIOD: usize = 4;

/// Ordinary least-squares trend plus additive seasonal factors
///
/// Factors are the per-phase means of the detrended series, centred so they
/// sum to zero. Needs two full cycles of history.
#[derive(Debug, Clone)]
pub struct SeasonalRegressionForecaster {
    period: usize,
    min_observations: usize,
}

impl Default for SeasonalRegressionForecaster {
    fn default() -> Self {
        Self {
            period: PERIOD,
            min_observations: PERIOD * 2,
        }
    }
}

impl SeasonalRegressionForecaster {
    /// Fit `intercept + slope * t`
    fn fit_trend(values: &[f64]) -> Result<(f64, f64)> {
        let n = values.len() as f64;
        let t_mean = (n - 1.0) / 2.0;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (t, y) in values.iter().enumerate() {
            let dt = t as f64 - t_mean;
            sxy += dt * (y - y_mean);
            sxx += dt * dt;
        }

        if sxx.abs() < f64::EPSILON {
            return Err(Error::FitFailure("degenerate time axis".into()));
        }

        let slope = sxy / sxx;
        Ok((y_mean - slope * t_mean, slope))
    }

    fn seasonal_factors(&self, values: &[f64], intercept: f64, slope: f64) -> Vec<f64> {
        let mut sums = vec![0.0; self.period];
        let mut counts = vec![0usize; self.period];

        for (t, y) in values.iter().enumerate() {
            let phase = t % self.period;
            sums[phase] += y - (intercept + slope * t as f64);
            counts[phase] += 1;
        }

        let raw: Vec<f64> = sums
            .iter()
            .zip(&counts)
            .map(|(s, c)| if *c > 0 { s / *c as f64 } else { 0.0 })
            .collect();
        let centre = raw.iter().sum::<f64>() / self.period as f64;
        raw.into_iter().map(|f| f - centre).collect()
    }
}

impl Forecaster for SeasonalRegressionForecaster {
    fn kind(&self) -> ForecasterKind {
        ForecasterKind::SeasonalRegression
    }

    fn forecast(&self, values: &[f64], future_count: usize) -> Result<Forecast> {
        if values.len() < self.min_observations {
            return Err(Error::FitFailure(format!(
                "seasonal regression needs {} observations, got {}",
                self.min_observations,
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::FitFailure("non-finite observation".into()));
        }

        let (intercept, slope) = Self::fit_trend(values)?;
        let factors = self.seasonal_factors(values, intercept, slope);
        let predict = |t: usize| (intercept + slope * t as f64 + factors[t % self.period]).max(0.0);

        let n = values.len();
        Ok(Forecast {
            hindcasts: (0..n).map(&predict).collect(),
            future: (n..n + future_count).map(&predict).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_two_cycles() {
        let values = [10.0; 7];
        let result = SeasonalRegressionForecaster::default().forecast(&values, 4);
        assert!(matches!(result, Err(Error::FitFailure(_))));
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut values = [10.0; 8];
        values[3] = f64::INFINITY;
        let result = SeasonalRegressionForecaster::default().forecast(&values, 4);
        assert!(matches!(result, Err(Error::FitFailure(_))));
    }

    #[test]
    fn test_recovers_trend_and_season() {
        // Pattern uncorrelated with t over whole cycles
        let pattern = [20.0, -20.0, -20.0, 20.0];
        let values: Vec<f64> = (0..12)
            .map(|t| 500.0 + 5.0 * t as f64 + pattern[t % 4])
            .collect();

        let forecast = SeasonalRegressionForecaster::default()
            .forecast(&values, 4)
            .unwrap();

        for (fitted, actual) in forecast.hindcasts.iter().zip(&values) {
            assert!((fitted - actual).abs() < 1e-6);
        }
        for (h, v) in forecast.future.iter().enumerate() {
            let t = 12 + h;
            let expected = 500.0 + 5.0 * t as f64 + pattern[t % 4];
            assert!((v - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_factors_sum_to_zero() {
        let values = [12.0, 40.0, 7.0, 19.0, 15.0, 33.0, 9.0, 22.0];
        let model = SeasonalRegressionForecaster::default();
        let (a, b) = SeasonalRegressionForecaster::fit_trend(&values).unwrap();
        let factors = model.seasonal_factors(&values, a, b);
        assert_eq!(factors.len(), 4);
        assert!(factors.iter().sum::<f64>().abs() < 1e-9);
    }

    #[test]
    fn test_output_is_non_negative() {
        let values = [800.0, 700.0, 600.0, 500.0, 400.0, 300.0, 200.0, 100.0];
        let forecast = SeasonalRegressionForecaster::default()
            .forecast(&values, 12)
            .unwrap();
        assert!(forecast.future.iter().all(|v| *v >= 0.0));
    }
}
