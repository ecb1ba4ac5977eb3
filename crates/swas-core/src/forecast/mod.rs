//! Weekly revenue forecasters
//!
//! Every forecaster takes one branch's weekly history (oldest first) and
//! returns a smoothed re-estimate of that history (hindcasts) plus the next
//! `future_count` weeks.
//!
//! ## Model selection
//!
//! `ForecasterChain` holds forecasters in preference order. The chain is
//! assembled once from configuration: models that are not compiled in are
//! dropped at construction with a warning. At call time each model is tried
//! in turn and a fit failure falls through to the next one. The robust
//! heuristic always terminates the chain and cannot fail.
//!
//! - `heuristic` - `RobustHeuristicForecaster`, dependency-free, the default
//! - `seasonal_regression` - linear trend plus period-4 seasonal factors
//! - `trend_smoothing` - Holt's linear exponential smoothing
//!
//! The last two require the `advanced-models` feature.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{Error, Result};

mod heuristic;
#[cfg(feature = "advanced-models")]
mod seasonal;
#[cfg(feature = "advanced-models")]
mod smoothing;

pub use heuristic::{BranchStats, RobustHeuristicForecaster};
#[cfg(feature = "advanced-models")]
pub use seasonal::SeasonalRegressionForecaster;
#[cfg(feature = "advanced-models")]
pub use smoothing::TrendSmoothingForecaster;

/// Hindcasts and future values for one branch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    /// Same length as the history
    pub hindcasts: Vec<f64>,
    /// `future_count` values following the last observed week
    pub future: Vec<f64>,
}

/// Available forecasting models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecasterKind {
    SeasonalRegression,
    TrendSmoothing,
    Heuristic,
}

impl ForecasterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeasonalRegression => "seasonal_regression",
            Self::TrendSmoothing => "trend_smoothing",
            Self::Heuristic => "heuristic",
        }
    }

    /// All kinds, in default priority order
    pub fn all() -> &'static [ForecasterKind] {
        &[
            Self::SeasonalRegression,
            Self::TrendSmoothing,
            Self::Heuristic,
        ]
    }

    /// Instantiate the model, if it was compiled in
    pub fn build(self) -> Result<Box<dyn Forecaster>> {
        match self {
            Self::Heuristic => Ok(Box::new(RobustHeuristicForecaster)),
            #[cfg(feature = "advanced-models")]
            Self::SeasonalRegression => Ok(Box::new(SeasonalRegressionForecaster::default())),
            #[cfg(feature = "advanced-models")]
            Self::TrendSmoothing => Ok(Box::new(TrendSmoothingForecaster::default())),
            #[cfg(not(feature = "advanced-models"))]
            Self::SeasonalRegression | Self::TrendSmoothing => Err(Error::UnavailableCapability(
                format!("{} requires the advanced-models feature", self.as_str()),
            )),
        }
    }
}

impl fmt::Display for ForecasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ForecasterKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seasonal_regression" => Ok(Self::SeasonalRegression),
            "trend_smoothing" => Ok(Self::TrendSmoothing),
            "heuristic" => Ok(Self::Heuristic),
            _ => Err(format!(
                "Unknown forecast model: {} (valid: seasonal_regression, trend_smoothing, heuristic)",
                s
            )),
        }
    }
}

/// A weekly forecasting model
pub trait Forecaster: Send + Sync {
    fn kind(&self) -> ForecasterKind;

    /// Fit `values` (oldest first) and forecast `future_count` weeks ahead
    fn forecast(&self, values: &[f64], future_count: usize) -> Result<Forecast>;
}

/// Ordered forecasters with the heuristic as terminal fallback
pub struct ForecasterChain {
    forecasters: Vec<Box<dyn Forecaster>>,
}

impl Default for ForecasterChain {
    fn default() -> Self {
        Self::heuristic_only()
    }
}

impl ForecasterChain {
    /// Chain containing only the robust heuristic
    pub fn heuristic_only() -> Self {
        Self {
            forecasters: vec![Box::new(RobustHeuristicForecaster)],
        }
    }

    /// Build a chain from kinds in preference order
    ///
    /// Unavailable kinds are skipped. Anything listed after the heuristic is
    /// unreachable and dropped. The heuristic is appended when missing.
    pub fn from_kinds(kinds: &[ForecasterKind]) -> Self {
        let mut forecasters: Vec<Box<dyn Forecaster>> = Vec::new();

        for kind in kinds {
            if forecasters.iter().any(|f| f.kind() == *kind) {
                continue;
            }
            match kind.build() {
                Ok(forecaster) => forecasters.push(forecaster),
                Err(e) => warn!(model = kind.as_str(), error = %e, "Forecast model unavailable"),
            }
            if *kind == ForecasterKind::Heuristic {
                break;
            }
        }

        if forecasters
            .last()
            .map_or(true, |f| f.kind() != ForecasterKind::Heuristic)
        {
            forecasters.push(Box::new(RobustHeuristicForecaster));
        }

        debug!(
            models = ?forecasters.iter().map(|f| f.kind().as_str()).collect::<Vec<_>>(),
            "Forecaster chain assembled"
        );
        Self { forecasters }
    }

    /// Build a chain from configured model names
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let kinds = names
            .iter()
            .map(|n| n.as_ref().parse::<ForecasterKind>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Config)?;
        Ok(Self::from_kinds(&kinds))
    }

    /// Models in the order they are tried
    pub fn kinds(&self) -> Vec<ForecasterKind> {
        self.forecasters.iter().map(|f| f.kind()).collect()
    }

    /// Forecast with the first model that succeeds
    ///
    /// Returns the forecast and the model that produced it.
    pub fn forecast(&self, values: &[f64], future_count: usize) -> (Forecast, ForecasterKind) {
        for forecaster in &self.forecasters {
            match forecaster.forecast(values, future_count) {
                Ok(forecast) => return (forecast, forecaster.kind()),
                Err(e) => {
                    debug!(
                        model = forecaster.kind().as_str(),
                        error = %e,
                        "Forecast model failed, falling back"
                    );
                }
            }
        }

        (
            RobustHeuristicForecaster.compute(values, future_count),
            ForecasterKind::Heuristic,
        )
    }
}

/// Median of a slice (mean of the middle pair for even lengths)
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always fails, to exercise fallback
    struct Broken;

    impl Forecaster for Broken {
        fn kind(&self) -> ForecasterKind {
            ForecasterKind::SeasonalRegression
        }

        fn forecast(&self, _values: &[f64], _future_count: usize) -> Result<Forecast> {
            Err(Error::FitFailure("broken on purpose".into()))
        }
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[3.0]), 3.0);
        assert_eq!(median(&[5.0, 1.0, 3.0]), 3.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_kind_round_trip_names() {
        for kind in ForecasterKind::all() {
            assert_eq!(kind.as_str().parse::<ForecasterKind>().unwrap(), *kind);
        }
        assert!("prophet".parse::<ForecasterKind>().is_err());
    }

    #[test]
    fn test_default_chain_is_heuristic() {
        let chain = ForecasterChain::default();
        assert_eq!(chain.kinds(), vec![ForecasterKind::Heuristic]);
    }

    #[test]
    fn test_chain_appends_heuristic() {
        let chain = ForecasterChain::from_kinds(&[]);
        assert_eq!(chain.kinds(), vec![ForecasterKind::Heuristic]);
    }

    #[test]
    fn test_chain_drops_models_after_heuristic() {
        let chain = ForecasterChain::from_kinds(&[
            ForecasterKind::Heuristic,
            ForecasterKind::TrendSmoothing,
        ]);
        assert_eq!(chain.kinds(), vec![ForecasterKind::Heuristic]);
    }

    #[cfg(feature = "advanced-models")]
    #[test]
    fn test_chain_keeps_configured_order() {
        let chain = ForecasterChain::from_names(&["trend_smoothing", "seasonal_regression"]).unwrap();
        assert_eq!(
            chain.kinds(),
            vec![
                ForecasterKind::TrendSmoothing,
                ForecasterKind::SeasonalRegression,
                ForecasterKind::Heuristic
            ]
        );
    }

    #[cfg(not(feature = "advanced-models"))]
    #[test]
    fn test_chain_skips_unavailable_models() {
        let chain = ForecasterChain::from_names(&["trend_smoothing", "seasonal_regression"]).unwrap();
        assert_eq!(chain.kinds(), vec![ForecasterKind::Heuristic]);
    }

    #[test]
    fn test_chain_rejects_unknown_names() {
        let result = ForecasterChain::from_names(&["heuristic", "arima"]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_fit_failure_falls_back_to_heuristic() {
        let chain = ForecasterChain {
            forecasters: vec![Box::new(Broken), Box::new(RobustHeuristicForecaster)],
        };
        let values = [100.0, 120.0, 110.0];
        let (forecast, used) = chain.forecast(&values, 3);

        assert_eq!(used, ForecasterKind::Heuristic);
        assert_eq!(forecast, RobustHeuristicForecaster.compute(&values, 3));
    }

    #[test]
    fn test_chain_without_terminal_still_answers() {
        let chain = ForecasterChain {
            forecasters: vec![Box::new(Broken)],
        };
        let (forecast, used) = chain.forecast(&[], 2);
        assert_eq!(used, ForecasterKind::Heuristic);
        assert_eq!(forecast.future, vec![0.0, 0.0]);
    }
}
