//! Data models for revenue rows, weekly series, forecasts, and reports
//!
//! Branch-keyed rows serialize "flat": the branch identifiers become
//! top-level JSON keys next to the date and `total`, which is the shape the
//! downstream dashboards read.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reserved key holding the cross-branch sum in flat rows
pub const TOTAL_KEY: &str = "total";

/// Round to cents, ties to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Per-branch amounts, ordered by branch identifier
pub type BranchValues = BTreeMap<String, f64>;

// ========== Daily Input ==========

/// One day of revenue across all branches
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRevenueRow {
    pub date: NaiveDate,
    pub branches: BranchValues,
    /// Sum across branches as reported upstream. Not trusted by the engine.
    pub total: f64,
}

impl DailyRevenueRow {
    /// Build a row and derive its total from the branch values
    pub fn new(date: NaiveDate, branches: BranchValues) -> Self {
        let total = branches.values().sum();
        Self {
            date,
            branches,
            total,
        }
    }
}

impl Serialize for DailyRevenueRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.branches.len() + 2))?;
        map.serialize_entry("date", &self.date.to_string())?;
        for (branch, value) in &self.branches {
            map.serialize_entry(branch, &round2(*value))?;
        }
        map.serialize_entry(TOTAL_KEY, &round2(self.total))?;
        map.end()
    }
}

// ========== Weekly Series ==========

/// Monday-anchored weekly sums per branch
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyBucket {
    /// Always a Monday
    pub week_start: NaiveDate,
    pub branches: BranchValues,
}

impl WeeklyBucket {
    pub fn total(&self) -> f64 {
        self.branches.values().sum()
    }
}

/// Weekly values for a single branch, strictly increasing in `week_start`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BranchSeries {
    pub branch: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl BranchSeries {
    /// Values oldest to newest
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }
}

// ========== Forecast Output ==========

/// One week of the forecast window
///
/// Serializes as:
/// `{"week_start", "forecast": {branch.., "total"}, "actual": {branch.., "total"}, branch.., "total"}`
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutputRow {
    pub week_start: NaiveDate,
    pub forecast: BTreeMap<String, Option<f64>>,
    pub forecast_total: Option<f64>,
    pub actual: BTreeMap<String, Option<f64>>,
    pub actual_total: Option<f64>,
    /// Value shown per branch: forecast, else actual, else zero
    pub display: BranchValues,
    /// Sum of the display values
    pub total: f64,
}

/// Serializes a branch map with an extra `total` entry
struct WithTotal<'a> {
    values: &'a BTreeMap<String, Option<f64>>,
    total: Option<f64>,
}

impl Serialize for WithTotal<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        for (branch, value) in self.values {
            map.serialize_entry(branch, value)?;
        }
        map.serialize_entry(TOTAL_KEY, &self.total)?;
        map.end()
    }
}

impl Serialize for ForecastOutputRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.display.len() + 4))?;
        map.serialize_entry("week_start", &self.week_start.to_string())?;
        map.serialize_entry(
            "forecast",
            &WithTotal {
                values: &self.forecast,
                total: self.forecast_total,
            },
        )?;
        map.serialize_entry(
            "actual",
            &WithTotal {
                values: &self.actual,
                total: self.actual_total,
            },
        )?;
        for (branch, value) in &self.display {
            map.serialize_entry(branch, value)?;
        }
        map.serialize_entry(TOTAL_KEY, &self.total)?;
        map.end()
    }
}

#[derive(Deserialize)]
struct RawForecastRow {
    week_start: NaiveDate,
    forecast: BTreeMap<String, Option<f64>>,
    actual: BTreeMap<String, Option<f64>>,
    #[serde(flatten)]
    rest: BTreeMap<String, serde_json::Value>,
}

impl<'de> Deserialize<'de> for ForecastOutputRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = RawForecastRow::deserialize(deserializer)?;

        let forecast_total = raw.forecast.remove(TOTAL_KEY).flatten();
        let actual_total = raw.actual.remove(TOTAL_KEY).flatten();

        let total = raw
            .rest
            .remove(TOTAL_KEY)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| D::Error::missing_field(TOTAL_KEY))?;

        let mut display = BranchValues::new();
        for (branch, value) in raw.rest {
            let amount = value
                .as_f64()
                .ok_or_else(|| D::Error::custom(format!("branch {} is not a number", branch)))?;
            display.insert(branch, amount);
        }

        Ok(Self {
            week_start: raw.week_start,
            forecast: raw.forecast,
            forecast_total,
            actual: raw.actual,
            actual_total,
            display,
            total,
        })
    }
}

// ========== Report Models ==========

/// A week of the weekly revenue report
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyRevenueRow {
    pub week_start: NaiveDate,
    pub branches: BranchValues,
    pub total: f64,
}

impl Serialize for WeeklyRevenueRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.branches.len() + 2))?;
        map.serialize_entry("week_start", &self.week_start.to_string())?;
        for (branch, value) in &self.branches {
            map.serialize_entry(branch, value)?;
        }
        map.serialize_entry(TOTAL_KEY, &self.total)?;
        map.end()
    }
}

/// Revenue for one calendar month, keyed `YYYY-MM`
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRevenue {
    pub month: String,
    pub branches: BranchValues,
    pub total: f64,
}

/// One month of the twelve-month growth series
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyGrowthRow {
    /// Abbreviated month name ("Jan".."Dec")
    pub month: String,
    pub year: i32,
    pub branches: BranchValues,
    pub total: f64,
}

impl Serialize for MonthlyGrowthRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.branches.len() + 3))?;
        map.serialize_entry("month", &self.month)?;
        map.serialize_entry("Year", &self.year)?;
        for (branch, value) in &self.branches {
            map.serialize_entry(branch, value)?;
        }
        map.serialize_entry(TOTAL_KEY, &self.total)?;
        map.end()
    }
}
