//! Weekly aggregation of daily revenue
//!
//! Daily rows are treated as a dense calendar: days missing between the first
//! and last observed date count as zero revenue, and every Monday-anchored
//! week in that span gets a bucket even when nothing was sold.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{BranchSeries, BranchValues, DailyRevenueRow, WeeklyBucket, TOTAL_KEY};

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Dense weekly actuals for every branch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyActuals {
    /// Branch identifiers, ascending
    pub branches: Vec<String>,
    /// One bucket per week, ascending and contiguous
    pub buckets: Vec<WeeklyBucket>,
}

impl WeeklyActuals {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Week starts that have historical data, ascending
    pub fn hist_weeks(&self) -> Vec<NaiveDate> {
        self.buckets.iter().map(|b| b.week_start).collect()
    }

    /// Most recent week with data
    pub fn last_week(&self) -> Option<NaiveDate> {
        self.buckets.last().map(|b| b.week_start)
    }

    /// Bucket for a given Monday
    pub fn bucket(&self, week: NaiveDate) -> Option<&WeeklyBucket> {
        self.buckets
            .binary_search_by_key(&week, |b| b.week_start)
            .ok()
            .map(|i| &self.buckets[i])
    }

    /// Weekly series for one branch (zero where the branch had no sales)
    pub fn series(&self, branch: &str) -> BranchSeries {
        BranchSeries {
            branch: branch.to_string(),
            points: self
                .buckets
                .iter()
                .map(|b| (b.week_start, b.branches.get(branch).copied().unwrap_or(0.0)))
                .collect(),
        }
    }

    /// Series for every branch, in branch order
    pub fn all_series(&self) -> Vec<BranchSeries> {
        self.branches.iter().map(|b| self.series(b)).collect()
    }
}

/// Sum daily rows into dense Monday-anchored weekly buckets
///
/// The branch set is the union of keys across all rows (never `total`).
/// Empty input yields empty actuals.
pub fn aggregate_weekly(rows: &[DailyRevenueRow]) -> WeeklyActuals {
    let (Some(min_date), Some(max_date)) = (
        rows.iter().map(|r| r.date).min(),
        rows.iter().map(|r| r.date).max(),
    ) else {
        return WeeklyActuals::default();
    };

    let branches: Vec<String> = rows
        .iter()
        .flat_map(|r| r.branches.keys())
        .filter(|k| k.as_str() != TOTAL_KEY)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let first_week = week_start(min_date);
    let last_week = week_start(max_date);
    let week_count = ((last_week - first_week).num_days() / 7 + 1) as usize;

    let zeroed: BranchValues = branches.iter().map(|b| (b.clone(), 0.0)).collect();
    let mut buckets: Vec<WeeklyBucket> = (0..week_count)
        .map(|i| WeeklyBucket {
            week_start: first_week + Duration::weeks(i as i64),
            branches: zeroed.clone(),
        })
        .collect();

    for row in rows {
        let index = ((week_start(row.date) - first_week).num_days() / 7) as usize;
        let bucket = &mut buckets[index];
        for (branch, value) in &row.branches {
            if let Some(sum) = bucket.branches.get_mut(branch) {
                *sum += value;
            }
        }
    }

    tracing::debug!(
        weeks = buckets.len(),
        branches = branches.len(),
        "Aggregated daily revenue into weekly buckets"
    );

    WeeklyActuals { branches, buckets }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(d: NaiveDate, values: &[(&str, f64)]) -> DailyRevenueRow {
        DailyRevenueRow::new(
            d,
            values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        )
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-01-06 is a Monday
        assert_eq!(week_start(date(2025, 1, 6)), date(2025, 1, 6));
        assert_eq!(week_start(date(2025, 1, 8)), date(2025, 1, 6));
        assert_eq!(week_start(date(2025, 1, 12)), date(2025, 1, 6));
        assert_eq!(week_start(date(2025, 1, 13)), date(2025, 1, 13));
        // Across a year boundary
        assert_eq!(week_start(date(2025, 1, 1)), date(2024, 12, 30));
    }

    #[test]
    fn test_empty_input() {
        let actuals = aggregate_weekly(&[]);
        assert!(actuals.is_empty());
        assert!(actuals.branches.is_empty());
        assert_eq!(actuals.last_week(), None);
    }

    #[test]
    fn test_sums_per_week_and_branch() {
        let rows = vec![
            row(date(2025, 1, 6), &[("B1", 10.0), ("B2", 1.0)]),
            row(date(2025, 1, 12), &[("B1", 5.5)]),
            row(date(2025, 1, 13), &[("B2", 2.0)]),
        ];
        let actuals = aggregate_weekly(&rows);

        assert_eq!(actuals.branches, vec!["B1".to_string(), "B2".to_string()]);
        assert_eq!(actuals.hist_weeks(), vec![date(2025, 1, 6), date(2025, 1, 13)]);

        let first = actuals.bucket(date(2025, 1, 6)).unwrap();
        assert_eq!(first.branches["B1"], 15.5);
        assert_eq!(first.branches["B2"], 1.0);
        assert_eq!(first.total(), 16.5);

        let second = actuals.bucket(date(2025, 1, 13)).unwrap();
        assert_eq!(second.branches["B1"], 0.0);
        assert_eq!(second.branches["B2"], 2.0);
    }

    #[test]
    fn test_gap_weeks_are_zero_filled() {
        let rows = vec![
            row(date(2025, 1, 7), &[("B1", 10.0)]),
            row(date(2025, 1, 29), &[("B1", 20.0)]),
        ];
        let actuals = aggregate_weekly(&rows);

        assert_eq!(
            actuals.hist_weeks(),
            vec![
                date(2025, 1, 6),
                date(2025, 1, 13),
                date(2025, 1, 20),
                date(2025, 1, 27)
            ]
        );
        assert_eq!(actuals.series("B1").values(), vec![10.0, 0.0, 0.0, 20.0]);
    }

    #[test]
    fn test_total_key_is_not_a_branch() {
        let mut r = row(date(2025, 1, 7), &[("B1", 10.0)]);
        r.branches.insert("total".into(), 10.0);
        let actuals = aggregate_weekly(&[r]);
        assert_eq!(actuals.branches, vec!["B1".to_string()]);
    }

    #[test]
    fn test_weekly_sum_matches_daily_sum() {
        // Every day of one Monday-starting week plus spillover on both sides
        let mut rows = Vec::new();
        let mut expected = 0.0;
        for offset in -2..9 {
            let d = date(2025, 3, 3) + Duration::days(offset);
            let amount = 17.35 + offset as f64 * 3.1;
            if (0..7).contains(&offset) {
                expected += amount;
            }
            rows.push(row(d, &[("B1", amount)]));
        }
        let actuals = aggregate_weekly(&rows);
        let bucket = actuals.bucket(date(2025, 3, 3)).unwrap();
        assert!((bucket.branches["B1"] - expected).abs() < 0.005);
    }

    #[test]
    fn test_unsorted_input() {
        let rows = vec![
            row(date(2025, 1, 20), &[("B1", 3.0)]),
            row(date(2025, 1, 6), &[("B1", 1.0)]),
        ];
        let actuals = aggregate_weekly(&rows);
        assert_eq!(actuals.series("B1").values(), vec![1.0, 0.0, 3.0]);
    }
}
