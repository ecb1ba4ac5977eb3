//! Integration tests for swas-core
//!
//! These tests exercise the full import → forecast → persist workflow.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use swas_core::{
    db::Database,
    engine::ForecastEngine,
    import::{parse_cleaned_revenue_csv, parse_daily_revenue_json},
    reports::{aggregate_monthly, build_twelve_month_series, weekly_revenue},
    sink::{ForecastSink, JsonFileSink},
    FixedClock, ForecastOutputRow,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Ten weeks of transactions for two branches, with a gap week and a
/// one-off spike at branch B2
fn cleaned_csv() -> String {
    let mut csv = String::from("date_time,transaction_id,revenue,branch_id\n");
    let start = date(2025, 1, 6);
    for day in 0..70 {
        let d = start + Duration::days(day);
        // The week of 2025-02-17 has no sales at all
        if (42..49).contains(&day) {
            continue;
        }
        csv.push_str(&format!("{}T10:00:00,t{}a,{:.2},B1\n", d, day, 120.0 + (day % 7) as f64 * 3.5));
        let b2 = if day == 53 { 2500.0 } else { 80.0 };
        csv.push_str(&format!("{}T15:30:00,t{}b,{:.2},B2\n", d, day, b2));
    }
    csv
}

fn window_as_of(today: NaiveDate) -> Vec<ForecastOutputRow> {
    let rows = parse_cleaned_revenue_csv(cleaned_csv().as_bytes()).unwrap();
    ForecastEngine::default().run(&rows, &FixedClock::new(today))
}

#[test]
fn test_window_has_17_contiguous_mondays() {
    let window = window_as_of(date(2025, 3, 12));
    assert_eq!(window.len(), 17);
    assert!(window.iter().all(|r| r.week_start.weekday() == Weekday::Mon));
    for pair in window.windows(2) {
        assert_eq!(pair[1].week_start - pair[0].week_start, Duration::weeks(1));
    }
    assert_eq!(window[4].week_start, date(2025, 3, 10));
}

#[test]
fn test_window_invariants_hold() {
    let window = window_as_of(date(2025, 3, 12));

    for row in &window {
        let display_sum: f64 = row.display.values().sum();
        assert!((row.total - display_sum).abs() < 0.011);

        for (branch, shown) in &row.display {
            let expected = row.forecast[branch].or(row.actual[branch]).unwrap_or(0.0);
            assert_eq!(*shown, expected);
            assert!(*shown >= 0.0);
        }

        // Actuals only exist up to the last week with data
        if row.week_start > date(2025, 3, 10) {
            assert_eq!(row.actual_total, None);
        }
    }

    // The gap week still has zero actuals
    let gap = window.iter().find(|r| r.week_start == date(2025, 2, 17)).unwrap();
    assert_eq!(gap.actual_total, Some(0.0));
}

#[test]
fn test_empty_input_window() {
    let window = ForecastEngine::default().run(&[], &FixedClock::new(date(2025, 3, 12)));
    assert_eq!(window.len(), 17);
    for row in &window {
        assert!(row.display.is_empty());
        assert_eq!(row.total, 0.0);
        assert_eq!(row.forecast_total, None);
        assert_eq!(row.actual_total, None);
    }
}

#[test]
fn test_engine_is_deterministic() {
    let a = serde_json::to_vec(&window_as_of(date(2025, 3, 12))).unwrap();
    let b = serde_json::to_vec(&window_as_of(date(2025, 3, 12))).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_daily_json_round_trip_feeds_engine() {
    // Daily rows written by the import step read back identically
    let rows = parse_cleaned_revenue_csv(cleaned_csv().as_bytes()).unwrap();
    let json = serde_json::to_string(&rows).unwrap();
    let reread = parse_daily_revenue_json(json.as_bytes()).unwrap();
    assert_eq!(reread.len(), rows.len());

    let clock = FixedClock::new(date(2025, 3, 12));
    let engine = ForecastEngine::default();
    assert_eq!(engine.run(&rows, &clock), engine.run(&reread, &clock));
}

#[test]
fn test_full_pipeline_persists_everything() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let clock = FixedClock::new(date(2025, 3, 12));

    let rows = parse_cleaned_revenue_csv(cleaned_csv().as_bytes()).unwrap();
    let window = ForecastEngine::default().run(&rows, &clock);

    let json_sink = JsonFileSink::new(dir.path().join("weekly_forecast.json"));
    let sinks: Vec<&dyn ForecastSink> = vec![&json_sink, &db];
    for sink in sinks {
        assert_eq!(sink.replace_all(&window).unwrap(), 17, "{}", sink.name());
    }
    assert_eq!(db.list_forecast().unwrap(), window);

    let weekly = weekly_revenue(&rows, Some(window[0].week_start));
    assert!(weekly.iter().all(|w| w.week_start >= window[0].week_start));
    db.replace_weekly_revenue(&weekly).unwrap();

    let series = build_twelve_month_series(&aggregate_monthly(&rows), &clock);
    assert_eq!(series.len(), 12);
    assert!(series[0].total > 0.0);
    // Data ends in March
    assert!(series[3..].iter().all(|m| m.total == 0.0));
    db.replace_monthly_growth(2025, &series).unwrap();

    db.replace_sales_over_time(&rows).unwrap();
    assert_eq!(db.list_sales_over_time().unwrap().len(), rows.len());
}
