//! Revenue reports derived from daily rows
//!
//! - `weekly`: sparse Monday-anchored sums for the weekly revenue chart
//! - `monthly`: per-month sums and the twelve-month growth series

pub mod monthly;
pub mod weekly;

pub use monthly::{aggregate_monthly, build_twelve_month_series, target_year};
pub use weekly::weekly_revenue;
