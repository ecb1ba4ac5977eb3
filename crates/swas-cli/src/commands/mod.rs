//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared context (config, clock, database) and input loading
//! - `daily` - Cleaned CSV to daily revenue JSON
//! - `forecast` - The 17-week forecast window
//! - `reports` - Weekly revenue, monthly growth, sales over time
//! - `run` - Full pipeline
//! - `show` - Print the stored forecast

pub mod core;
pub mod daily;
pub mod forecast;
pub mod reports;
pub mod run;
pub mod show;

// Re-export command functions for main.rs
pub use core::*;
pub use daily::*;
pub use forecast::*;
pub use reports::*;
pub use run::*;
pub use show::*;
