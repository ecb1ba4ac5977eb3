//! Swas CLI - Branch revenue analytics
//!
//! Usage:
//!   swas daily --cleaned cleaned.csv     Build daily_revenue.json
//!   swas forecast daily_revenue.json     Build the 17-week forecast window
//!   swas run --cleaned cleaned.csv       Run the whole pipeline
//!   swas show                            Print the stored forecast

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let ctx = commands::AppContext::load(cli.config.as_deref(), cli.db, cli.today)?;

    match cli.command {
        Commands::Daily { cleaned, out } => {
            commands::cmd_daily(&ctx, &cleaned, out.as_deref()).map(|_| ())
        }
        Commands::Forecast { file, no_db } => commands::cmd_forecast(&ctx, &file, no_db),
        Commands::Weekly { file, no_db } => commands::cmd_weekly(&ctx, &file, no_db),
        Commands::Monthly { file, no_db } => commands::cmd_monthly(&ctx, &file, no_db),
        Commands::Sales { file } => commands::cmd_sales(&ctx, &file),
        Commands::Run { cleaned, no_db } => commands::cmd_run(&ctx, &cleaned, no_db),
        Commands::Show => commands::cmd_show(&ctx),
    }
}
