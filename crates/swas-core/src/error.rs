//! Error types for swas

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A daily row without a parseable date. Skipped by the importer.
    #[error("Malformed input row: {0}")]
    MalformedInputRow(String),

    /// A forecasting model was requested but is not compiled in.
    #[error("Forecasting capability unavailable: {0}")]
    UnavailableCapability(String),

    /// A forecasting model could not fit or predict the series.
    #[error("Forecast fit failed: {0}")]
    FitFailure(String),

    #[error("Sink error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, Error>;
