//! Forecast window persistence

use rusqlite::params;
use tracing::info;

use super::{Database, ReportTable};
use crate::error::Result;
use crate::models::ForecastOutputRow;
use crate::sink::ForecastSink;
use crate::window::WINDOW_WEEKS;

impl Database {
    /// Replace the stored forecast window
    ///
    /// Only the last `WINDOW_WEEKS` rows are kept. Returns the number stored.
    pub fn replace_forecast(&self, rows: &[ForecastOutputRow]) -> Result<usize> {
        let rows = &rows[rows.len().saturating_sub(WINDOW_WEEKS)..];

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM forecast", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO forecast (week_start, doc) VALUES (?1, ?2)")?;
            for row in rows {
                let doc = serde_json::to_string(row)?;
                stmt.execute(params![row.week_start.to_string(), doc])?;
            }
        }
        tx.commit()?;

        info!("Stored {} forecast rows", rows.len());
        Ok(rows.len())
    }

    /// Stored forecast window, ascending by week
    pub fn list_forecast(&self) -> Result<Vec<ForecastOutputRow>> {
        self.list_documents(ReportTable::Forecast)
    }
}

impl ForecastSink for Database {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn replace_all(&self, rows: &[ForecastOutputRow]) -> Result<usize> {
        self.replace_forecast(rows)
    }
}
