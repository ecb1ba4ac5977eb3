//! Report document persistence

use rusqlite::params;
use serde_json::Value;
use tracing::info;

use super::{Database, ReportTable};
use crate::error::{Error, Result};
use crate::models::{DailyRevenueRow, MonthlyGrowthRow, WeeklyRevenueRow};

impl Database {
    /// Replace the weekly revenue report
    pub fn replace_weekly_revenue(&self, rows: &[WeeklyRevenueRow]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM weekly_revenue", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO weekly_revenue (week_start, doc) VALUES (?1, ?2)")?;
            for row in rows {
                stmt.execute(params![
                    row.week_start.to_string(),
                    serde_json::to_string(row)?
                ])?;
            }
        }
        tx.commit()?;

        info!("Stored {} weekly revenue rows", rows.len());
        Ok(rows.len())
    }

    /// Replace the twelve-month series for one year
    ///
    /// Other years are left untouched. Every row must belong to `year`.
    pub fn replace_monthly_growth(&self, year: i32, rows: &[MonthlyGrowthRow]) -> Result<usize> {
        if let Some(row) = rows.iter().find(|r| r.year != year) {
            return Err(Error::InvalidData(format!(
                "monthly growth row for {} {} does not belong to {}",
                row.month, row.year, year
            )));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM monthly_growth WHERE year = ?1", params![year])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO monthly_growth (year, month_number, month, doc) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (index, row) in rows.iter().enumerate() {
                stmt.execute(params![
                    year,
                    index as i64 + 1,
                    row.month,
                    serde_json::to_string(row)?
                ])?;
            }
        }
        tx.commit()?;

        info!(year, "Stored {} monthly growth rows", rows.len());
        Ok(rows.len())
    }

    /// Replace the sales-over-time collection with the daily rows
    pub fn replace_sales_over_time(&self, rows: &[DailyRevenueRow]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM sales_over_time", [])?;
        {
            // Duplicate dates keep the last row
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO sales_over_time (date, doc) VALUES (?1, ?2)",
            )?;
            for row in rows {
                stmt.execute(params![row.date.to_string(), serde_json::to_string(row)?])?;
            }
        }
        tx.commit()?;

        info!("Stored {} sales-over-time rows", rows.len());
        Ok(rows.len())
    }

    pub fn list_weekly_revenue(&self) -> Result<Vec<Value>> {
        self.list_documents(ReportTable::WeeklyRevenue)
    }

    pub fn list_monthly_growth(&self) -> Result<Vec<Value>> {
        self.list_documents(ReportTable::MonthlyGrowth)
    }

    pub fn list_sales_over_time(&self) -> Result<Vec<Value>> {
        self.list_documents(ReportTable::SalesOverTime)
    }
}
