//! Database access layer with connection pooling and migrations
//!
//! Every table holds derived report documents that are recomputed on each
//! pipeline run, so writes are replace-all inside one SQL transaction.
//!
//! This module is organized by domain:
//! - `forecast` - The 17-week forecast window (also a `ForecastSink`)
//! - `reports` - Weekly revenue, monthly growth, and sales-over-time documents

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::Result;

mod forecast;
mod reports;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) the database at `path` and apply migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(4).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a file in the temp directory rather than `:memory:` so every
    /// pooled connection sees the same data.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("swas_test_{}_{}.db", std::process::id(), id));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the replace-all writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Forecast window (at most 17 rows)
            CREATE TABLE IF NOT EXISTS forecast (
                week_start DATE PRIMARY KEY,
                doc TEXT NOT NULL,                         -- JSON ForecastOutputRow
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Weekly revenue report
            CREATE TABLE IF NOT EXISTS weekly_revenue (
                week_start DATE PRIMARY KEY,
                doc TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Twelve-month growth series, one row per (year, month)
            CREATE TABLE IF NOT EXISTS monthly_growth (
                year INTEGER NOT NULL,
                month_number INTEGER NOT NULL,             -- 1..12
                month TEXT NOT NULL,                       -- Jan..Dec
                doc TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (year, month_number)
            );

            -- Daily revenue rows as imported
            CREATE TABLE IF NOT EXISTS sales_over_time (
                date DATE PRIMARY KEY,
                doc TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }

    /// Number of rows in one of the report tables
    pub fn count_rows(&self, table: ReportTable) -> Result<i64> {
        let conn = self.conn()?;
        let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
        Ok(conn.query_row(&sql, [], |row| row.get(0))?)
    }

    /// Read every stored document of a table, ordered by its key
    fn list_documents<T: DeserializeOwned>(&self, table: ReportTable) -> Result<Vec<T>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT doc FROM {} ORDER BY {}",
            table.as_str(),
            table.order_by()
        );
        let mut stmt = conn.prepare(&sql)?;
        let docs = stmt
            .query_map(params![], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        docs.iter()
            .map(|doc| Ok(serde_json::from_str(doc)?))
            .collect()
    }
}

/// Tables holding report documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTable {
    Forecast,
    WeeklyRevenue,
    MonthlyGrowth,
    SalesOverTime,
}

impl ReportTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forecast => "forecast",
            Self::WeeklyRevenue => "weekly_revenue",
            Self::MonthlyGrowth => "monthly_growth",
            Self::SalesOverTime => "sales_over_time",
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            Self::Forecast | Self::WeeklyRevenue => "week_start",
            Self::MonthlyGrowth => "year, month_number",
            Self::SalesOverTime => "date",
        }
    }
}
