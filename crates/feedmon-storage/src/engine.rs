use crate::error::{Result, StorageError};
use crate::{BaselineStore, MetricRange};
use chrono::{NaiveDate, Utc};
use feedmon_common::types::{BaselineSummary, DailyAggregate};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const DATE_FORMAT: &str = "%Y-%m-%d";

const DAILY_METRICS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS feed_daily_metrics (
    feed_label TEXT NOT NULL,
    date TEXT NOT NULL,
    file_count INTEGER NOT NULL,
    total_size_mb REAL NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (feed_label, date)
);
CREATE INDEX IF NOT EXISTS idx_feed_daily_metrics_date
    ON feed_daily_metrics(date);
";

/// SQLite-backed [`BaselineStore`].
pub struct SqliteBaselineStore {
    conn: Mutex<Connection>,
}

impl SqliteBaselineStore {
    /// Opens (or creates) the database at `path` and ensures the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        tracing::info!(path = %path.display(), "Opened metrics store");
        Self::with_connection(conn)
    }

    /// A throwaway store, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(DAILY_METRICS_SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the connection, recovering from a poisoned Mutex if necessary.
    fn lock_connection(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| StorageError::InvalidDate {
        column: "date",
        value: value.to_string(),
    })
}

impl BaselineStore for SqliteBaselineStore {
    fn upsert_daily_metric(&self, aggregate: &DailyAggregate) -> Result<()> {
        let conn = self.lock_connection();
        conn.execute(
            "INSERT INTO feed_daily_metrics (feed_label, date, file_count, total_size_mb, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(feed_label, date) DO UPDATE SET
                file_count = excluded.file_count,
                total_size_mb = excluded.total_size_mb,
                updated_at = excluded.updated_at",
            rusqlite::params![
                &aggregate.feed_label,
                format_date(aggregate.date),
                aggregate.file_count as i64,
                aggregate.total_size_mb,
                Utc::now().timestamp_millis(),
            ],
        )?;
        tracing::debug!(
            feed = %aggregate.feed_label,
            date = %aggregate.date,
            file_count = aggregate.file_count,
            total_size_mb = aggregate.total_size_mb,
            "Upserted daily metric"
        );
        Ok(())
    }

    fn query_baseline(&self, range: &MetricRange) -> Result<BaselineSummary> {
        let conn = self.lock_connection();
        let row: Option<(Option<f64>, Option<f64>)> = conn
            .query_row(
                "SELECT AVG(file_count), AVG(total_size_mb) FROM feed_daily_metrics
                 WHERE feed_label = ?1 AND date BETWEEN ?2 AND ?3",
                rusqlite::params![
                    &range.feed_label,
                    format_date(range.start),
                    format_date(range.end)
                ],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((Some(avg_count), Some(avg_size_mb))) => {
                Ok(BaselineSummary::new(avg_count, avg_size_mb))
            }
            _ => {
                tracing::warn!(
                    feed = %range.feed_label,
                    start = %range.start,
                    end = %range.end,
                    "No historical data in baseline window"
                );
                Ok(BaselineSummary::default())
            }
        }
    }

    fn daily_metrics(&self, range: &MetricRange) -> Result<Vec<DailyAggregate>> {
        let conn = self.lock_connection();
        let mut stmt = conn.prepare_cached(
            "SELECT date, file_count, total_size_mb FROM feed_daily_metrics
             WHERE feed_label = ?1 AND date BETWEEN ?2 AND ?3
             ORDER BY date ASC",
        )?;
        let rows = stmt.query_map(
            rusqlite::params![
                &range.feed_label,
                format_date(range.start),
                format_date(range.end)
            ],
            |row| {
                let date: String = row.get(0)?;
                let file_count: i64 = row.get(1)?;
                let total_size_mb: f64 = row.get(2)?;
                Ok((date, file_count, total_size_mb))
            },
        )?;

        let mut results = Vec::new();
        for row in rows {
            let (date, file_count, total_size_mb) = row?;
            results.push(DailyAggregate {
                feed_label: range.feed_label.clone(),
                date: parse_date(&date)?,
                file_count: u64::try_from(file_count).map_err(|_| StorageError::OutOfRange {
                    column: "file_count",
                    value: file_count,
                })?,
                total_size_mb,
            });
        }
        Ok(results)
    }
}
