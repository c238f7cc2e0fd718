//! Warehouse layer for daily feed metrics.
//!
//! Each run upserts one [`DailyAggregate`] row per (feed, date) and later
//! asks for the mean count/size over a historical window. The default
//! implementation ([`engine::SqliteBaselineStore`]) keeps the table in a
//! single SQLite database.

pub mod engine;
pub mod error;


use chrono::NaiveDate;
use error::Result;
use feedmon_common::types::{BaselineSummary, DailyAggregate};

/// Inclusive date range for one feed's stored metrics.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use feedmon_storage::MetricRange;
///
/// let range = MetricRange {
///     feed_label: "Web Impressions".into(),
///     start: NaiveDate::from_ymd_opt(2025, 5, 18).unwrap(),
///     end: NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(),
/// };
/// assert_eq!(range.feed_label, "Web Impressions");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRange {
    pub feed_label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MetricRange {
    pub fn new(feed_label: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            feed_label: feed_label.to_string(),
            start,
            end,
        }
    }
}

/// Persistence backend for daily feed aggregates.
///
/// Writes are keyed by `(feed_label, date)`: writing the same key twice
/// leaves a single row holding the latest values.
pub trait BaselineStore: Send + Sync {
    /// Inserts or overwrites the row for `(aggregate.feed_label, aggregate.date)`.
    fn upsert_daily_metric(&self, aggregate: &DailyAggregate) -> Result<()>;

    /// Mean `file_count` and `total_size_mb` over the stored rows in `range`.
    ///
    /// Returns the zero summary when no rows match; never an error for an
    /// empty window.
    fn query_baseline(&self, range: &MetricRange) -> Result<BaselineSummary>;

    /// Stored rows in `range`, ordered by date.
    fn daily_metrics(&self, range: &MetricRange) -> Result<Vec<DailyAggregate>>;
}
