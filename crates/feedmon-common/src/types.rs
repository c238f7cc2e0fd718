use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Bytes per megabyte as used throughout reports and stored metrics (decimal MB).
pub const BYTES_PER_MB: f64 = 1_000_000.0;

/// Metadata for one stored object under a feed's bucket/prefix.
///
/// Folder placeholder objects never become a `FileRecord`; sources drop them
/// before handing records to the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    /// Object size in bytes.
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    /// Delivery date encoded in the object path, `None` when the path has no
    /// recognizable `year=/month=/day=` segment.
    pub inferred_date: Option<NaiveDate>,
}

impl FileRecord {
    /// Builds a record, inferring the delivery date from `name`.
    pub fn new(name: impl Into<String>, size: u64, last_modified: DateTime<Utc>) -> Self {
        let name = name.into();
        let inferred_date = crate::path_date::extract_date(&name);
        Self {
            name,
            size,
            last_modified,
            inferred_date,
        }
    }
}

/// Sum of `size` over `files`, in megabytes. Empty input yields `0.0`.
pub fn total_size_mb<'a>(files: impl IntoIterator<Item = &'a FileRecord>) -> f64 {
    let bytes: u64 = files.into_iter().map(|f| f.size).sum();
    bytes as f64 / BYTES_PER_MB
}

/// One feed's delivery volume for a single calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub feed_label: String,
    pub date: NaiveDate,
    pub file_count: u64,
    pub total_size_mb: f64,
}

impl DailyAggregate {
    /// Aggregates the files delivered for `date`. An empty slice produces a
    /// zero row, which is still worth persisting.
    pub fn from_files(feed_label: &str, date: NaiveDate, files: &[&FileRecord]) -> Self {
        Self {
            feed_label: feed_label.to_string(),
            date,
            file_count: files.len() as u64,
            total_size_mb: total_size_mb(files.iter().copied()),
        }
    }
}

/// Historical mean of daily count and size.
///
/// A zero value means "no history", not "expect nothing": the analyzer
/// skips the corresponding deviation check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineSummary {
    pub avg_count: f64,
    pub avg_size_mb: f64,
}

impl BaselineSummary {
    pub fn new(avg_count: f64, avg_size_mb: f64) -> Self {
        Self {
            avg_count,
            avg_size_mb,
        }
    }

    /// True when neither metric has any history behind it.
    pub fn is_empty(&self) -> bool {
        self.avg_count <= 0.0 && self.avg_size_mb <= 0.0
    }
}

/// Health classification of a feed for one target date, ordered from best to worst.
///
/// # Examples
///
/// ```
/// use feedmon_common::types::FeedStatus;
///
/// let status: FeedStatus = "warning".parse().unwrap();
/// assert_eq!(status, FeedStatus::Warning);
/// assert_eq!(status.to_string(), "warning");
/// assert!(FeedStatus::Critical > FeedStatus::Ok);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    Ok,
    Warning,
    Critical,
}

impl FeedStatus {
    /// Whether this status warrants a detail block in the report.
    pub fn needs_attention(self) -> bool {
        self != FeedStatus::Ok
    }
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedStatus::Ok => write!(f, "ok"),
            FeedStatus::Warning => write!(f, "warning"),
            FeedStatus::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for FeedStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ok" => Ok(FeedStatus::Ok),
            "warning" => Ok(FeedStatus::Warning),
            "critical" => Ok(FeedStatus::Critical),
            _ => Err(format!("unknown feed status: {s}")),
        }
    }
}

/// Outcome of analyzing one feed for one target date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedHealthResult {
    pub feed_label: String,
    pub status: FeedStatus,
    pub target_date: NaiveDate,
    pub today_count: u64,
    pub today_size_mb: f64,
    pub baseline: BaselineSummary,
    /// Human-readable findings, in the order the checks ran.
    pub issues: Vec<String>,
}
