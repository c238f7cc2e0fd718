use crate::deviation::{Deviation, Metric, DEVIATION_THRESHOLD};
use crate::grouping::{files_on, group_by_date};
use chrono::NaiveDate;
use feedmon_common::types::{total_size_mb, BaselineSummary, FeedHealthResult, FeedStatus, FileRecord};

/// Issue reported when nothing (or only empty files) arrived for the target date.
pub const NO_DATA_ISSUE: &str = "No data received.";

/// Classifies a feed's delivery for a target date against its baseline.
#[derive(Debug, Clone, Copy)]
pub struct FeedAnalyzer {
    threshold: f64,
}

impl Default for FeedAnalyzer {
    fn default() -> Self {
        Self {
            threshold: DEVIATION_THRESHOLD,
        }
    }
}

impl FeedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzes `file_records` (all dates, unfiltered) for `target_date`.
    ///
    /// Never fails: a missing delivery is reported as
    /// [`FeedStatus::Critical`] with [`NO_DATA_ISSUE`].
    pub fn analyze(
        &self,
        feed_label: &str,
        file_records: &[FileRecord],
        target_date: NaiveDate,
        baseline: BaselineSummary,
    ) -> FeedHealthResult {
        let grouped = group_by_date(file_records);
        let today_files = files_on(&grouped, target_date);
        let today_count = today_files.len() as u64;
        let today_size_mb = total_size_mb(today_files.iter().copied());

        let (status, issues) = self.classify(today_count, today_size_mb, &baseline);

        tracing::debug!(
            feed = feed_label,
            date = %target_date,
            today_count,
            today_size_mb,
            avg_count = baseline.avg_count,
            avg_size_mb = baseline.avg_size_mb,
            %status,
            "Feed analyzed"
        );

        FeedHealthResult {
            feed_label: feed_label.to_string(),
            status,
            target_date,
            today_count,
            today_size_mb,
            baseline,
            issues,
        }
    }

    /// Status decision on already-aggregated values.
    ///
    /// No data short-circuits to CRITICAL. Otherwise the count and size
    /// checks both run, and either one firing yields WARNING.
    pub fn classify(
        &self,
        today_count: u64,
        today_size_mb: f64,
        baseline: &BaselineSummary,
    ) -> (FeedStatus, Vec<String>) {
        if today_count == 0 || today_size_mb == 0.0 {
            return (FeedStatus::Critical, vec![NO_DATA_ISSUE.to_string()]);
        }

        let issues: Vec<String> = [
            Deviation::check(
                Metric::FileCount,
                today_count as f64,
                baseline.avg_count,
                self.threshold,
            ),
            Deviation::check(
                Metric::SizeMb,
                today_size_mb,
                baseline.avg_size_mb,
                self.threshold,
            ),
        ]
        .into_iter()
        .flatten()
        .map(|d| d.issue())
        .collect();

        let status = if issues.is_empty() {
            FeedStatus::Ok
        } else {
            FeedStatus::Warning
        };
        (status, issues)
    }
}
