use crate::config::{BaselineStrategy, FeedConfig, MonitorConfig};
use chrono::NaiveDate;
use feedmon_analyzer::analyzer::FeedAnalyzer;
use feedmon_analyzer::grouping::{group_by_date, FilesByDate};
use feedmon_analyzer::window::{listing_baseline, rolling_aggregates, DateWindow};
use feedmon_common::types::{BaselineSummary, FeedHealthResult};
use feedmon_notify::report::{FeedMeta, OverviewRow, ReportFormatter, SkippedFeed};
use feedmon_notify::Notifier;
use feedmon_source::MetadataSource;
use feedmon_storage::{BaselineStore, MetricRange};

/// Window and baseline knobs for a run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub rolling_window_days: u32,
    pub baseline_window_days: u32,
    pub baseline_strategy: BaselineStrategy,
}

impl From<&MonitorConfig> for PipelineSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            rolling_window_days: config.rolling_window_days,
            baseline_window_days: config.baseline_window_days,
            baseline_strategy: config.baseline_strategy,
        }
    }
}

/// Outcome of one monitoring pass.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub target_date: NaiveDate,
    /// One result per analyzed feed, in configuration order.
    pub results: Vec<FeedHealthResult>,
    /// Feeds whose listing failed.
    pub skipped: Vec<SkippedFeed>,
    /// The composed report message.
    pub message: String,
    pub delivered: bool,
}

/// Runs the daily check over a list of feeds with injected collaborators.
///
/// Feeds are processed one at a time. Collaborator failures are logged and
/// never abort the run: a failed listing skips that feed, a failed upsert
/// is ignored, a failed baseline query falls back to the zero baseline and
/// a failed delivery is reported through [`RunReport::delivered`].
pub struct Pipeline<'a> {
    source: &'a dyn MetadataSource,
    store: &'a dyn BaselineStore,
    notifier: &'a dyn Notifier,
    formatter: ReportFormatter,
    analyzer: FeedAnalyzer,
    settings: PipelineSettings,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        source: &'a dyn MetadataSource,
        store: &'a dyn BaselineStore,
        notifier: &'a dyn Notifier,
        formatter: ReportFormatter,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            formatter,
            analyzer: FeedAnalyzer::new(),
            settings,
        }
    }

    pub async fn run(&self, feeds: &[FeedConfig], target_date: NaiveDate) -> RunReport {
        tracing::info!(
            date = %target_date,
            feeds = feeds.len(),
            source = self.source.name(),
            strategy = ?self.settings.baseline_strategy,
            "Starting feed check"
        );

        let mut results = Vec::new();
        let mut skipped = Vec::new();

        for feed in feeds {
            if !feed.enabled {
                tracing::debug!(feed = %feed.label, "Feed disabled, skipping");
                continue;
            }

            let files = match self.source.list_files(&feed.bucket, &feed.prefix).await {
                Ok(files) => files,
                Err(e) => {
                    tracing::error!(feed = %feed.label, error = %e, "Listing failed, feed not checked");
                    skipped.push(SkippedFeed {
                        feed_label: feed.label.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let grouped = group_by_date(&files);
            self.persist_rolling_window(&feed.label, &grouped, target_date);
            let baseline = self.baseline(&feed.label, &grouped, target_date);

            let result = self.analyzer.analyze(&feed.label, &files, target_date, baseline);
            tracing::info!(
                feed = %feed.label,
                status = %result.status,
                count = result.today_count,
                size_mb = result.today_size_mb,
                "Feed checked"
            );
            results.push(result);
        }

        let message = self.compose(feeds, &results, &skipped);

        let delivered = match self.notifier.notify(&message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(channel = self.notifier.channel_name(), error = %e, "Report delivery failed");
                false
            }
        };

        RunReport {
            target_date,
            results,
            skipped,
            message,
            delivered,
        }
    }

    /// Upserts one aggregate per day of the rolling window ending at
    /// `target_date`, zeros included.
    fn persist_rolling_window(&self, feed_label: &str, grouped: &FilesByDate<'_>, target_date: NaiveDate) {
        let window = DateWindow::ending_at(target_date, self.settings.rolling_window_days);
        for aggregate in rolling_aggregates(feed_label, grouped, window) {
            if let Err(e) = self.store.upsert_daily_metric(&aggregate) {
                tracing::warn!(
                    feed = feed_label,
                    date = %aggregate.date,
                    error = %e,
                    "Failed to store daily metric"
                );
            }
        }
    }

    fn baseline(&self, feed_label: &str, grouped: &FilesByDate<'_>, target_date: NaiveDate) -> BaselineSummary {
        let window = baseline_window(target_date, self.settings.baseline_window_days);
        match self.settings.baseline_strategy {
            BaselineStrategy::Listing => listing_baseline(grouped, window),
            BaselineStrategy::Warehouse => {
                let range = MetricRange::new(feed_label, window.start, window.end);
                self.store.query_baseline(&range).unwrap_or_else(|e| {
                    tracing::warn!(feed = feed_label, error = %e, "Baseline query failed, using zero baseline");
                    BaselineSummary::default()
                })
            }
        }
    }

    fn compose(&self, feeds: &[FeedConfig], results: &[FeedHealthResult], skipped: &[SkippedFeed]) -> String {
        let rows: Vec<OverviewRow> = results.iter().map(OverviewRow::from).collect();

        let details: Vec<String> = results
            .iter()
            .filter(|r| r.status.needs_attention())
            .map(|r| {
                let recipients = feeds
                    .iter()
                    .find(|f| f.label == r.feed_label)
                    .map(|f| f.recipients.as_slice())
                    .unwrap_or_default();
                let meta = FeedMeta {
                    label: &r.feed_label,
                    recipients,
                };
                self.formatter.detail_block(r, &meta)
            })
            .collect();

        self.formatter.compose(&rows, &details, skipped)
    }
}

/// Stored-history window used as the baseline for `target_date`.
pub fn baseline_window(target_date: NaiveDate, days: u32) -> DateWindow {
    DateWindow::baseline_for(target_date, days)
}
