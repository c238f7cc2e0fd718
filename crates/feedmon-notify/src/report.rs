//! Chat-message rendering of a monitoring run.

use crate::routing::MentionPolicy;
use chrono::NaiveDate;
use feedmon_common::types::{FeedHealthResult, FeedStatus};

const OVERVIEW_HEADERS: [&str; 3] = ["Feed", "Status", "Expected Date"];

/// One line of the overview table.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewRow {
    pub feed_label: String,
    pub status: FeedStatus,
    pub target_date: NaiveDate,
}

impl From<&FeedHealthResult> for OverviewRow {
    fn from(result: &FeedHealthResult) -> Self {
        Self {
            feed_label: result.feed_label.clone(),
            status: result.status,
            target_date: result.target_date,
        }
    }
}

/// Display data for a feed that the detail block needs beyond the result.
#[derive(Debug, Clone, Copy)]
pub struct FeedMeta<'a> {
    pub label: &'a str,
    /// Chat user ids rendered as `<@id>` mentions.
    pub recipients: &'a [String],
}

/// A feed that could not be analyzed this run.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFeed {
    pub feed_label: String,
    pub reason: String,
}

/// Status label with its chat glyph. Decoration lives here, not on [`FeedStatus`].
pub fn status_badge(status: FeedStatus) -> &'static str {
    match status {
        FeedStatus::Ok => "OK ✅",
        FeedStatus::Warning => "WARNING ❗\u{fe0f}",
        FeedStatus::Critical => "CRITICAL 🚨",
    }
}

/// Plain status label, for places where the glyph would break alignment.
pub fn status_label(status: FeedStatus) -> &'static str {
    match status {
        FeedStatus::Ok => "OK",
        FeedStatus::Warning => "WARNING",
        FeedStatus::Critical => "CRITICAL",
    }
}

/// The glyph part of [`status_badge`].
pub fn status_glyph(status: FeedStatus) -> &'static str {
    match status {
        FeedStatus::Ok => "✅",
        FeedStatus::Warning => "❗\u{fe0f}",
        FeedStatus::Critical => "🚨",
    }
}

/// Renders overview tables, detail blocks and the full report message.
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    mention_policy: MentionPolicy,
    trends_url: Option<String>,
}

impl ReportFormatter {
    pub fn new(mention_policy: MentionPolicy, trends_url: Option<String>) -> Self {
        Self {
            mention_policy,
            trends_url: trends_url.filter(|u| !u.trim().is_empty()),
        }
    }

    /// Grid table of every analyzed feed inside a code fence, followed by the
    /// trends link when one is configured.
    ///
    /// Glyphs render two columns wide in monospace, so each row's glyph sits
    /// after its closing border instead of inside a padded cell.
    pub fn overview_table(&self, rows: &[OverviewRow]) -> String {
        let cells: Vec<([String; 3], &str)> = rows
            .iter()
            .map(|r| {
                (
                    [
                        r.feed_label.clone(),
                        status_label(r.status).to_string(),
                        r.target_date.format("%Y-%m-%d").to_string(),
                    ],
                    status_glyph(r.status),
                )
            })
            .collect();

        let mut out = format!("```\n{}\n```", render_grid(&OVERVIEW_HEADERS, &cells));
        if let Some(url) = &self.trends_url {
            out.push_str(&format!("\n📈 <{url}|View historical trends>"));
        }
        out
    }

    /// Detail block for one feed: status, counts against baseline, issues,
    /// and recipient mentions when the policy asks for them.
    pub fn detail_block(&self, result: &FeedHealthResult, feed: &FeedMeta<'_>) -> String {
        let mut lines = vec![format!("*Feed:* {}", feed.label)];

        if self.mention_policy.should_mention(result.status) {
            let mentions = feed
                .recipients
                .iter()
                .map(|id| format!("<@{id}>"))
                .collect::<Vec<_>>()
                .join(" ");
            if !mentions.is_empty() {
                lines.push(mentions);
            }
        }

        lines.push("\n===== ANALYSIS RESULT =====".to_string());
        lines.push(format!("Status: {}", status_badge(result.status)));
        lines.push(format!("Expected Date: {}", result.target_date.format("%Y-%m-%d")));
        lines.push(format!(
            "File Count: {} (Baseline: {:.1})",
            result.today_count, result.baseline.avg_count
        ));
        lines.push(format!(
            "Size: {:.2} MB (Baseline: {:.2} MB)",
            result.today_size_mb, result.baseline.avg_size_mb
        ));

        if !result.issues.is_empty() {
            lines.push("Issues Detected:".to_string());
            for issue in &result.issues {
                lines.push(format!(" - {issue}"));
            }
        }

        lines.join("\n")
    }

    /// Full report: overview, then alert detail blocks, then feeds that
    /// could not be checked. Empty sections are omitted.
    pub fn compose(&self, rows: &[OverviewRow], details: &[String], skipped: &[SkippedFeed]) -> String {
        let mut parts = vec![
            "*Feed Status Overview:*".to_string(),
            self.overview_table(rows),
        ];

        if !details.is_empty() {
            parts.push("\n*⚠️ Alerts:*".to_string());
            parts.extend(details.iter().cloned());
        }

        if !skipped.is_empty() {
            parts.push("\n*Feeds not checked:*".to_string());
            for feed in skipped {
                parts.push(format!(" - {}: {}", feed.feed_label, feed.reason));
            }
        }

        parts.join("\n")
    }
}

/// Rows are `(cells, marker)`; the marker follows the row's last border unpadded.
fn render_grid<const N: usize>(headers: &[&str; N], rows: &[([String; N], &str)]) -> String {
    let mut widths: [usize; N] = std::array::from_fn(|i| headers[i].chars().count());
    for (row, _) in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![grid_border(&widths, '-')];
    lines.push(grid_row(headers.iter().copied(), &widths, ""));
    lines.push(grid_border(&widths, '='));
    for (row, marker) in rows {
        lines.push(grid_row(row.iter().map(String::as_str), &widths, marker));
        lines.push(grid_border(&widths, '-'));
    }
    lines.join("\n")
}

fn grid_border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat(fill).take(width + 2));
        line.push('+');
    }
    line
}

fn grid_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize], marker: &str) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        line.push_str(&format!(" {cell}{} |", " ".repeat(pad)));
    }
    if !marker.is_empty() {
        line.push(' ');
        line.push_str(marker);
    }
    line
}
