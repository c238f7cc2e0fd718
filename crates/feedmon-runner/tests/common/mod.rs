#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use feedmon_common::types::FileRecord;
use feedmon_notify::error::NotifyError;
use feedmon_notify::Notifier;
use feedmon_runner::config::FeedConfig;
use feedmon_source::error::SourceError;
use feedmon_source::MetadataSource;
use std::collections::HashMap;
use std::sync::Mutex;

pub const MB: u64 = 1_000_000;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn feed(key: &str, label: &str, prefix: &str, recipients: &[&str]) -> FeedConfig {
    FeedConfig {
        key: key.to_string(),
        label: label.to_string(),
        bucket: "vendor-data".to_string(),
        prefix: prefix.to_string(),
        recipients: recipients.iter().map(|r| r.to_string()).collect(),
        enabled: true,
    }
}

/// `count` files of `size` bytes under the date-partitioned path for `day`.
pub fn daily_files(prefix: &str, day: NaiveDate, count: usize, size: u64) -> Vec<FileRecord> {
    let partition = day.format("year=%Y/month=%m/day=%d");
    (0..count)
        .map(|i| FileRecord::new(format!("{prefix}{partition}/part-{i:05}.csv"), size, Utc::now()))
        .collect()
}

/// Same delivery on every day of `[first, last]`.
pub fn steady_history(prefix: &str, first: NaiveDate, last: NaiveDate, count: usize, size: u64) -> Vec<FileRecord> {
    first
        .iter_days()
        .take_while(|d| *d <= last)
        .flat_map(|d| daily_files(prefix, d, count, size))
        .collect()
}

pub fn days_before(day: NaiveDate, n: u64) -> NaiveDate {
    day - Days::new(n)
}

/// Listing keyed by prefix; unknown prefixes list nothing.
#[derive(Default)]
pub struct FakeSource {
    listings: HashMap<String, Vec<FileRecord>>,
    failing: Vec<String>,
}

impl FakeSource {
    pub fn with_listing(mut self, prefix: &str, files: Vec<FileRecord>) -> Self {
        self.listings.insert(prefix.to_string(), files);
        self
    }

    pub fn failing_on(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    fn name(&self) -> &str {
        "fake"
    }

    async fn list_files(&self, _bucket: &str, prefix: &str) -> Result<Vec<FileRecord>, SourceError> {
        if self.failing.iter().any(|p| p == prefix) {
            return Err(SourceError::Config(format!("listing refused for {prefix}")));
        }
        Ok(self.listings.get(prefix).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::default(),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(NotifyError::Api {
                service: "recording".to_string(),
                status: 500,
                body: "down".to_string(),
            });
        }
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "recording"
    }
}
