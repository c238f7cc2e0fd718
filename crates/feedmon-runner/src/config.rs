use anyhow::{bail, Context};
use chrono::{Days, NaiveDate};
use feedmon_common::types::FeedStatus;
use feedmon_notify::routing::MentionPolicy;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Upper bound for every day-count setting (about ten years).
pub const MAX_DAYS: u32 = 3660;

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Days behind today that are checked, to tolerate delivery latency.
    #[serde(default = "default_target_offset_days")]
    pub target_offset_days: u32,
    #[serde(default = "default_rolling_window_days")]
    pub rolling_window_days: u32,
    #[serde(default = "default_baseline_window_days")]
    pub baseline_window_days: u32,
    #[serde(default)]
    pub baseline_strategy: BaselineStrategy,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Checked in file order.
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
}

/// Where the baseline for a target date comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineStrategy {
    /// Mean of the stored daily metrics.
    #[default]
    Warehouse,
    /// Mean over the days of the raw listing that received files.
    Listing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Gcs,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default = "default_gcs_endpoint")]
    pub endpoint: String,
    /// Environment variable holding an OAuth bearer token.
    #[serde(default)]
    pub access_token_env: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Root directory for `kind = "local"`; buckets are its subdirectories.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            endpoint: default_gcs_endpoint(),
            access_token_env: None,
            timeout_secs: default_timeout_secs(),
            root: None,
        }
    }
}

impl SourceConfig {
    /// Bearer token read from `access_token_env`, if set and non-empty.
    pub fn access_token(&self) -> Option<String> {
        let var = self.access_token_env.as_deref()?;
        non_empty_env(var)
    }
}

/// Minimum status whose detail block mentions the feed's recipients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionOn {
    Critical,
    #[default]
    Warning,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Takes precedence over `webhook_url_env`.
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_webhook_url_env")]
    pub webhook_url_env: String,
    #[serde(default)]
    pub mention_on: MentionOn,
    #[serde(default)]
    pub trends_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            webhook_url_env: default_webhook_url_env(),
            mention_on: MentionOn::default(),
            trends_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NotifyConfig {
    /// Webhook URL from the config file, falling back to the environment.
    /// `None` means the report is only logged.
    pub fn resolve_webhook_url(&self) -> Option<String> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .or_else(|| non_empty_env(&self.webhook_url_env))
    }

    pub fn mention_policy(&self) -> MentionPolicy {
        MentionPolicy {
            min_status: match self.mention_on {
                MentionOn::Critical => FeedStatus::Critical,
                MentionOn::Warning => FeedStatus::Warning,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Short identifier used on the command line.
    pub key: String,
    /// Display name; also the key of stored metrics.
    pub label: String,
    pub bucket: String,
    pub prefix: String,
    /// Chat user ids, rendered as `<@id>`.
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_target_offset_days() -> u32 {
    6
}

fn default_rolling_window_days() -> u32 {
    8
}

fn default_baseline_window_days() -> u32 {
    31
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/feed_metrics.db")
}

fn default_gcs_endpoint() -> String {
    feedmon_source::gcs::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_webhook_url_env() -> String {
    "SLACK_WEBHOOK_URL".to_string()
}

fn default_enabled() -> bool {
    true
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MonitorConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file '{path}'"))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (name, days, min) in [
            ("target_offset_days", self.target_offset_days, 0),
            ("rolling_window_days", self.rolling_window_days, 1),
            ("baseline_window_days", self.baseline_window_days, 1),
        ] {
            if !(min..=MAX_DAYS).contains(&days) {
                bail!("{name} must be between {min} and {MAX_DAYS}, got {days}");
            }
        }
        if self.source.kind == SourceKind::Local && self.source.root.is_none() {
            bail!("source.root is required when source.kind = \"local\"");
        }

        let mut keys = HashSet::new();
        let mut labels = HashSet::new();
        for feed in &self.feeds {
            if feed.key.trim().is_empty() || feed.label.trim().is_empty() {
                bail!("every feed needs a non-empty key and label");
            }
            if !keys.insert(feed.key.as_str()) {
                bail!("duplicate feed key '{}'", feed.key);
            }
            // stored metrics are keyed by label
            if !labels.insert(feed.label.as_str()) {
                bail!("duplicate feed label '{}'", feed.label);
            }
        }
        Ok(())
    }

    /// The date checked by a run started on `today`.
    pub fn target_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.target_offset_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn feed(&self, key: &str) -> Option<&FeedConfig> {
        self.feeds.iter().find(|f| f.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [[feeds]]
        key = "geo"
        label = "Geolocation"
        bucket = "vendor-data"
        prefix = "geolocation/"
    "#;

    #[test]
    fn defaults_apply_to_minimal_config() {
        let config = MonitorConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.target_offset_days, 6);
        assert_eq!(config.rolling_window_days, 8);
        assert_eq!(config.baseline_window_days, 31);
        assert_eq!(config.baseline_strategy, BaselineStrategy::Warehouse);
        assert_eq!(config.store.path, PathBuf::from("data/feed_metrics.db"));
        assert_eq!(config.source.kind, SourceKind::Gcs);
        assert_eq!(config.source.endpoint, "https://storage.googleapis.com");
        assert_eq!(config.notify.webhook_url_env, "SLACK_WEBHOOK_URL");
        assert_eq!(config.notify.mention_policy(), MentionPolicy::warning_and_critical());

        let feed = config.feed("geo").unwrap();
        assert!(feed.enabled);
        assert!(feed.recipients.is_empty());
    }

    #[test]
    fn parses_full_config() {
        let config = MonitorConfig::from_toml_str(
            r#"
            target_offset_days = 2
            baseline_strategy = "listing"

            [source]
            kind = "local"
            root = "/srv/feeds"

            [notify]
            webhook_url = "https://hooks.example/abc"
            mention_on = "critical"
            trends_url = "https://dash.example"

            [[feeds]]
            key = "geo"
            label = "Geolocation"
            bucket = "vendor-data"
            prefix = "geolocation/"
            recipients = ["U1", "U2"]

            [[feeds]]
            key = "test"
            label = "TestFeed"
            bucket = "vendor-data"
            prefix = "test/"
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.baseline_strategy, BaselineStrategy::Listing);
        assert_eq!(config.source.root, Some(PathBuf::from("/srv/feeds")));
        assert_eq!(config.notify.mention_policy(), MentionPolicy::critical_only());
        assert_eq!(
            config.notify.resolve_webhook_url().as_deref(),
            Some("https://hooks.example/abc")
        );
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feeds[0].recipients, vec!["U1", "U2"]);
        assert!(!config.feeds[1].enabled);
    }

    #[test]
    fn target_date_subtracts_offset() {
        let config = MonitorConfig::from_toml_str(MINIMAL).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            config.target_date(today),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
    }

    #[test]
    fn rejects_duplicate_feed_keys() {
        let doubled = format!("{MINIMAL}\n{MINIMAL}");
        let err = MonitorConfig::from_toml_str(&doubled).unwrap_err();
        assert!(err.to_string().contains("duplicate feed key"));
    }

    #[test]
    fn rejects_duplicate_feed_labels() {
        let err = MonitorConfig::from_toml_str(
            r#"
            [[feeds]]
            key = "a"
            label = "Same"
            bucket = "vendor-data"
            prefix = "a/"

            [[feeds]]
            key = "b"
            label = "Same"
            bucket = "vendor-data"
            prefix = "b/"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate feed label 'Same'"));
    }

    #[test]
    fn rejects_day_counts_above_limit() {
        for key in ["target_offset_days", "rolling_window_days", "baseline_window_days"] {
            let err = MonitorConfig::from_toml_str(&format!("{key} = 4000000000")).unwrap_err();
            assert!(err.to_string().contains(key), "{key}: {err}");

            let err = MonitorConfig::from_toml_str(&format!("{key} = {}", MAX_DAYS + 1)).unwrap_err();
            assert!(err.to_string().contains(key), "{key}: {err}");

            assert!(MonitorConfig::from_toml_str(&format!("{key} = {MAX_DAYS}")).is_ok());
        }
    }

    #[test]
    fn target_date_clamps_at_earliest_date() {
        let config = MonitorConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.target_date(NaiveDate::MIN), NaiveDate::MIN);
    }

    #[test]
    fn local_source_requires_root() {
        let err = MonitorConfig::from_toml_str("[source]\nkind = \"local\"\n").unwrap_err();
        assert!(err.to_string().contains("source.root"));
    }

    #[test]
    fn rejects_zero_windows() {
        assert!(MonitorConfig::from_toml_str("rolling_window_days = 0").is_err());
        assert!(MonitorConfig::from_toml_str("baseline_window_days = 0").is_err());
    }

    #[test]
    fn blank_webhook_url_falls_back_to_env_var() {
        let config = MonitorConfig::from_toml_str(
            r#"
            [notify]
            webhook_url = "  "
            webhook_url_env = "FEEDMON_TEST_WEBHOOK_UNSET"
            "#,
        )
        .unwrap();
        assert_eq!(config.notify.resolve_webhook_url(), None);
    }
}
