use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use feedmon_notify::channels::log::LogNotifier;
use feedmon_notify::channels::webhook::WebhookNotifier;
use feedmon_notify::report::ReportFormatter;
use feedmon_notify::Notifier;
use feedmon_runner::config::{MonitorConfig, NotifyConfig, SourceConfig, SourceKind};
use feedmon_runner::pipeline::{baseline_window, Pipeline, PipelineSettings};
use feedmon_source::gcs::{GcsMetadataSource, GcsSettings};
use feedmon_source::local::LocalDirSource;
use feedmon_source::MetadataSource;
use feedmon_storage::engine::SqliteBaselineStore;
use feedmon_storage::{BaselineStore, MetricRange};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config/feedmon.toml";

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  feedmon [config.toml]                                   Check feeds for today - target_offset_days");
    eprintln!("  feedmon run <config.toml> <YYYY-MM-DD>                  Check feeds for an explicit target date");
    eprintln!("  feedmon init-store <config.toml>                        Create the metrics store schema");
    eprintln!("  feedmon baseline <config.toml> <feed-key> <YYYY-MM-DD>  Show the stored baseline for a feed");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("feedmon=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("run") => {
            let config_path = args.get(2).ok_or_else(|| {
                print_usage();
                anyhow!("run requires <config.toml> and <YYYY-MM-DD> arguments")
            })?;
            let date = args.get(3).ok_or_else(|| {
                print_usage();
                anyhow!("run requires <YYYY-MM-DD> argument")
            })?;
            let config = MonitorConfig::load(config_path)?;
            run_check(&config, parse_date(date)?).await
        }
        Some("init-store") => {
            let config_path = args.get(2).ok_or_else(|| {
                print_usage();
                anyhow!("init-store requires <config.toml> argument")
            })?;
            run_init_store(config_path)
        }
        Some("baseline") => {
            let (Some(config_path), Some(feed_key), Some(date)) = (args.get(2), args.get(3), args.get(4))
            else {
                print_usage();
                return Err(anyhow!(
                    "baseline requires <config.toml>, <feed-key> and <YYYY-MM-DD> arguments"
                ));
            };
            run_show_baseline(config_path, feed_key, parse_date(date)?)
        }
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        _ => {
            let config_path = args.get(1).map(|s| s.as_str()).unwrap_or(DEFAULT_CONFIG);
            let config = MonitorConfig::load(config_path)?;
            let target_date = config.target_date(Local::now().date_naive());
            run_check(&config, target_date).await
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

async fn run_check(config: &MonitorConfig, target_date: NaiveDate) -> Result<()> {
    let source = build_source(&config.source)?;
    let store = SqliteBaselineStore::open(&config.store.path)
        .with_context(|| format!("Failed to open metrics store '{}'", config.store.path.display()))?;
    let notifier = build_notifier(&config.notify)?;
    let formatter = ReportFormatter::new(config.notify.mention_policy(), config.notify.trends_url.clone());

    let pipeline = Pipeline::new(
        source.as_ref(),
        &store,
        notifier.as_ref(),
        formatter,
        PipelineSettings::from(config),
    );
    let report = pipeline.run(&config.feeds, target_date).await;

    println!("{}", report.message);
    tracing::info!(
        date = %report.target_date,
        checked = report.results.len(),
        skipped = report.skipped.len(),
        attention = report.results.iter().filter(|r| r.status.needs_attention()).count(),
        delivered = report.delivered,
        "Feed check finished"
    );
    Ok(())
}

fn build_source(config: &SourceConfig) -> Result<Box<dyn MetadataSource>> {
    match config.kind {
        SourceKind::Gcs => {
            let settings = GcsSettings {
                endpoint: config.endpoint.clone(),
                access_token: config.access_token(),
                timeout_secs: config.timeout_secs,
            };
            Ok(Box::new(GcsMetadataSource::new(settings)?))
        }
        SourceKind::Local => {
            let root = config
                .root
                .clone()
                .ok_or_else(|| anyhow!("source.root is required for a local source"))?;
            Ok(Box::new(LocalDirSource::new(root)))
        }
    }
}

fn build_notifier(config: &NotifyConfig) -> Result<Box<dyn Notifier>> {
    match config.resolve_webhook_url() {
        Some(url) => Ok(Box::new(WebhookNotifier::new(&url, config.timeout_secs)?)),
        None => {
            tracing::info!(
                env = %config.webhook_url_env,
                "No webhook configured, report will only be printed"
            );
            Ok(Box::new(LogNotifier))
        }
    }
}

fn run_init_store(config_path: &str) -> Result<()> {
    let config = MonitorConfig::load(config_path)?;
    SqliteBaselineStore::open(&config.store.path)?;
    tracing::info!(path = %config.store.path.display(), "Metrics store ready");
    Ok(())
}

fn run_show_baseline(config_path: &str, feed_key: &str, target_date: NaiveDate) -> Result<()> {
    let config = MonitorConfig::load(config_path)?;
    let feed = config
        .feed(feed_key)
        .ok_or_else(|| anyhow!("Unknown feed key '{feed_key}'"))?;
    let store = SqliteBaselineStore::open(&config.store.path)?;

    let window = baseline_window(target_date, config.baseline_window_days);
    let range = MetricRange::new(&feed.label, window.start, window.end);
    let rows = store.daily_metrics(&range)?;
    let baseline = store.query_baseline(&range)?;

    println!("Feed: {} ({})", feed.label, feed.key);
    println!("Window: {} .. {}", window.start, window.end);
    for row in &rows {
        println!("  {}  files={:<6} size={:.2} MB", row.date, row.file_count, row.total_size_mb);
    }
    println!(
        "Baseline over {} stored day(s): {:.1} files, {:.2} MB",
        rows.len(),
        baseline.avg_count,
        baseline.avg_size_mb
    );
    Ok(())
}
