use feedmon_analyzer::analyzer::{FeedAnalyzer, NO_DATA_ISSUE};
use feedmon_analyzer::deviation::DEVIATION_THRESHOLD;
use feedmon_common::types::{BaselineSummary, FeedStatus};
use proptest::prelude::*;

fn ratio(observed: f64, expected: f64) -> f64 {
    (observed - expected).abs() / expected
}

fn has_count_issue(issues: &[String]) -> bool {
    issues.iter().any(|i| i.starts_with("File count deviates"))
}

fn has_size_issue(issues: &[String]) -> bool {
    issues.iter().any(|i| i.starts_with("Size deviates"))
}

proptest! {
    #[test]
    fn zero_baseline_is_always_ok(count in 1u64..100_000, size_mb in 0.000_001f64..1e9) {
        let (status, issues) = FeedAnalyzer::new().classify(count, size_mb, &BaselineSummary::default());
        prop_assert_eq!(status, FeedStatus::Ok);
        prop_assert!(issues.is_empty());
    }

    #[test]
    fn zero_count_is_always_critical(
        size_mb in 0.0f64..1e9,
        avg_count in 0.0f64..1e5,
        avg_size in 0.0f64..1e9,
    ) {
        let baseline = BaselineSummary::new(avg_count, avg_size);
        let (status, issues) = FeedAnalyzer::new().classify(0, size_mb, &baseline);
        prop_assert_eq!(status, FeedStatus::Critical);
        prop_assert_eq!(issues, vec![NO_DATA_ISSUE.to_string()]);
    }

    #[test]
    fn zero_size_is_always_critical(
        count in 0u64..100_000,
        avg_count in 0.0f64..1e5,
        avg_size in 0.0f64..1e9,
    ) {
        let baseline = BaselineSummary::new(avg_count, avg_size);
        let (status, issues) = FeedAnalyzer::new().classify(count, 0.0, &baseline);
        prop_assert_eq!(status, FeedStatus::Critical);
        prop_assert_eq!(issues, vec![NO_DATA_ISSUE.to_string()]);
    }

    #[test]
    fn count_issue_iff_ratio_exceeds_threshold(
        count in 1u64..10_000,
        avg_count in 0.01f64..10_000.0,
    ) {
        // size check disabled so only the count check can fire
        let baseline = BaselineSummary::new(avg_count, 0.0);
        let (status, issues) = FeedAnalyzer::new().classify(count, 1.0, &baseline);

        let exceeds = ratio(count as f64, avg_count) > DEVIATION_THRESHOLD;
        prop_assert_eq!(has_count_issue(&issues), exceeds);
        prop_assert_eq!(status == FeedStatus::Warning, exceeds);
        prop_assert!(!has_size_issue(&issues));
    }

    #[test]
    fn size_issue_iff_ratio_exceeds_threshold(
        size_mb in 0.001f64..1e6,
        avg_size in 0.001f64..1e6,
    ) {
        let baseline = BaselineSummary::new(0.0, avg_size);
        let (status, issues) = FeedAnalyzer::new().classify(1, size_mb, &baseline);

        let exceeds = ratio(size_mb, avg_size) > DEVIATION_THRESHOLD;
        prop_assert_eq!(has_size_issue(&issues), exceeds);
        prop_assert_eq!(status == FeedStatus::Warning, exceeds);
    }

    #[test]
    fn counts_within_threshold_never_warn(
        avg in 4u64..10_000,
        offset_pct in 0u64..=25,
        above in any::<bool>(),
    ) {
        // integer arithmetic keeps the deviation at or below 25%
        let delta = avg * offset_pct / 100;
        let count = if above { avg + delta } else { avg - delta };
        let baseline = BaselineSummary::new(avg as f64, 100.0);
        let (status, issues) = FeedAnalyzer::new().classify(count, 100.0, &baseline);
        prop_assert_eq!(status, FeedStatus::Ok);
        prop_assert!(issues.is_empty());
    }

    #[test]
    fn counts_beyond_threshold_always_warn(
        avg in 4u64..10_000,
        offset_pct in 26u64..=100,
        above in any::<bool>(),
    ) {
        let delta = (avg * offset_pct).div_ceil(100);
        let count = if above { avg + delta } else { avg.saturating_sub(delta).max(1) };
        prop_assume!(count.abs_diff(avg) * 4 > avg);
        let baseline = BaselineSummary::new(avg as f64, 100.0);
        let (status, issues) = FeedAnalyzer::new().classify(count, 100.0, &baseline);
        prop_assert_eq!(status, FeedStatus::Warning);
        prop_assert!(has_count_issue(&issues));
    }
}
