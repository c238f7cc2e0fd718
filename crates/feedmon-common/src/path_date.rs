//! Delivery-date extraction from Hive-style object paths.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static DATE_SEGMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"year=(\d{4})/month=(\d{2})/day=(\d{2})").expect("date segment pattern is valid")
});

/// Marker used by some storage tools to emulate directories.
pub const FOLDER_MARKER: &str = "$folder$";

/// Returns true for keys that stand for a directory rather than a file.
///
/// # Examples
///
/// ```
/// use feedmon_common::path_date::is_folder_placeholder;
///
/// assert!(is_folder_placeholder("impressions/year=2025_$folder$"));
/// assert!(is_folder_placeholder("impressions/year=2025/"));
/// assert!(!is_folder_placeholder("impressions/year=2025/month=06/day=19/a.parquet"));
/// ```
pub fn is_folder_placeholder(path: &str) -> bool {
    path.contains(FOLDER_MARKER) || path.ends_with('/')
}

/// Extracts the date encoded as `year=YYYY/month=MM/day=DD` anywhere in `path`.
///
/// Never fails: an out-of-range date or a path without the segments yields
/// `None` and a warning. Directory placeholders yield `None` silently.
pub fn extract_date(path: &str) -> Option<NaiveDate> {
    if path.contains(FOLDER_MARKER) {
        return None;
    }

    let Some(caps) = DATE_SEGMENTS.captures(path) else {
        if !path.ends_with('/') {
            tracing::warn!(path, "No date segment found in path");
        }
        return None;
    };

    let year = caps[1].parse::<i32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let day = caps[3].parse::<u32>().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        tracing::warn!(path, year, month, day, "Invalid date in path");
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_date_anywhere_in_path() {
        assert_eq!(
            extract_date("impressions-v4-parquet/year=2025/month=06/day=19/part-001.parquet"),
            NaiveDate::from_ymd_opt(2025, 6, 19)
        );
        assert_eq!(
            extract_date("location/region=USA/year=2024/month=02/day=29/x"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(
            extract_date("year=2025/month=01/day=02/copy/year=2024/month=03/day=04/f"),
            NaiveDate::from_ymd_opt(2025, 1, 2)
        );
    }

    #[test]
    fn invalid_calendar_date_is_none() {
        assert_eq!(extract_date("feed/year=2025/month=13/day=01/f"), None);
        assert_eq!(extract_date("feed/year=2023/month=02/day=29/f"), None);
    }

    #[test]
    fn missing_segments_is_none() {
        assert_eq!(extract_date("feed/2025-06-19/f.parquet"), None);
        assert_eq!(extract_date("feed/year=2025/month=6/day=19/f"), None);
        assert_eq!(extract_date("feed/year=2025/"), None);
    }

    #[test]
    fn folder_marker_is_none() {
        assert_eq!(extract_date("feed/year=2025/month=06/day=19_$folder$"), None);
    }
}
