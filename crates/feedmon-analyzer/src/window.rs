use crate::grouping::{files_on, FilesByDate};
use chrono::{Days, NaiveDate};
use feedmon_common::types::{total_size_mb, BaselineSummary, DailyAggregate};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` consecutive dates ending at `end` (at least one day).
    /// The start clamps at [`NaiveDate::MIN`].
    pub fn ending_at(end: NaiveDate, days: u32) -> Self {
        let span = u64::from(days.max(1) - 1);
        Self {
            start: days_before(end, span),
            end,
        }
    }

    /// History preceding `target`: ends the day before `target` and starts
    /// `days` days earlier, so `[target - days - 1, target - 1]`. Both ends
    /// clamp at [`NaiveDate::MIN`].
    pub fn baseline_for(target: NaiveDate, days: u32) -> Self {
        let end = days_before(target, 1);
        Self {
            start: days_before(end, u64::from(days)),
            end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of dates in the window (0 when `start > end`).
    pub fn len_days(&self) -> u64 {
        let span = (self.end - self.start).num_days();
        u64::try_from(span + 1).unwrap_or(0)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// One aggregate per date in `window`, zero-filled for dates without files.
pub fn rolling_aggregates(
    feed_label: &str,
    grouped: &FilesByDate<'_>,
    window: DateWindow,
) -> Vec<DailyAggregate> {
    window
        .dates()
        .map(|date| DailyAggregate::from_files(feed_label, date, files_on(grouped, date)))
        .collect()
}

/// Baseline computed straight from a raw listing: the mean daily count and
/// size over the dates in `window` that received at least one file. Days
/// without files do not count toward the mean.
pub fn listing_baseline(grouped: &FilesByDate<'_>, window: DateWindow) -> BaselineSummary {
    if window.start > window.end {
        return BaselineSummary::default();
    }

    let mut days = 0u32;
    let mut count_sum = 0.0;
    let mut size_sum = 0.0;

    for (_, files) in grouped.range(window.start..=window.end) {
        days += 1;
        count_sum += files.len() as f64;
        size_sum += total_size_mb(files.iter().copied());
    }

    if days == 0 {
        return BaselineSummary::default();
    }
    BaselineSummary::new(count_sum / f64::from(days), size_sum / f64::from(days))
}
