/// Relative deviation above which a metric is flagged. Equal to the
/// threshold is not a deviation.
pub const DEVIATION_THRESHOLD: f64 = 0.25;

/// The delivery metrics compared against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    FileCount,
    SizeMb,
}

/// A metric whose observed value strays from its baseline by more than the
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    pub metric: Metric,
    pub observed: f64,
    pub expected: f64,
    pub ratio: f64,
    pub threshold: f64,
}

impl Deviation {
    /// Compares `observed` with `expected`. Returns `None` when the deviation
    /// is within `threshold` or when there is no baseline (`expected <= 0`).
    ///
    /// # Examples
    ///
    /// ```
    /// use feedmon_analyzer::deviation::{Deviation, Metric};
    ///
    /// let d = Deviation::check(Metric::FileCount, 5.0, 10.0, 0.25).unwrap();
    /// assert_eq!(d.ratio, 0.5);
    /// assert!(Deviation::check(Metric::FileCount, 5.0, 0.0, 0.25).is_none());
    /// assert!(Deviation::check(Metric::FileCount, 12.5, 10.0, 0.25).is_none());
    /// ```
    pub fn check(metric: Metric, observed: f64, expected: f64, threshold: f64) -> Option<Self> {
        if expected <= 0.0 {
            return None;
        }
        let ratio = (observed - expected).abs() / expected;
        (ratio > threshold).then_some(Self {
            metric,
            observed,
            expected,
            ratio,
            threshold,
        })
    }

    /// Issue line for the report.
    pub fn issue(&self) -> String {
        let pct = self.threshold * 100.0;
        match self.metric {
            Metric::FileCount => format!(
                "File count deviates >{pct:.0}%: {:.0} vs baseline {:.1}",
                self.observed, self.expected
            ),
            Metric::SizeMb => format!(
                "Size deviates >{pct:.0}%: {:.2} MB vs baseline {:.2} MB",
                self.observed, self.expected
            ),
        }
    }
}
