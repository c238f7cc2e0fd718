//! Feed health analysis engine.
//!
//! Given the file records listed for a feed and a historical
//! [`BaselineSummary`](feedmon_common::types::BaselineSummary), the
//! [`analyzer::FeedAnalyzer`] decides whether today's delivery is OK,
//! deviates from the baseline (WARNING), or is missing entirely (CRITICAL).
//! The crate is pure: it performs no I/O and holds no shared state, so a
//! caller may analyze feeds concurrently.

pub mod analyzer;
pub mod deviation;
pub mod grouping;
pub mod window;
