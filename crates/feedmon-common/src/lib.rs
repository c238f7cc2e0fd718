//! Shared data model for the feed monitoring job.
//!
//! Every other `feedmon-*` crate speaks in terms of the types defined here:
//! [`types::FileRecord`] produced by a metadata source, the
//! [`types::DailyAggregate`] rows persisted for future baselines, and the
//! [`types::FeedHealthResult`] emitted by the analyzer.

pub mod path_date;
pub mod types;
