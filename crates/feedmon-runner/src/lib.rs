//! Daily feed monitoring job.
//!
//! [`config::MonitorConfig`] describes the feeds and collaborators, and
//! [`pipeline::Pipeline`] runs one monitoring pass over them.

pub mod config;
pub mod pipeline;
