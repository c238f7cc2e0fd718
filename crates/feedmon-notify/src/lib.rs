//! Report rendering and delivery for feed health results.
//!
//! [`report::ReportFormatter`] turns analysis results into a chat-friendly
//! message (overview table plus per-feed detail blocks), and a [`Notifier`]
//! delivers it. Built-in notifiers post to a Slack-compatible incoming
//! webhook or only log the message.

pub mod channels;
pub mod error;
pub mod report;
pub mod routing;
pub mod utils;


use async_trait::async_trait;
use error::Result;

/// A delivery channel for the composed daily report.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `message` through this channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel rejects or cannot receive the message.
    /// Callers log the failure and carry on.
    async fn notify(&self, message: &str) -> Result<()>;

    /// Returns the channel type name (e.g., `"webhook"`, `"log"`).
    fn channel_name(&self) -> &str;
}
