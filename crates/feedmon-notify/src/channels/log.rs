use crate::error::Result;
use crate::Notifier;
use async_trait::async_trait;

/// Notifier that only writes the report to the log. Used when no webhook
/// is configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        tracing::info!(
            channel = "log",
            length = message.len(),
            "No webhook configured, report not delivered"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "log"
    }
}
