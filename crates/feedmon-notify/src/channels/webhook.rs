use crate::error::{NotifyError, Result};
use crate::utils::{truncate_string, MAX_BODY_LENGTH};
use crate::Notifier;
use async_trait::async_trait;
use serde_json::Value;

/// Posts the report to a Slack-compatible incoming webhook.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(NotifyError::InvalidConfig("webhook url is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// JSON body sent for `message`, with Slack markdown rendering enabled.
    pub fn payload(message: &str) -> Value {
        serde_json::json!({
            "text": message,
            "mrkdwn": true,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url.as_str())
            .json(&Self::payload(message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(channel = "webhook", status = status.as_u16(), "Report delivered");
            return Ok(());
        }

        let body = match response.text().await {
            Ok(text) => truncate_string(&text, MAX_BODY_LENGTH),
            Err(e) => format!("[Failed to read response body: {e}]"),
        };
        Err(NotifyError::Api {
            service: "webhook".to_string(),
            status: status.as_u16(),
            body,
        })
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }
}
