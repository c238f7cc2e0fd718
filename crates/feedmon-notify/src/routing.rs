use feedmon_common::types::FeedStatus;
use serde::{Deserialize, Serialize};

/// Decides which detail blocks mention the feed's recipients.
///
/// Recipients are mentioned when the feed's status is at least
/// `min_status`; OK feeds never mention anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionPolicy {
    pub min_status: FeedStatus,
}

impl MentionPolicy {
    pub fn critical_only() -> Self {
        Self {
            min_status: FeedStatus::Critical,
        }
    }

    pub fn warning_and_critical() -> Self {
        Self {
            min_status: FeedStatus::Warning,
        }
    }

    pub fn should_mention(&self, status: FeedStatus) -> bool {
        status.needs_attention() && status >= self.min_status
    }
}

impl Default for MentionPolicy {
    fn default() -> Self {
        Self::warning_and_critical()
    }
}
