// common/src/messages.rs
use serde::{Deserialize, Serialize};

/// Envelope for a chat text frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub pid: String,
    pub content: String,
    pub timestamp: u64,
}

impl ChatMessage {
    pub fn new(pid: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            content: content.into(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }
}
