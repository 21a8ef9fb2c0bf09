// common/src/models/profile.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account profile a client is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}
