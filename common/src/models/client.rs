// common/src/models/client.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A known client. `pid` alone is not unique: several records may share it
/// and are told apart by `token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Client identifier, carried in the `abc` cookie
    pub pid: String,
    /// Current session token, carried in the `cba` cookie
    pub token: String,
    /// Stored credential
    pub pass: String,
    /// Email of the bound profile
    pub profile: String,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(pid: impl Into<String>, token: impl Into<String>, pass: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            token: token.into(),
            pass: pass.into(),
            profile: profile.into(),
            created_at: Utc::now(),
        }
    }

    /// First-contact client: the submitted token doubles as the stored credential
    pub fn provisioned(pid: &str, token: &str, profile: &str) -> Self {
        Self::new(pid, token, token, profile)
    }
}

/// Client data safe to hand out over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientView {
    pub pid: String,
    pub profile: String,
    pub created_at: DateTime<Utc>,
    // Omit token and pass
}

impl From<&Client> for ClientView {
    fn from(client: &Client) -> Self {
        Self {
            pid: client.pid.clone(),
            profile: client.profile.clone(),
            created_at: client.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioned_uses_token_as_pass() {
        let client = Client::provisioned("alice", "secret1", "default@localhost");
        assert_eq!(client.token, "secret1");
        assert_eq!(client.pass, "secret1");
        assert_eq!(client.profile, "default@localhost");
    }

    #[test]
    fn test_view_hides_secrets() {
        let client = Client::provisioned("alice", "secret1", "default@localhost");
        let json = serde_json::to_value(ClientView::from(&client)).unwrap();
        assert_eq!(json["pid"], "alice");
        assert!(json.get("token").is_none());
        assert!(json.get("pass").is_none());
    }
}
