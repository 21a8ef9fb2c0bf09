// common/src/config.rs
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use config::{Config as ConfigFile, File, Environment};

/// Central configuration for the gate server
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub https: HttpsConfig,
    pub admin: AdminConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub addr: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpsConfig {
    pub addr: String,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Static credential pair for the admin API
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub login: String,
    // Empty means "generate one at startup"
    pub pass: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sliding cookie lifetime, counted from the last successful validation
    pub timeout_hours: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Provision a client on first contact with an unknown identifier
    pub auto_register: bool,
    /// Profile bound to auto-provisioned clients
    pub default_profile: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub buffer_lines: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Default for HttpsConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8443".to_string(),
            cert_path: None,
            key_path: None,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            login: "admin".to_string(),
            pass: String::new(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { timeout_hours: 24 }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auto_register: true,
            default_profile: "default@localhost".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { buffer_lines: 1000 }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        // Get the run mode, defaulting to "development"
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Check if we're in the project root or a subcrate
                let mut path = PathBuf::from("./config");
                if !path.exists() {
                    path = PathBuf::from("../config");
                }
                path
            });

        tracing::info!("Loading configuration from {}", config_dir.display());
        tracing::info!("Using run mode: {}", run_mode);

        let config = ConfigFile::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", run_mode))).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // APP__ADMIN__PASS=... overrides admin.pass
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load from files, falling back to plain environment variables
    pub fn from_env() -> Self {
        match Self::load() {
            Ok(config) => {
                tracing::info!("Configuration loaded from files and environment");
                config
            },
            Err(e) => {
                tracing::warn!("Failed to load configuration from files: {}", e);
                tracing::info!("Falling back to environment variables only");
                Self::from_plain_env()
            }
        }
    }

    fn from_plain_env() -> Self {
        let defaults = Self::default();

        let http_addr = env::var("HTTP_SERVER_ADDR")
            .unwrap_or(defaults.http.addr);

        let https_addr = env::var("HTTPS_SERVER_ADDR")
            .unwrap_or(defaults.https.addr);
        let cert_path = env::var("HTTPS_CERT_PATH").ok();
        let key_path = env::var("HTTPS_KEY_PATH").ok();

        let admin_login = env::var("ADMIN_LOGIN")
            .unwrap_or(defaults.admin.login);
        let admin_pass = env::var("ADMIN_PASS")
            .unwrap_or(defaults.admin.pass);

        let timeout_hours = env::var("WEB_SESSION_TIMEOUT_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(defaults.session.timeout_hours);

        let auto_register = env::var("AUTO_REGISTER")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(defaults.auth.auto_register);
        let default_profile = env::var("DEFAULT_PROFILE")
            .unwrap_or(defaults.auth.default_profile);

        let buffer_lines = env::var("LOG_BUFFER_LINES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.log.buffer_lines);

        Self {
            http: HttpConfig { addr: http_addr },
            https: HttpsConfig {
                addr: https_addr,
                cert_path,
                key_path,
            },
            admin: AdminConfig {
                login: admin_login,
                pass: admin_pass,
            },
            session: SessionConfig { timeout_hours },
            auth: AuthConfig {
                auto_register,
                default_profile,
            },
            log: LogConfig { buffer_lines },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.session.timeout_hours, 24);
        assert!(config.auth.auto_register);
        assert!(config.admin.pass.is_empty());
        assert!(config.https.cert_path.is_none());
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: Config = ConfigFile::builder()
            .set_override("admin.login", "root")
            .unwrap()
            .set_override("session.timeout_hours", 2_i64)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.admin.login, "root");
        assert_eq!(config.session.timeout_hours, 2);
        assert_eq!(config.http.addr, "0.0.0.0:8080");
        assert!(config.auth.auto_register);
    }
}
