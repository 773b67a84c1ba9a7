//! Configuration types for automail

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use url::Url;

/// Backend HTTP service configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL all endpoint paths are resolved against
    /// (default: "http://127.0.0.1:8000/api/")
    ///
    /// A trailing slash is significant: `Url::join` replaces the last path
    /// segment when it is missing. [`BackendConfig::endpoint`] adds it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (default: 120 seconds)
    ///
    /// Batch sends block until the backend has delivered the whole batch.
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl BackendConfig {
    /// Resolve an endpoint path (e.g. "send-email") against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = Url::parse(&self.base_url)?;
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }
}

/// Progress polling configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between task status queries (default: 1000 ms)
    #[serde(default = "default_poll_interval", with = "millis_serde")]
    pub interval: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
        }
    }
}

/// Default sender credentials
///
/// Pre-fills the compose form; an explicit value on the form always wins.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Sender email address
    #[serde(default)]
    pub email: Option<String>,

    /// Sender secret (SMTP app password)
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl SenderConfig {
    /// Read `SENDER_EMAIL` and `SENDER_PASSWORD` from the environment
    ///
    /// Empty variables are treated as unset.
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            email: read("SENDER_EMAIL"),
            password: read("SENDER_PASSWORD"),
        }
    }

    /// Fill unset fields from `other`
    pub fn merge(self, other: SenderConfig) -> Self {
        Self {
            email: self.email.or(other.email),
            password: self.password.or(other.password),
        }
    }
}

/// Main configuration for the [`Composer`](crate::Composer)
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Backend service settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Progress polling settings
    #[serde(default)]
    pub polling: PollingConfig,

    /// Default sender credentials
    #[serde(default)]
    pub sender: SenderConfig,

    /// Capacity of the event broadcast channel (default: 256)
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            polling: PollingConfig::default(),
            sender: SenderConfig::default(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot express
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.backend.base_url).map_err(|e| Error::Config {
            message: format!("invalid backend base URL '{}': {}", self.backend.base_url, e),
            key: Some("backend.base_url".to_string()),
        })?;

        if self.polling.interval.is_zero() {
            return Err(Error::Config {
                message: "polling interval must be greater than zero".to_string(),
                key: Some("polling.interval".to_string()),
            });
        }

        if self.event_buffer == 0 {
            return Err(Error::Config {
                message: "event buffer must hold at least one event".to_string(),
                key: Some("event_buffer".to_string()),
            });
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api/".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_user_agent() -> String {
    format!("automail/{}", env!("CARGO_PKG_VERSION"))
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(1000)
}

fn default_event_buffer() -> usize {
    256
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds)
mod millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
