//! Settings file management

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deploy::tracker;
use crate::errors::ClientError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Environment variable overriding the configured server URL
pub const ENV_BASE_URL: &str = "MARATHON_URL";

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,

    /// Control plane connection
    #[serde(default)]
    pub server: ServerSettings,

    /// Deployment tracking
    #[serde(default)]
    pub deployment: DeploymentSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            json_logs: false,
            server: ServerSettings::default(),
            deployment: DeploymentSettings::default(),
        }
    }
}

impl Settings {
    /// Read a settings file (`.json` or `.yaml`)
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let file = File::new(path.as_ref());
        if !file.exists().await {
            return Err(ClientError::ConfigError(format!(
                "settings file {} not found",
                file.path().display()
            )));
        }
        file.read_as().await
    }

    /// Apply environment overrides
    pub fn with_env(self) -> Self {
        self.with_base_url(std::env::var(ENV_BASE_URL).ok())
    }

    fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            debug!("Settings: base url overridden by {}", ENV_BASE_URL);
            self.server.base_url = url;
        }
        self
    }
}

/// Control plane settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL of the control plane, credentials allowed as `user:pass@`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Deployment tracking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentSettings {
    /// How long to wait for a deployment to converge
    #[serde(default = "default_deployment_timeout")]
    pub timeout_secs: u64,

    /// Delay between two polls of the deployment list
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_deployment_timeout() -> u64 {
    300
}

fn default_poll_interval() -> u64 {
    1
}

impl Default for DeploymentSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_deployment_timeout(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl DeploymentSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tracker_options(&self) -> tracker::Options {
        tracker::Options {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }
}
