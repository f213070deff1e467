//! Settings file management

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::errors::DeployerError;
use crate::http::client::ClientOptions;
use crate::logs::{LogLevel, LogOptions};

/// Deployer settings
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Tenant configuration
    #[serde(default)]
    pub tenant: TenantSettings,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Emit JSON logs
    #[serde(default)]
    pub json_logs: bool,

    /// Directory for log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            tenant: TenantSettings::default(),
            request_timeout_secs: default_request_timeout(),
            json_logs: false,
            log_dir: None,
        }
    }
}

/// Tenant settings
#[derive(Debug, Default, Deserialize)]
pub struct TenantSettings {
    /// Origin of the tenant, e.g. `https://tenant.example.com`
    #[serde(default)]
    pub origin: Option<String>,

    /// Cookie header of an authenticated browser session
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub session_cookie: Option<SecretString>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from))
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults if it does not exist
    pub async fn load(path: &Path) -> Result<Self, DeployerError> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        Self::from_json(&contents).map_err(|e| {
            DeployerError::ConfigError(format!("Invalid settings file {}: {}", path.display(), e))
        })
    }

    pub fn from_json(contents: &str) -> Result<Self, DeployerError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Logging options derived from these settings
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            log_level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
            json_format: self.json_logs,
            ..Default::default()
        }
    }

    /// Client options for the given tenant origin
    pub fn client_options(&self, origin: &str) -> ClientOptions {
        ClientOptions {
            origin: origin.to_string(),
            session_cookie: self
                .tenant
                .session_cookie
                .as_ref()
                .map(|cookie| SecretString::from(cookie.expose_secret().to_string())),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}
