//! Client settings

use std::path::Path;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::errors::{ensure_not_blank, KuduError};
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Environment variable holding the scm site base URI
pub const ENV_BASE_URI: &str = "KUDU_CLIENT_BASEURI";
/// Environment variable holding the deployment user name
pub const ENV_USER_NAME: &str = "KUDU_CLIENT_USERNAME";
/// Environment variable holding the deployment password
pub const ENV_PASSWORD: &str = "KUDU_CLIENT_PASSWORD";
/// Environment variable overriding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "KUDU_CLIENT_TIMEOUT_SECS";

/// Settings for connecting to a Kudu scm site
#[derive(Debug, Deserialize)]
pub struct KuduClientSettings {
    /// Base URI of the scm site, e.g. `https://mysite.scm.azurewebsites.net`
    pub base_uri: String,

    /// Deployment credentials user name
    pub user_name: String,

    /// Deployment credentials password
    pub password: SecretString,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level used when the caller initializes logging from these settings
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_timeout_secs() -> u64 {
    300
}

impl KuduClientSettings {
    /// Create validated settings with the default timeout
    pub fn new(
        base_uri: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, KuduError> {
        let settings = Self {
            base_uri: base_uri.into(),
            user_name: user_name.into(),
            password: SecretString::from(password.into()),
            timeout_secs: default_timeout_secs(),
            log_level: LogLevel::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from the `KUDU_CLIENT_*` environment variables
    pub fn from_env() -> Result<Self, KuduError> {
        let mut settings = Self::new(
            require_env(ENV_BASE_URI)?,
            require_env(ENV_USER_NAME)?,
            require_env(ENV_PASSWORD)?,
        )?;

        if let Ok(timeout) = std::env::var(ENV_TIMEOUT_SECS) {
            settings.timeout_secs = timeout.trim().parse().map_err(|_| {
                KuduError::ConfigError(format!("{ENV_TIMEOUT_SECS} is not a number: {timeout}"))
            })?;
        }

        Ok(settings)
    }

    /// Load settings from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, KuduError> {
        let file = File::new(path.as_ref());
        if !file.exists().await {
            return Err(KuduError::FileNotFound(path.as_ref().to_path_buf()));
        }
        let settings: Self = file.read_json().await?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that every required value is present
    pub fn validate(&self) -> Result<(), KuduError> {
        ensure_not_blank(&self.base_uri, "base_uri")?;
        ensure_not_blank(&self.user_name, "user_name")?;
        ensure_not_blank(self.password.expose_secret(), "password")?;
        if self.timeout_secs == 0 {
            return Err(KuduError::ConfigError("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn require_env(name: &str) -> Result<String, KuduError> {
    std::env::var(name).map_err(|_| KuduError::ConfigError(format!("{name} is not set")))
}
