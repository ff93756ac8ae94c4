//! Service configuration
//!
//! One JSON file configures a deployment. The historical fleet ran
//! several copies of this service differing only in the shared secret,
//! the config-var name handed back to the marketplace, and the billing
//! plan; those are exactly the knobs exposed here.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;

/// Default Cloud SQL administration endpoint
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/sql/v1beta3";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Add-on facing settings (auth secret, envelope config var)
    pub addon: AddonConfig,

    /// Upstream control-plane settings
    pub control_plane: ControlPlaneConfig,

    /// Readiness poll budget
    #[serde(default)]
    pub poll: PollConfig,
}

/// Settings for the marketplace-facing surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonConfig {
    /// Shared secret the marketplace presents as the Basic-auth password (required)
    pub secret: String,

    /// Name of the config var carrying the instance address (default "GOOGLECLOUDSQL_URL")
    #[serde(default = "default_config_url_var")]
    pub config_url_var: String,
}

/// Settings for the Cloud SQL administration API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlPlaneConfig {
    /// Project that owns the instances (required)
    pub project: String,

    /// API base URL (default: the public v1beta3 endpoint)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// App Engine applications granted access to new instances
    #[serde(default)]
    pub authorized_apps: Vec<String>,

    /// Billing plan for new instances (default "PER_USE")
    #[serde(default = "default_pricing_plan")]
    pub pricing_plan: String,

    /// Fixed access token. When set, bypasses the metadata server
    /// (development and tests only).
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Readiness poll budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Maximum readiness fetches per operation (default 20)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between fetches in milliseconds (default 3000)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_config_url_var() -> String {
    "GOOGLECLOUDSQL_URL".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_pricing_plan() -> String {
    "PER_USE".to_string()
}

fn default_max_attempts() -> u32 {
    20
}

fn default_interval_ms() -> u64 {
    3000
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl PollConfig {
    /// Pause between fetches as a Duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        let config: Config = serde_json::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.addon.secret.is_empty() {
            return Err(ConfigError::Invalid("addon.secret must not be empty"));
        }

        if self.addon.config_url_var.is_empty() {
            return Err(ConfigError::Invalid(
                "addon.config_url_var must not be empty",
            ));
        }

        if self.control_plane.project.is_empty() {
            return Err(ConfigError::Invalid(
                "control_plane.project must not be empty",
            ));
        }

        if self.control_plane.base_url.is_empty() {
            return Err(ConfigError::Invalid(
                "control_plane.base_url must not be empty",
            ));
        }

        if self.poll.max_attempts == 0 {
            return Err(ConfigError::Invalid("poll.max_attempts must be > 0"));
        }

        Ok(())
    }
}

/// Configuration load/validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(String),

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}
