//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates the launch policy,
//! command session, and logging settings. Configuration is loaded from a
//! TOML file; the CLI may override launch settings before validation.
//!
//! # Example
//!
//! ```no_run
//! use nodelaunch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("nodelaunch.toml")?;
//!     config.init_logging()?;
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::session::SessionSettings;
use crate::domain::LaunchPolicy;
use crate::error::{ConfigError, Result};

/// The `[launch]` table: retry policy inputs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LaunchConfig {
    /// Number of worker nodes each attempt starts.
    #[serde(default = "default_node_count")]
    pub node_count: usize,

    /// Retry after a failed attempt instead of exiting.
    #[serde(default)]
    pub resilient: bool,

    /// Keep retrying until no healthy worker is left.
    #[serde(default)]
    pub exhaust_resources: bool,

    /// Cap on the number of attempts. Unbounded when absent.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_node_count() -> usize {
    1
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            node_count: default_node_count(),
            resilient: false,
            exhaust_resources: false,
            max_attempts: None,
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Both resolve the session hostfile and validate.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub launch: LaunchConfig,

    #[serde(default)]
    pub session: SessionSettings,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, the hostfile cannot be
    /// read, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config = Self::parse_unvalidated(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse without validating, so CLI overrides can be applied first.
    #[allow(clippy::result_large_err)]
    pub fn parse_unvalidated(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.session.resolve_hostfile()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::load_unvalidated(path)?;
        config.validate()?;
        Ok(config)
    }

    #[allow(clippy::result_large_err)]
    pub fn load_unvalidated<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_unvalidated(&content)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.launch.node_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "launch.node_count",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.launch.max_attempts == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "launch.max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        self.session.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Launch policy described by the `[launch]` table.
    #[allow(clippy::result_large_err)]
    pub fn policy(&self) -> Result<LaunchPolicy> {
        let policy = LaunchPolicy::try_new(
            self.launch.node_count,
            self.launch.resilient,
            self.launch.exhaust_resources,
        )?;
        Ok(policy.with_max_attempts(self.launch.max_attempts))
    }

    /// Initialize the tracing subscriber from `[logging]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened or a subscriber is
    /// already installed.
    pub fn init_logging(&self) -> Result<()> {
        self.logging.init()
    }
}
