//! Command session settings.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Placeholder the launcher template wraps around each node command.
pub const COMMAND_PLACEHOLDER: &str = "{command}";

/// Settings for the command-driven launch session.
///
/// Every command is a template. Node commands may use `{host}`, `{index}`,
/// and `{session}`; the launcher template additionally receives the rendered
/// node command as `{command}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Worker host names, in ordinal order.
    #[serde(default)]
    pub hosts: Vec<String>,

    /// File with one host per line, appended after `hosts`.
    #[serde(default)]
    pub hostfile: Option<PathBuf>,

    /// How a command reaches a node, e.g. `ssh {host} {command}`.
    #[serde(default = "default_launcher")]
    pub launcher: String,

    /// Per-node infrastructure bring-up.
    #[serde(default)]
    pub startup: Option<String>,

    /// The user application, run on the front end.
    #[serde(default)]
    pub app: String,

    /// Control/message-server command, run on the front end.
    #[serde(default)]
    pub msg_server: Option<String>,

    /// Per-node health probe, run after an app failure.
    #[serde(default)]
    pub probe: Option<String>,

    /// Per-node teardown.
    #[serde(default)]
    pub shutdown: Option<String>,

    /// Seconds a shutdown command may run before it is killed.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

fn default_launcher() -> String {
    COMMAND_PLACEHOLDER.to_string()
}

const fn default_shutdown_timeout_secs() -> u64 {
    30
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            hostfile: None,
            launcher: default_launcher(),
            startup: None,
            app: String::new(),
            msg_server: None,
            probe: None,
            shutdown: None,
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl SessionSettings {
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Append the hostfile's hosts to `hosts` and forget the file.
    ///
    /// Blank lines and `#` comments are skipped.
    #[allow(clippy::result_large_err)]
    pub fn resolve_hostfile(&mut self) -> Result<()> {
        let Some(path) = self.hostfile.take() else {
            return Ok(());
        };
        let contents = fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        self.hosts.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(ToOwned::to_owned),
        );
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    pub(crate) fn validate(&self) -> Result<()> {
        if self.app.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "session.app",
            }
            .into());
        }
        if !self.launcher.contains(COMMAND_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue {
                field: "session.launcher",
                reason: format!("must contain {COMMAND_PLACEHOLDER}"),
            }
            .into());
        }
        if self.shutdown_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.shutdown_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.hosts.iter().any(|host| host.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "session.hosts",
                reason: "host names cannot be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
