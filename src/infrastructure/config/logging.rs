//! Logging configuration and initialization.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::error::{ConfigError, Error, Result};

/// File name of the log written by the `file` device.
pub const LOG_FILE_NAME: &str = "nodelaunch.log";

/// Log record format for the stderr device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogDevice {
    Stderr,
    File,
}

/// Logging configuration.
///
/// `devices` maps each enabled device to its level filter. Stderr is always
/// on and falls back to `level`; the file device is on only when listed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub devices: BTreeMap<LogDevice, String>,
    /// Directory for the log file. Defaults to the working directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_level() -> String {
    "info".into()
}

impl LoggingConfig {
    /// Level filter for `device`, if the device is enabled.
    #[must_use]
    pub fn level_for(&self, device: LogDevice) -> Option<&str> {
        match (device, self.devices.get(&device)) {
            (_, Some(level)) => Some(level.as_str()),
            (LogDevice::Stderr, None) => Some(self.level.as_str()),
            (LogDevice::File, None) => None,
        }
    }

    /// Path of the log file, if the file device is enabled.
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        self.level_for(LogDevice::File)?;
        let directory = self.directory.clone().unwrap_or_else(|| PathBuf::from("."));
        Some(directory.join(LOG_FILE_NAME))
    }

    #[allow(clippy::result_large_err)]
    pub(crate) fn validate(&self) -> Result<()> {
        for device in [LogDevice::Stderr, LogDevice::File] {
            if let Some(level) = self.level_for(device) {
                if EnvFilter::try_new(level).is_err() {
                    return Err(ConfigError::InvalidValue {
                        field: "logging.level",
                        reason: format!("'{level}' is not a valid level filter"),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// `RUST_LOG` overrides the stderr level.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened or a global
    /// subscriber is already installed.
    pub fn init(&self) -> Result<()> {
        let stderr_level = self.level_for(LogDevice::Stderr).unwrap_or("info");
        let stderr_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(stderr_level));

        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
        let stderr = fmt::layer().with_writer(std::io::stderr);
        layers.push(match self.format {
            LogFormat::Json => stderr.json().with_filter(stderr_filter).boxed(),
            LogFormat::Pretty => stderr.with_filter(stderr_filter).boxed(),
        });

        if let (Some(path), Some(level)) = (self.file_path(), self.level_for(LogDevice::File)) {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            layers.push(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(EnvFilter::new(level))
                    .boxed(),
            );
        }

        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .map_err(|e| Error::Logging(e.to_string()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::Pretty,
            devices: BTreeMap::new(),
            directory: None,
        }
    }
}
