use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::node::NodeIndex;
use crate::domain::outcome::Phase;
use crate::domain::NetworkConfiguration;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures raised by a launch session, at acquisition or inside a phase.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no hosts configured")]
    NoHosts,

    #[error("no healthy nodes left to start")]
    NoHealthyNodes,

    #[error("{} node(s) failed: {}", failed.len(), format_indices(failed))]
    NodesFailed { failed: Vec<NodeIndex> },

    #[error("command `{command}` exited with {status}")]
    CommandFailed { command: String, status: String },

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}

fn format_indices(indices: &[NodeIndex]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A phase of a launch attempt failed.
///
/// `snapshot` is the session's view of the nodes at the moment of failure,
/// when it had one. The orchestration loop carries it into the next attempt.
#[derive(Error, Debug)]
#[error("{phase} phase failed: {source}")]
pub struct PhaseError {
    pub phase: Phase,
    #[source]
    pub source: SessionError,
    pub snapshot: Option<NetworkConfiguration>,
}

impl PhaseError {
    pub fn new(phase: Phase, source: SessionError) -> Self {
        Self {
            phase,
            source,
            snapshot: None,
        }
    }

    #[must_use]
    pub fn with_snapshot(mut self, snapshot: NetworkConfiguration) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
