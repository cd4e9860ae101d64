//! Node identity and lifecycle state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Textual key reserved for the front end's own slot.
const FRONT_END_KEY: &str = "frontend";

/// Index of a node inside a [`NetworkConfiguration`](super::network::NetworkConfiguration).
///
/// The front end occupies a reserved slot that never counts as worker
/// capacity. Worker ordinals sort after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum NodeIndex {
    /// The coordinating process itself.
    FrontEnd,
    /// A worker node ordinal.
    Worker(u32),
}

impl NodeIndex {
    /// True for the reserved front-end slot.
    #[must_use]
    pub const fn is_front_end(self) -> bool {
        matches!(self, Self::FrontEnd)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrontEnd => f.write_str(FRONT_END_KEY),
            Self::Worker(ordinal) => write!(f, "{ordinal}"),
        }
    }
}

impl FromStr for NodeIndex {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == FRONT_END_KEY {
            return Ok(Self::FrontEnd);
        }
        s.parse::<u32>()
            .map(Self::Worker)
            .map_err(|_| DomainError::InvalidNodeIndex {
                value: s.to_string(),
            })
    }
}

impl From<NodeIndex> for String {
    fn from(index: NodeIndex) -> Self {
        index.to_string()
    }
}

impl TryFrom<String> for NodeIndex {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lifecycle state of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    /// Selected for startup, not yet confirmed.
    #[default]
    Pending,
    /// Running workload.
    Active,
    /// Healthy and available, not assigned.
    Idle,
    /// Unreachable or failed to start.
    Down,
    /// Reported an error during a phase.
    Error,
}

impl NodeState {
    /// Whether the node counts toward healthy capacity.
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        match self {
            Self::Active | Self::Idle => true,
            Self::Pending | Self::Down | Self::Error => false,
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Idle => "idle",
            Self::Down => "down",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Descriptor for one node of the execution environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    index: NodeIndex,
    host_name: String,
    state: NodeState,
}

impl NodeDescriptor {
    /// Create a descriptor.
    pub fn new(index: NodeIndex, host_name: impl Into<String>, state: NodeState) -> Self {
        Self {
            index,
            host_name: host_name.into(),
            state,
        }
    }

    /// Descriptor for the front end's own slot.
    pub fn front_end(host_name: impl Into<String>) -> Self {
        Self::new(NodeIndex::FrontEnd, host_name, NodeState::Active)
    }

    #[must_use]
    pub const fn index(&self) -> NodeIndex {
        self.index
    }

    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    #[must_use]
    pub const fn state(&self) -> NodeState {
        self.state
    }

    pub fn set_state(&mut self, state: NodeState) {
        self.state = state;
    }

    /// Healthy and not the front end.
    #[must_use]
    pub const fn is_available_worker(&self) -> bool {
        !self.index.is_front_end() && self.state.is_healthy()
    }
}
