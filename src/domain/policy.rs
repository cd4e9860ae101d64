//! Retry policy for the launch loop.

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Operating policy for the orchestration loop.
///
/// `resilient` turns classification and retry on; `exhaust_resources`
/// selects between retrying until nothing is left and stopping once capacity
/// falls one below `node_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchPolicy {
    /// Retry on failure instead of aborting.
    pub resilient: bool,
    /// Keep retrying until zero healthy nodes remain.
    pub exhaust_resources: bool,
    /// Originally requested worker node count.
    pub node_count: usize,
    /// Upper bound on launch attempts. `None` means unbounded.
    pub max_attempts: Option<u32>,
}

impl LaunchPolicy {
    /// Create a validated policy.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ZeroNodeCount`] when `node_count` is 0.
    pub fn try_new(
        node_count: usize,
        resilient: bool,
        exhaust_resources: bool,
    ) -> Result<Self, DomainError> {
        if node_count == 0 {
            return Err(DomainError::ZeroNodeCount);
        }
        Ok(Self {
            resilient,
            exhaust_resources,
            node_count,
            max_attempts: None,
        })
    }

    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Whether another attempt is permitted after `attempts` have run.
    #[must_use]
    pub fn allows_attempt_after(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }
}
