//! Node health classification.
//!
//! Decides whether a failed launch attempt should be retried from a
//! snapshot of the network configuration and the launch policy.

use serde::Serialize;

use crate::domain::{AbortReason, LaunchPolicy, NetworkConfiguration};

/// Retry or stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RetryDecision {
    Retry,
    Abort(AbortReason),
}

impl RetryDecision {
    #[must_use]
    pub const fn is_retry(&self) -> bool {
        matches!(self, Self::Retry)
    }
}

/// Classifier output: the healthy count it saw and what it decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub available: usize,
    pub decision: RetryDecision,
}

/// Classify a failure.
///
/// `available` counts active or idle workers, never the front end. A missing
/// configuration counts as zero. In exhaust mode the loop stops only when
/// nothing is left; otherwise it stops once capacity equals one below the
/// requested node count.
#[must_use]
pub fn classify(net_conf: Option<&NetworkConfiguration>, policy: &LaunchPolicy) -> Classification {
    let available = net_conf.map_or(0, NetworkConfiguration::available_workers);

    let decision = if policy.exhaust_resources {
        if available == 0 {
            RetryDecision::Abort(AbortReason::NoResourcesLeft)
        } else {
            RetryDecision::Retry
        }
    } else if available + 1 == policy.node_count {
        RetryDecision::Abort(AbortReason::InsufficientResources {
            available,
            node_count: policy.node_count,
        })
    } else {
        RetryDecision::Retry
    };

    Classification {
        available,
        decision,
    }
}
