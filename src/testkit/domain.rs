//! Builders for network configurations used across tests.

use crate::domain::{NetworkConfiguration, NodeDescriptor, NodeIndex, NodeState};

/// Front end plus one worker per entry of `states`, ordinals from 0.
pub fn network(states: &[NodeState]) -> NetworkConfiguration {
    let mut conf = NetworkConfiguration::new();
    conf.insert(NodeDescriptor::front_end("fe"));
    for (ordinal, state) in (0u32..).zip(states) {
        conf.insert(worker(ordinal, *state));
    }
    conf
}

/// Front end plus `n` active workers.
pub fn healthy_network(n: usize) -> NetworkConfiguration {
    network(&vec![NodeState::Active; n])
}

/// Front end plus `healthy` active and `down` failed workers.
pub fn degraded_network(healthy: usize, down: usize) -> NetworkConfiguration {
    let mut states = vec![NodeState::Active; healthy];
    states.extend(std::iter::repeat(NodeState::Down).take(down));
    network(&states)
}

/// Worker descriptor on host `n{ordinal}`.
pub fn worker(ordinal: u32, state: NodeState) -> NodeDescriptor {
    NodeDescriptor::new(NodeIndex::Worker(ordinal), format!("n{ordinal}"), state)
}
