//! The network configuration carried between launch attempts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::node::{NodeDescriptor, NodeIndex, NodeState};

/// Mapping from node index to node descriptor.
///
/// One reserved key ([`NodeIndex::FrontEnd`]) denotes the front end itself
/// and is excluded from every worker count. Iteration is in index order, so
/// the front end comes first and workers follow by ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkConfiguration {
    nodes: BTreeMap<NodeIndex, NodeDescriptor>,
}

impl NetworkConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor under its own index, returning any it replaced.
    pub fn insert(&mut self, node: NodeDescriptor) -> Option<NodeDescriptor> {
        self.nodes.insert(node.index(), node)
    }

    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&NodeDescriptor> {
        self.nodes.get(&index)
    }

    /// Update a node's state. Returns false when the index is unknown.
    pub fn set_state(&mut self, index: NodeIndex, state: NodeState) -> bool {
        match self.nodes.get_mut(&index) {
            Some(node) => {
                node.set_state(state);
                true
            }
            None => false,
        }
    }

    /// Iterate `(index, descriptor)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &NodeDescriptor)> {
        self.nodes.iter().map(|(index, node)| (*index, node))
    }

    /// Iterate worker descriptors, skipping the front end.
    pub fn workers(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.nodes
            .values()
            .filter(|node| !node.index().is_front_end())
    }

    /// Worker descriptors currently in `state`.
    pub fn workers_in(&self, state: NodeState) -> impl Iterator<Item = &NodeDescriptor> {
        self.workers().filter(move |node| node.state() == state)
    }

    #[must_use]
    pub fn front_end(&self) -> Option<&NodeDescriptor> {
        self.nodes.get(&NodeIndex::FrontEnd)
    }

    #[must_use]
    pub fn has_front_end(&self) -> bool {
        self.nodes.contains_key(&NodeIndex::FrontEnd)
    }

    /// Number of healthy (active or idle) worker nodes.
    #[must_use]
    pub fn available_workers(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| node.is_available_worker())
            .count()
    }

    /// Number of entries, front end included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<NodeDescriptor> for NetworkConfiguration {
    fn from_iter<I: IntoIterator<Item = NodeDescriptor>>(iter: I) -> Self {
        let mut conf = Self::new();
        for node in iter {
            conf.insert(node);
        }
        conf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(ordinal: u32, state: NodeState) -> NodeDescriptor {
        NodeDescriptor::new(NodeIndex::Worker(ordinal), format!("n{ordinal}"), state)
    }

    #[test]
    fn available_workers_excludes_front_end_and_unhealthy_nodes() {
        let conf: NetworkConfiguration = [
            NodeDescriptor::front_end("fe"),
            worker(0, NodeState::Active),
            worker(1, NodeState::Idle),
            worker(2, NodeState::Down),
            worker(3, NodeState::Error),
            worker(4, NodeState::Pending),
        ]
        .into_iter()
        .collect();

        assert_eq!(conf.len(), 6);
        assert_eq!(conf.available_workers(), 2);
        assert_eq!(conf.workers().count(), 5);
    }

    #[test]
    fn insert_replaces_descriptor_with_same_index() {
        let mut conf = NetworkConfiguration::new();
        assert!(conf.insert(worker(0, NodeState::Active)).is_none());
        let replaced = conf.insert(worker(0, NodeState::Down));

        assert_eq!(replaced.map(|n| n.state()), Some(NodeState::Active));
        assert_eq!(conf.len(), 1);
        assert_eq!(conf.available_workers(), 0);
    }

    #[test]
    fn set_state_reports_unknown_index() {
        let mut conf: NetworkConfiguration = [worker(0, NodeState::Idle)].into_iter().collect();

        assert!(conf.set_state(NodeIndex::Worker(0), NodeState::Active));
        assert!(!conf.set_state(NodeIndex::Worker(9), NodeState::Active));
        assert_eq!(conf.workers_in(NodeState::Active).count(), 1);
    }

    #[test]
    fn serializes_with_string_keys() {
        let conf: NetworkConfiguration = [NodeDescriptor::front_end("fe"), worker(1, NodeState::Idle)]
            .into_iter()
            .collect();

        let json = serde_json::to_value(&conf).unwrap();
        assert_eq!(json["frontend"]["host_name"], "fe");
        assert_eq!(json["1"]["state"], "idle");

        let back: NetworkConfiguration = serde_json::from_value(json).unwrap();
        assert_eq!(back, conf);
    }
}
