//! Cluster shape shared by every node computing a schedule.

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a cluster configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The cluster has no nodes.
    #[error("cluster must have at least one node")]
    ZeroNodes,

    /// The quorum has no members.
    #[error("quorum size must be at least one")]
    ZeroQuorum,

    /// The quorum is larger than the cluster.
    #[error("quorum size {quorum_size} exceeds cluster size {num_nodes}")]
    QuorumTooLarge {
        /// Requested quorum size.
        quorum_size: usize,
        /// Number of nodes in the cluster.
        num_nodes: usize,
    },
}

/// Configuration for a fixed cluster topology.
///
/// Every node must use the same configuration; the schedule is a pure
/// function of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetronomeConfig {
    /// Number of replica nodes. Nodes are identified `1..=num_nodes`.
    pub num_nodes: usize,

    /// Number of nodes in every quorum.
    pub quorum_size: usize,
}

impl MetronomeConfig {
    /// Create a new configuration. Call [`validate`](Self::validate) before use.
    pub fn new(num_nodes: usize, quorum_size: usize) -> Self {
        Self {
            num_nodes,
            quorum_size,
        }
    }

    /// Create a configuration with a simple majority quorum (`n/2 + 1`).
    pub fn majority(num_nodes: usize) -> Self {
        Self::new(num_nodes, num_nodes / 2 + 1)
    }

    /// Check the configuration describes a schedulable cluster.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_nodes == 0 {
            return Err(ConfigError::ZeroNodes);
        }
        if self.quorum_size == 0 {
            return Err(ConfigError::ZeroQuorum);
        }
        if self.quorum_size > self.num_nodes {
            return Err(ConfigError::QuorumTooLarge {
                quorum_size: self.quorum_size,
                num_nodes: self.num_nodes,
            });
        }
        Ok(())
    }

    /// Number of distinct quorums, and therefore slots: C(n, k).
    pub fn num_slots(&self) -> usize {
        num_integer::binomial(self.num_nodes, self.quorum_size)
    }

    /// Number of slots every node participates in: C(n-1, k-1).
    ///
    /// Only meaningful for a valid configuration.
    pub fn critical_len(&self) -> usize {
        num_integer::binomial(
            self.num_nodes.saturating_sub(1),
            self.quorum_size.saturating_sub(1),
        )
    }

    /// Iterate over every node in the cluster, in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (1..=self.num_nodes as u64).map(NodeId)
    }

    /// Check if a node belongs to the cluster.
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.0 >= 1 && node.0 <= self.num_nodes as u64
    }
}
