//! Error types for schedule construction and verification.

use metronome_types::{ConfigError, DistanceError, NodeId, SlotIndex};
use thiserror::Error;

/// Errors while building a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetronomeError {
    /// The cluster configuration is not schedulable.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The node is not part of the configured cluster.
    #[error("{node} is outside the cluster of {num_nodes} nodes")]
    NodeOutOfRange {
        /// The rejected node.
        node: NodeId,
        /// Number of nodes in the cluster.
        num_nodes: usize,
    },

    /// Two quorums of different sizes were compared while sequencing.
    ///
    /// Unreachable with enumerated quorums; indicates a broken invariant.
    #[error("sequencing invariant violated: {0}")]
    Distance(#[from] DistanceError),
}

/// Ways a set of node schedules can fail to jointly cover the slot sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverageError {
    /// Nodes disagree on how long the critical prefix is.
    #[error("{node} has critical length {actual}, expected {expected}")]
    CriticalLenMismatch {
        /// The disagreeing node.
        node: NodeId,
        /// Critical length of the first node.
        expected: usize,
        /// Critical length of `node`.
        actual: usize,
    },

    /// At the end of the critical prefix a slot has not been assigned to
    /// exactly a quorum of nodes.
    #[error("{slot} assigned {count} times at column {column}, expected {expected}")]
    QuorumCountMismatch {
        /// The offending slot.
        slot: SlotIndex,
        /// Column index of the last critical entry.
        column: usize,
        /// Number of nodes that had scheduled the slot.
        count: usize,
        /// The quorum size.
        expected: usize,
    },

    /// After every column a slot is missing from some node's schedule.
    #[error("{slot} assigned {count} times in total, expected {expected}")]
    IncompleteCoverage {
        /// The offending slot.
        slot: SlotIndex,
        /// Number of schedules containing the slot.
        count: usize,
        /// The number of nodes.
        expected: usize,
    },
}
