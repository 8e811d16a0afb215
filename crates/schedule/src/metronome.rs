//! Per-node operation ordering.

use crate::{MetronomeError, QuorumSequence};
use metronome_types::{MetronomeConfig, NodeId, SlotIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Project the global sequence onto one node.
///
/// Returns the node's ordering (slots it serves in, then every other slot,
/// both in ascending slot order) and its critical length: the size of the
/// first half once the walk has passed the last slot.
pub fn derive_ordering(node: NodeId, sequence: &QuorumSequence) -> (Vec<SlotIndex>, usize) {
    let mut ordering = Vec::with_capacity(sequence.len());
    let mut rest = Vec::new();

    for (slot, quorum) in sequence.iter() {
        if quorum.contains(node) {
            ordering.push(slot);
        } else {
            rest.push(slot);
        }
    }

    let critical_len = ordering.len();
    ordering.extend(rest);
    (ordering, critical_len)
}

/// One node's schedule over the global quorum sequence.
///
/// The first [`critical_len`](Self::critical_len) entries of the ordering are
/// the slots this node is a quorum member of; an engine should treat these as
/// its fast-path slots. Every node of a cluster has the same critical length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metronome {
    node_id: NodeId,
    ordering: Vec<SlotIndex>,
    critical_len: usize,
}

impl Metronome {
    /// Compute the schedule for `node_id` in the given cluster.
    pub fn new(node_id: NodeId, config: &MetronomeConfig) -> Result<Self, MetronomeError> {
        config.validate()?;
        if !config.contains_node(node_id) {
            return Err(MetronomeError::NodeOutOfRange {
                node: node_id,
                num_nodes: config.num_nodes,
            });
        }

        let sequence = QuorumSequence::new(config)?;
        let metronome = Self::from_sequence(node_id, &sequence);

        info!(
            node = node_id.0,
            num_nodes = config.num_nodes,
            quorum_size = config.quorum_size,
            num_slots = sequence.len(),
            critical_len = metronome.critical_len,
            "Computed metronome schedule"
        );

        Ok(metronome)
    }

    /// Derive the schedule for `node_id` from an already computed sequence.
    pub fn from_sequence(node_id: NodeId, sequence: &QuorumSequence) -> Self {
        let (ordering, critical_len) = derive_ordering(node_id, sequence);
        debug!(node = node_id.0, critical_len, "Derived node ordering");

        Self {
            node_id,
            ordering,
            critical_len,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        node_id: NodeId,
        ordering: Vec<SlotIndex>,
        critical_len: usize,
    ) -> Self {
        Self {
            node_id,
            ordering,
            critical_len,
        }
    }

    /// Get the node this schedule belongs to.
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Get the full ordering, a permutation of every slot.
    pub fn ordering(&self) -> &[SlotIndex] {
        &self.ordering
    }

    /// Get the number of leading slots this node serves in.
    pub fn critical_len(&self) -> usize {
        self.critical_len
    }

    /// Get the critical prefix of the ordering.
    pub fn critical_ordering(&self) -> &[SlotIndex] {
        &self.ordering[..self.critical_len]
    }

    /// Get the slots this node does not serve in.
    pub fn non_critical_ordering(&self) -> &[SlotIndex] {
        &self.ordering[self.critical_len..]
    }

    /// Get the total number of slots.
    pub fn num_slots(&self) -> usize {
        self.ordering.len()
    }

    /// Check if this node is a quorum member for a slot.
    pub fn is_member(&self, slot: SlotIndex) -> bool {
        // The critical prefix is in ascending slot order.
        self.critical_ordering().binary_search(&slot).is_ok()
    }

    /// Get where a slot falls in this node's ordering.
    pub fn position_of(&self, slot: SlotIndex) -> Option<usize> {
        let critical = self.critical_ordering();
        match critical.binary_search(&slot) {
            Ok(position) => Some(position),
            Err(_) => self
                .non_critical_ordering()
                .binary_search(&slot)
                .ok()
                .map(|position| self.critical_len + position),
        }
    }
}
