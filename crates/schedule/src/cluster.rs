//! Cluster-wide view of every node's schedule.
//!
//! Nodes never need this at runtime; each computes its own [`Metronome`].
//! It exists to check the property the protocol relies on: reading the
//! schedules column by column, every slot has been claimed by exactly a quorum
//! of nodes once the critical prefix is exhausted, and by every node at the
//! end.

use crate::{CoverageError, Metronome, MetronomeError, QuorumSequence};
use metronome_types::{MetronomeConfig, NodeId, SlotIndex};
use rayon::prelude::*;
use tracing::{info, warn};

/// Every node's schedule for one cluster configuration.
#[derive(Debug, Clone)]
pub struct ClusterSchedule {
    config: MetronomeConfig,
    sequence: QuorumSequence,
    /// Indexed by `node_id - 1`.
    metronomes: Vec<Metronome>,
}

impl ClusterSchedule {
    /// Build the sequence once and derive each node's schedule from it.
    pub fn new(config: MetronomeConfig) -> Result<Self, MetronomeError> {
        config.validate()?;
        let sequence = QuorumSequence::new(&config)?;

        let nodes: Vec<NodeId> = config.node_ids().collect();
        let metronomes: Vec<Metronome> = nodes
            .par_iter()
            .map(|node| Metronome::from_sequence(*node, &sequence))
            .collect();

        info!(
            num_nodes = config.num_nodes,
            quorum_size = config.quorum_size,
            num_slots = sequence.len(),
            "Computed cluster schedule"
        );

        Ok(Self {
            config,
            sequence,
            metronomes,
        })
    }

    /// Get the configuration the schedule was built from.
    pub fn config(&self) -> &MetronomeConfig {
        &self.config
    }

    /// Get the shared quorum sequence.
    pub fn sequence(&self) -> &QuorumSequence {
        &self.sequence
    }

    /// Get every node's schedule, in node order.
    pub fn metronomes(&self) -> &[Metronome] {
        &self.metronomes
    }

    /// Get one node's schedule.
    pub fn metronome(&self, node: NodeId) -> Option<&Metronome> {
        let index = usize::try_from(node.0).ok()?.checked_sub(1)?;
        self.metronomes.get(index)
    }

    /// Get every node's ordering, in node order.
    pub fn all_orderings(&self) -> Vec<&[SlotIndex]> {
        self.metronomes.iter().map(Metronome::ordering).collect()
    }

    /// Check the schedules jointly cover the sequence.
    ///
    /// All nodes must share one critical length. Counting slot assignments
    /// column by column across all orderings, each slot must be assigned
    /// exactly `quorum_size` times after column `critical_len - 1`, and
    /// `num_nodes` times after the last column.
    pub fn verify_coverage(&self) -> Result<(), CoverageError> {
        let Some(first) = self.metronomes.first() else {
            return Ok(());
        };
        let critical_len = first.critical_len();

        for metronome in &self.metronomes {
            if metronome.critical_len() != critical_len {
                warn!(
                    node = metronome.node_id().0,
                    expected = critical_len,
                    actual = metronome.critical_len(),
                    "Critical length disagreement"
                );
                return Err(CoverageError::CriticalLenMismatch {
                    node: metronome.node_id(),
                    expected: critical_len,
                    actual: metronome.critical_len(),
                });
            }
        }

        let num_slots = self.sequence.len();
        let mut counts = vec![0usize; num_slots];

        for column in 0..num_slots {
            for metronome in &self.metronomes {
                if let Some(count) = metronome
                    .ordering()
                    .get(column)
                    .and_then(|slot| counts.get_mut(slot.0))
                {
                    *count += 1;
                }
            }

            if column + 1 == critical_len {
                check_counts(&counts, self.config.quorum_size).map_err(|(slot, count)| {
                    warn!(%slot, column, count, "Slot off quorum count at critical length");
                    CoverageError::QuorumCountMismatch {
                        slot,
                        column,
                        count,
                        expected: self.config.quorum_size,
                    }
                })?;
            }
        }

        check_counts(&counts, self.config.num_nodes).map_err(|(slot, count)| {
            warn!(%slot, count, "Slot missing from some schedules");
            CoverageError::IncompleteCoverage {
                slot,
                count,
                expected: self.config.num_nodes,
            }
        })
    }
}

/// Find the first slot whose count differs from `expected`.
fn check_counts(counts: &[usize], expected: usize) -> Result<(), (SlotIndex, usize)> {
    match counts.iter().position(|&count| count != expected) {
        Some(slot) => Err((SlotIndex(slot), counts[slot])),
        None => Ok(()),
    }
}
