//! Distance-maximizing quorum sequencer.
//!
//! Reorders the enumerated quorums so that consecutive slots share as few
//! nodes as possible. The procedure is greedy:
//!
//! 1. Seed the sequence with the first quorum of the input.
//! 2. Among the remaining quorums, prefer those sharing no node with the last
//!    appended one ("no-repeat" candidates).
//! 3. Among the preferred set (or the whole pool when it is empty) take the
//!    quorum farthest from the last appended one.
//!
//! Only the single most recent quorum is consulted. Ties go to the candidate
//! that appears first in the remaining pool, which keeps the result identical
//! on every node.

use crate::enumerate::enumerate_quorums;
use crate::MetronomeError;
use indexmap::IndexMap;
use metronome_types::{DistanceError, MetronomeConfig, Quorum, SlotIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// The globally agreed order of quorums. Slot `i` is served by quorum `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumSequence {
    quorums: Vec<Quorum>,
}

impl QuorumSequence {
    /// Enumerate and sequence every quorum for a cluster.
    pub fn new(config: &MetronomeConfig) -> Result<Self, MetronomeError> {
        let quorums = enumerate_quorums(config)?;
        Self::from_quorums(quorums)
    }

    /// Sequence an explicit list of quorums, seeding with the first one.
    pub fn from_quorums(quorums: Vec<Quorum>) -> Result<Self, MetronomeError> {
        let quorums = maximize_distance_ordering(quorums)?;
        Ok(Self { quorums })
    }

    /// Get the quorum serving a slot.
    pub fn get(&self, slot: SlotIndex) -> Option<&Quorum> {
        self.quorums.get(slot.0)
    }

    /// Get the number of slots.
    pub fn len(&self) -> usize {
        self.quorums.len()
    }

    /// Check if the sequence has no slots.
    pub fn is_empty(&self) -> bool {
        self.quorums.is_empty()
    }

    /// Get the quorums in slot order.
    pub fn as_slice(&self) -> &[Quorum] {
        &self.quorums
    }

    /// Iterate over slots and their quorums.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &Quorum)> + '_ {
        self.quorums
            .iter()
            .enumerate()
            .map(|(i, q)| (SlotIndex(i), q))
    }
}

/// The quorum picked for the next slot.
#[derive(Debug, Clone, Copy)]
struct Selection {
    /// Position in the remaining pool.
    index: usize,
    /// Distance from the previously appended quorum.
    distance: u64,
    /// Whether it shares no node with the previously appended quorum.
    no_repeat: bool,
}

/// Reorder quorums to maximize the distance between consecutive entries.
///
/// The first quorum stays first and the output is a permutation of the
/// input, repeated quorums included.
pub fn maximize_distance_ordering(quorums: Vec<Quorum>) -> Result<Vec<Quorum>, DistanceError> {
    // Keyed by input position so equal quorums stay separate entries.
    let mut pool: IndexMap<usize, Quorum> = quorums.into_iter().enumerate().collect();
    let mut ordered = Vec::with_capacity(pool.len());

    let Some((_, mut last)) = pool.shift_remove_index(0) else {
        return Ok(ordered);
    };

    while let Some(selection) = select_next(&last, &pool)? {
        let Some((_, next)) = pool.shift_remove_index(selection.index) else {
            break;
        };

        debug!(
            step = ordered.len() + 1,
            quorum = %next,
            distance = selection.distance,
            no_repeat = selection.no_repeat,
            "Selected next quorum"
        );

        ordered.push(std::mem::replace(&mut last, next));
    }
    ordered.push(last);

    Ok(ordered)
}

/// Pick the next quorum from the pool, or `None` once the pool is exhausted.
fn select_next(
    last: &Quorum,
    pool: &IndexMap<usize, Quorum>,
) -> Result<Option<Selection>, DistanceError> {
    if pool.is_empty() {
        return Ok(None);
    }

    let mut candidates = Vec::with_capacity(pool.len());
    for (index, quorum) in pool.values().enumerate() {
        if quorum.is_disjoint(last) {
            candidates.push((index, last.distance(quorum)?));
        }
    }

    let no_repeat = !candidates.is_empty();
    if !no_repeat {
        trace!(last = %last, remaining = pool.len(), "No disjoint quorum left");
        for (index, quorum) in pool.values().enumerate() {
            candidates.push((index, last.distance(quorum)?));
        }
    }

    // Stable: equal distances keep pool order, so the earliest wins.
    candidates.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(candidates.first().map(|&(index, distance)| Selection {
        index,
        distance,
        no_repeat,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn quorums(ids: &[&[u64]]) -> Vec<Quorum> {
        ids.iter().map(|q| Quorum::from_ids(q)).collect()
    }

    #[traced_test]
    #[test]
    fn test_farthest_disjoint_first() {
        let input = quorums(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9], &[10, 11, 12]]);

        let ordered = maximize_distance_ordering(input).unwrap();

        assert_eq!(
            ordered,
            quorums(&[&[1, 2, 3], &[10, 11, 12], &[4, 5, 6], &[7, 8, 9]])
        );
        assert!(logs_contain("Selected next quorum"));
    }

    #[traced_test]
    #[test]
    fn test_overlapping_fallback_keeps_pool_order_on_ties() {
        // Every pair of 2-subsets of {1,2,3} overlaps, and both remaining
        // candidates are distance 1 from {1,2}.
        let ordered = maximize_distance_ordering(quorums(&[&[1, 2], &[1, 3], &[2, 3]])).unwrap();

        assert_eq!(ordered, quorums(&[&[1, 2], &[1, 3], &[2, 3]]));
        assert!(logs_contain("No disjoint quorum left"));
    }

    #[test]
    fn test_four_nodes_pairs() {
        let sequence = QuorumSequence::new(&MetronomeConfig::new(4, 2)).unwrap();

        assert_eq!(
            sequence.as_slice(),
            quorums(&[&[1, 2], &[3, 4], &[1, 3], &[2, 4], &[1, 4], &[2, 3]]).as_slice()
        );
    }

    #[test]
    fn test_disjoint_preferred_over_farther_overlap() {
        // {2,9} is farther from {1,2} than {3,4}, but shares node 2.
        let ordered = maximize_distance_ordering(quorums(&[&[1, 2], &[2, 9], &[3, 4]])).unwrap();

        assert_eq!(ordered, quorums(&[&[1, 2], &[3, 4], &[2, 9]]));
    }

    #[test]
    fn test_repeated_quorums_are_kept() {
        let input = quorums(&[&[1, 2], &[3, 4], &[1, 2]]);

        let ordered = maximize_distance_ordering(input.clone()).unwrap();

        assert_eq!(ordered.len(), input.len());
        assert_eq!(ordered, quorums(&[&[1, 2], &[3, 4], &[1, 2]]));
    }

    #[traced_test]
    #[test]
    fn test_no_fallback_once_pool_is_empty() {
        // {1,2} then {3,4}: every step has a disjoint candidate.
        maximize_distance_ordering(quorums(&[&[1, 2], &[3, 4]])).unwrap();

        assert!(!logs_contain("No disjoint quorum left"));
    }

    #[test]
    fn test_empty_and_single() {
        assert!(maximize_distance_ordering(Vec::new()).unwrap().is_empty());

        let single = quorums(&[&[1, 2, 3]]);
        assert_eq!(maximize_distance_ordering(single.clone()).unwrap(), single);
    }

    #[test]
    fn test_dimension_mismatch_is_reported() {
        let result = maximize_distance_ordering(quorums(&[&[1, 2, 3], &[4, 5]]));

        assert_eq!(
            result,
            Err(DistanceError::DimensionMismatch { left: 3, right: 2 })
        );
    }

    #[test]
    fn test_sequence_accessors() {
        let sequence = QuorumSequence::new(&MetronomeConfig::new(3, 2)).unwrap();

        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.get(SlotIndex(1)), Some(&Quorum::from_ids(&[1, 3])));
        assert_eq!(sequence.get(SlotIndex(3)), None);

        let slots: Vec<_> = sequence.iter().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![SlotIndex(0), SlotIndex(1), SlotIndex(2)]);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            QuorumSequence::new(&MetronomeConfig::new(2, 3)),
            Err(MetronomeError::Config(_))
        ));
    }
}
