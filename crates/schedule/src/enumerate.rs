//! Quorum enumeration.

use itertools::Itertools;
use metronome_types::{ConfigError, MetronomeConfig, Quorum};

/// Generate every quorum of `config.quorum_size` nodes out of `1..=num_nodes`.
///
/// Quorums come out in lexicographic order with members ascending. The
/// sequencer depends on this order: its first element seeds the sequence.
pub fn enumerate_quorums(config: &MetronomeConfig) -> Result<Vec<Quorum>, ConfigError> {
    config.validate()?;

    let quorums: Vec<Quorum> = config
        .node_ids()
        .combinations(config.quorum_size)
        .map(Quorum::new)
        .collect();

    debug_assert!(quorums.iter().all(Quorum::is_well_formed));
    Ok(quorums)
}
