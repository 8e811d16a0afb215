//! Metronome quorum scheduling.
//!
//! Computes, for a fixed cluster of `n` nodes and quorum size `k`, the order in
//! which each node should take part in successive quorum slots of a
//! leaderless consensus protocol.
//!
//! # Pipeline
//!
//! ```text
//! MetronomeConfig (n, k)
//!     │
//!     ▼
//! enumerate_quorums          every k-subset of 1..=n, lexicographic
//!     │
//!     ▼
//! QuorumSequence             reordered so consecutive quorums overlap as
//!     │                      little as possible (slot i = quorum i)
//!     ▼
//! Metronome (per node)       slots the node serves in, then the rest;
//!                            critical_len = C(n-1, k-1) for every node
//! ```
//!
//! Every stage is a pure function of the configuration, so nodes compute
//! identical sequences independently and never exchange them.
//!
//! # Example
//!
//! ```
//! use metronome_schedule::Metronome;
//! use metronome_types::{MetronomeConfig, NodeId};
//!
//! let config = MetronomeConfig::majority(5);
//! let metronome = Metronome::new(NodeId(1), &config).unwrap();
//!
//! assert_eq!(metronome.num_slots(), 10);
//! assert_eq!(metronome.critical_len(), 6);
//! assert_eq!(metronome.critical_ordering().len(), 6);
//! ```

mod cluster;
mod enumerate;
mod error;
mod metronome;
mod sequencer;

pub use cluster::ClusterSchedule;
pub use enumerate::enumerate_quorums;
pub use error::{CoverageError, MetronomeError};
pub use metronome::{derive_ordering, Metronome};
pub use sequencer::{maximize_distance_ordering, QuorumSequence};
