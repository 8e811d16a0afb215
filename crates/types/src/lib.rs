//! Core types for Metronome quorum scheduling.
//!
//! These are the values every node agrees on: node and slot identifiers,
//! quorums, and the cluster configuration they are derived from.

mod config;
mod identifiers;
mod quorum;

pub use config::{ConfigError, MetronomeConfig};
pub use identifiers::{NodeId, SlotIndex};
pub use quorum::{DistanceError, Quorum};
