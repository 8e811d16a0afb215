//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Replica node identifier.
///
/// Identifiers are drawn from `1..=num_nodes`; zero is never a valid node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Get the raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Position of a quorum within the global quorum sequence.
///
/// This is the vocabulary nodes share to refer to "the same slot".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotIndex(pub usize);

impl SlotIndex {
    /// Get the raw index.
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(NodeId(3).to_string(), "Node(3)");
        assert_eq!(SlotIndex(7).to_string(), "Slot(7)");
    }

    #[test]
    fn test_transparent_serde() {
        assert_eq!(serde_json::to_string(&NodeId(5)).unwrap(), "5");
        let slot: SlotIndex = serde_json::from_str("12").unwrap();
        assert_eq!(slot, SlotIndex(12));
    }
}
