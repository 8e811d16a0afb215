//! Quorum value type and the set utilities the sequencer relies on.

use crate::NodeId;
use num_integer::Roots;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors from comparing two quorums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DistanceError {
    /// The quorums have different sizes, so their member vectors cannot be
    /// compared position by position.
    #[error("cannot compare quorums of size {left} and {right}")]
    DimensionMismatch {
        /// Size of the left-hand quorum.
        left: usize,
        /// Size of the right-hand quorum.
        right: usize,
    },

    /// The distance does not fit in a `u64`.
    #[error("distance between quorums overflows")]
    Overflow,
}

/// A fixed-size set of distinct nodes.
///
/// Members are kept in ascending order. The order carries no meaning beyond
/// giving every set a canonical identity, so two quorums with the same members
/// always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quorum {
    members: Vec<NodeId>,
}

impl Quorum {
    /// Create a quorum from its members, sorting them into canonical order.
    ///
    /// Members are not checked: cluster quorums hold distinct non-zero
    /// identifiers (see [`is_well_formed`](Self::is_well_formed)), but
    /// synthetic quorums may be built from any values.
    pub fn new(mut members: Vec<NodeId>) -> Self {
        members.sort_unstable();
        Self { members }
    }

    /// Create a quorum from raw node identifiers.
    pub fn from_ids(ids: &[u64]) -> Self {
        Self::new(ids.iter().copied().map(NodeId).collect())
    }

    /// Get the members in ascending order.
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// Get the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the quorum has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check if a node is a member.
    pub fn contains(&self, node: NodeId) -> bool {
        self.members.binary_search(&node).is_ok()
    }

    /// Check members are distinct and never zero.
    pub fn is_well_formed(&self) -> bool {
        !matches!(self.members.first(), Some(NodeId(0)))
            && self.members.windows(2).all(|w| w[0] < w[1])
    }

    /// Members present in both quorums, in ascending order.
    pub fn intersection<'a>(&'a self, other: &'a Quorum) -> impl Iterator<Item = NodeId> + 'a {
        self.members
            .iter()
            .copied()
            .filter(move |node| other.contains(*node))
    }

    /// Check if the quorums share no member.
    pub fn is_disjoint(&self, other: &Quorum) -> bool {
        self.intersection(other).next().is_none()
    }

    /// Euclidean distance between the member vectors, truncated to an integer.
    ///
    /// Members are compared position by position in canonical order, so
    /// `{1,2,3}` and `{4,5,6}` are `floor(sqrt(27)) = 5` apart.
    pub fn distance(&self, other: &Quorum) -> Result<u64, DistanceError> {
        if self.len() != other.len() {
            return Err(DistanceError::DimensionMismatch {
                left: self.len(),
                right: other.len(),
            });
        }

        let mut sum_of_squares: u128 = 0;
        for (a, b) in self.members.iter().zip(&other.members) {
            let diff = u128::from(a.0.abs_diff(b.0));
            sum_of_squares = sum_of_squares
                .checked_add(diff * diff)
                .ok_or(DistanceError::Overflow)?;
        }

        u64::try_from(sum_of_squares.sqrt()).map_err(|_| DistanceError::Overflow)
    }
}

impl fmt::Display for Quorum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, node) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", node.0)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Quorum::from_ids(&[1, 2, 3]);
        let b = Quorum::from_ids(&[4, 5, 6]);

        // floor(sqrt(3² + 3² + 3²)) = floor(sqrt(27))
        assert_eq!(a.distance(&b), Ok(5));
        assert_eq!(b.distance(&a), Ok(5));
        assert_eq!(a.distance(&a), Ok(0));
    }

    #[test]
    fn test_distance_truncates() {
        // sqrt(2) rounds down to 1, sqrt(8) to 2
        let a = Quorum::from_ids(&[1, 2]);
        assert_eq!(a.distance(&Quorum::from_ids(&[2, 3])), Ok(1));
        assert_eq!(a.distance(&Quorum::from_ids(&[3, 4])), Ok(2));
    }

    #[test]
    fn test_distance_dimension_mismatch() {
        let a = Quorum::from_ids(&[1, 2, 3]);
        let b = Quorum::from_ids(&[1, 2]);

        assert_eq!(
            a.distance(&b),
            Err(DistanceError::DimensionMismatch { left: 3, right: 2 })
        );
    }

    #[test]
    fn test_canonical_order() {
        let a = Quorum::from_ids(&[3, 1, 2]);
        assert_eq!(a, Quorum::from_ids(&[1, 2, 3]));
        assert_eq!(a.members(), &[NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(a.to_string(), "{1,2,3}");
    }

    #[test]
    fn test_membership_and_overlap() {
        let a = Quorum::from_ids(&[1, 2, 3]);
        let b = Quorum::from_ids(&[3, 4, 5]);
        let c = Quorum::from_ids(&[4, 5, 6]);

        assert!(a.contains(NodeId(2)));
        assert!(!a.contains(NodeId(4)));

        assert_eq!(a.intersection(&b).collect::<Vec<_>>(), vec![NodeId(3)]);
        assert_eq!(a.intersection(&c).count(), 0);

        assert!(!a.is_disjoint(&b));
        assert!(a.is_disjoint(&c));
    }

    #[test]
    fn test_distance_large_identifiers() {
        let low = Quorum::from_ids(&[1]);
        let high = Quorum::from_ids(&[u64::MAX]);
        assert_eq!(low.distance(&high), Ok(u64::MAX - 1));

        // Two maximal differences sum past u128 range.
        let low = Quorum::from_ids(&[1, 2]);
        let high = Quorum::from_ids(&[u64::MAX - 1, u64::MAX]);
        assert_eq!(low.distance(&high), Err(DistanceError::Overflow));
    }

    #[test]
    fn test_well_formed() {
        assert!(Quorum::from_ids(&[1, 2, 3]).is_well_formed());
        assert!(!Quorum::from_ids(&[0, 1]).is_well_formed());
        assert!(!Quorum::from_ids(&[2, 2]).is_well_formed());
    }
}
