//! Typed identifiers for scene nodes and simulation bodies.
//!
//! Bodies reference their owning scene node through a [`NodeId`] side table
//! rather than a pointer, so simulation and scene ownership stay decoupled.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a scene node within the node slice handed to the engine.
///
/// The engine never owns nodes; callers pass the same node slice to
/// `rebuild` and `advance_to`, and a `NodeId` is only meaningful for
/// that slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub usize);

impl NodeId {
    /// Create a new node ID from a slice index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the underlying slice index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Unique identifier for a rigid body in the dynamics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigidBodyId(pub u64);

impl RigidBodyId {
    /// Create a new rigid body ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RigidBodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RigidBody({})", self.0)
    }
}

/// Unique identifier for a deformable body in the dynamics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftBodyId(pub u64);

impl SoftBodyId {
    /// Create a new soft body ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SoftBodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SoftBody({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::new(7).to_string(), "Node(7)");
        assert_eq!(NodeId::from(7).index(), 7);
    }

    #[test]
    fn test_body_ids_are_distinct_types() {
        let rigid = RigidBodyId::new(1);
        let soft = SoftBodyId::new(1);
        assert_eq!(rigid.raw(), soft.raw());
        assert_eq!(rigid.to_string(), "RigidBody(1)");
        assert_eq!(soft.to_string(), "SoftBody(1)");
    }
}
