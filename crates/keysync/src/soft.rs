//! Deformable body construction and vertex correspondence.

use crate::SceneNode;
use keysync_dynamics::SoftBody;
use keysync_mesh::dedup_index_stream;
use keysync_types::Pose;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Map from authoring vertices to simulation nodes.
///
/// Entry `v` holds the index of the soft-body node whose position equals
/// authoring vertex `v`'s position, or `None` when no node matched. The
/// map is resolved against the live body's node positions rather than any
/// assumed enumeration order, and must therefore be built before the body
/// is transformed into its world pose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexCorrespondence {
    node_for_vertex: Vec<Option<usize>>,
}

impl VertexCorrespondence {
    /// Resolve the map by exact position comparison, first match wins.
    #[must_use]
    pub fn resolve(node: &SceneNode, body: &SoftBody) -> Self {
        let node_positions: Vec<_> = body.node_positions().collect();
        let node_for_vertex = node
            .mesh
            .positions
            .iter()
            .map(|p| node_positions.iter().position(|q| q == p))
            .collect();
        Self { node_for_vertex }
    }

    /// Number of authoring vertices covered by the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.node_for_vertex.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_for_vertex.is_empty()
    }

    /// Simulation node for authoring vertex `v`, if one matched.
    #[must_use]
    pub fn node_index(&self, v: usize) -> Option<usize> {
        self.node_for_vertex.get(v).copied().flatten()
    }

    /// Number of vertices that resolved to a node.
    #[must_use]
    pub fn mapped_count(&self) -> usize {
        self.node_for_vertex.iter().flatten().count()
    }
}

/// Build a deformable body and its vertex correspondence for a node.
///
/// Deduplicates the authoring mesh, builds the soft body from the unique
/// positions, resolves the correspondence against the untransformed node
/// positions, then places the body at the node's frame-0 pose. Returns
/// `None` for degenerate meshes.
#[must_use]
pub fn build_soft_body(node: &SceneNode) -> Option<(SoftBody, VertexCorrespondence)> {
    if node.mesh.is_degenerate() {
        return None;
    }
    let dedup = dedup_index_stream(&node.mesh);
    let mut body = SoftBody::from_tri_mesh(&dedup.positions, &dedup.indices);
    if body.node_count() == 0 {
        return None;
    }

    let correspondence = VertexCorrespondence::resolve(node, &body);

    let key = node.timeline.key_for_frame(0);
    body.transform(&Pose::from_position_rotation(key.position, key.rotation));

    debug!(
        node = %node.name,
        nodes = body.node_count(),
        mapped = correspondence.mapped_count(),
        "built deformable body"
    );
    Some((body, correspondence))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use keysync_mesh::{unit_cube, TriangleSoup};
    use keysync_types::{PhysicsKind, Point3};

    fn cloth_cube() -> SceneNode {
        let mut node = SceneNode::new("jelly", unit_cube());
        node.assign_physics_kind(PhysicsKind::Jelly);
        node.physics.enabled = true;
        node
    }

    #[test]
    fn test_cube_maps_every_vertex() {
        let node = cloth_cube();
        let (body, map) = build_soft_body(&node).unwrap();
        assert_eq!(body.node_count(), 8);
        assert_eq!(map.len(), 24);
        assert_eq!(map.mapped_count(), 24);
    }

    #[test]
    fn test_shared_positions_share_a_node() {
        let node = cloth_cube();
        let (body, map) = build_soft_body(&node).unwrap();
        // Vertices with equal authored positions must resolve to the same
        // simulation node.
        for (i, a) in node.mesh.positions.iter().enumerate() {
            for (j, b) in node.mesh.positions.iter().enumerate() {
                if a == b {
                    assert_eq!(map.node_index(i), map.node_index(j));
                }
            }
        }
        assert!(body.node_count() <= node.mesh.positions.len());
    }

    #[test]
    fn test_body_placed_at_frame_zero_pose() {
        let mut node = cloth_cube();
        node.timeline.set_position(0, Point3::new(0.0, 4.0, 0.0));
        let (body, _) = build_soft_body(&node).unwrap();
        assert_eq!(body.pose.position, Point3::new(0.0, 4.0, 0.0));
        // Nodes moved with the body.
        assert!(body.node_positions().all(|p| p.y > 3.0));
    }

    #[test]
    fn test_degenerate_mesh_yields_no_body() {
        let node = SceneNode::new("empty", TriangleSoup::new());
        assert!(build_soft_body(&node).is_none());
    }
}
