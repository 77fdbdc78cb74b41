//! Collision shape construction from authored meshes.

use crate::SceneNode;
use keysync_dynamics::{simplify_hull, CollisionShape};
use keysync_types::PhysicsKind;
use tracing::debug;

/// Build the collision shape for a node, or `None` for degenerate meshes.
///
/// Static nodes get the exact triangle list so other bodies collide with
/// the authored surface. Every other classification gets a simplified
/// convex hull of the mesh vertices. The node's frame-0 scale key is baked
/// into the shape's local vertices in both cases.
#[must_use]
pub fn build_shape(node: &SceneNode) -> Option<CollisionShape> {
    if node.mesh.is_degenerate() {
        return None;
    }
    let mut shape = if node.physics.kind == PhysicsKind::Static {
        CollisionShape::triangle_mesh(node.mesh.triangles().collect())
    } else {
        let hull = simplify_hull(&node.mesh.positions);
        if hull.is_empty() {
            return None;
        }
        CollisionShape::convex_hull(hull)
    };

    let scale = node.timeline.key_for_frame(0).scale;
    shape.apply_local_scaling(&scale);

    debug!(node = %node.name, ?scale, "built collision shape");
    Some(shape)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use keysync_mesh::{unit_cube, TriangleSoup};
    use keysync_types::Vector3;

    #[test]
    fn test_static_node_gets_exact_triangle_mesh() {
        let mut node = SceneNode::new("floor", unit_cube());
        node.assign_physics_kind(PhysicsKind::Static);
        let shape = build_shape(&node).unwrap();
        match shape {
            CollisionShape::TriangleMesh { triangles, margin } => {
                assert_eq!(triangles.len(), 12);
                assert_eq!(margin, 0.5);
            }
            CollisionShape::ConvexHull { .. } => panic!("expected triangle mesh"),
        }
    }

    #[test]
    fn test_movable_node_gets_simplified_hull() {
        let mut node = SceneNode::new("box", unit_cube());
        node.assign_physics_kind(PhysicsKind::Heavy);
        let shape = build_shape(&node).unwrap();
        match shape {
            CollisionShape::ConvexHull { points, margin } => {
                // The cube's hull is its eight corners.
                assert_eq!(points.len(), 8);
                assert_eq!(margin, 0.0);
            }
            CollisionShape::TriangleMesh { .. } => panic!("expected convex hull"),
        }
    }

    #[test]
    fn test_frame_zero_scale_is_baked_in() {
        let mut node = SceneNode::new("box", unit_cube());
        node.assign_physics_kind(PhysicsKind::Light);
        node.timeline.set_scale(0, Vector3::new(2.0, 1.0, 4.0));
        let shape = build_shape(&node).unwrap();
        let e = shape.local_aabb().extents();
        assert_relative_eq!(e.x, 2.0);
        assert_relative_eq!(e.y, 1.0);
        assert_relative_eq!(e.z, 4.0);
    }

    #[test]
    fn test_degenerate_mesh_yields_no_shape() {
        let node = SceneNode::new("empty", TriangleSoup::new());
        assert!(build_shape(&node).is_none());
    }
}
