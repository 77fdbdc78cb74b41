//! Body construction from scene nodes.

use crate::soft::build_soft_body;
use crate::{build_shape, SceneNode, VertexCorrespondence};
use keysync_dynamics::{RigidBody, SoftBody};
use keysync_types::Pose;

/// Build a rigid body for a node, or `None` for degenerate meshes.
///
/// The body starts at the node's frame-0 pose with the derived weight as
/// its mass (zero for static nodes) and the engine-wide material defaults.
/// An authored force seeds the initial linear velocity.
#[must_use]
pub fn build_rigid(node: &SceneNode) -> Option<RigidBody> {
    let shape = build_shape(node)?;
    let key = node.timeline.key_for_frame(0);
    let pose = Pose::from_position_rotation(key.position, key.rotation);

    let mut body = RigidBody::new(shape, node.physics.weight, pose);
    if let Some(velocity) = node.physics.initial_velocity() {
        body = body.with_linear_velocity(velocity);
    }
    Some(body)
}

/// Build a deformable body and its vertex correspondence for a node, or
/// `None` for degenerate meshes.
#[must_use]
pub fn build_deformable(node: &SceneNode) -> Option<(SoftBody, VertexCorrespondence)> {
    build_soft_body(node)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use keysync_mesh::{unit_cube, TriangleSoup};
    use keysync_types::{PhysicsKind, Point3, Vector3};

    fn heavy_cube() -> SceneNode {
        let mut node = SceneNode::new("crate", unit_cube());
        node.assign_physics_kind(PhysicsKind::Heavy);
        node.physics.enabled = true;
        node
    }

    #[test]
    fn test_rigid_body_mass_and_pose() {
        let mut node = heavy_cube();
        node.timeline.set_position(0, Point3::new(1.0, 2.0, 3.0));
        let body = build_rigid(&node).unwrap();
        assert_eq!(body.mass, 27.0);
        assert_eq!(body.pose.position, Point3::new(1.0, 2.0, 3.0));
        assert!(!body.is_static());
    }

    #[test]
    fn test_static_node_builds_static_body() {
        let mut node = heavy_cube();
        node.assign_physics_kind(PhysicsKind::Static);
        let body = build_rigid(&node).unwrap();
        assert!(body.is_static());
    }

    #[test]
    fn test_authored_force_becomes_initial_velocity() {
        let mut node = heavy_cube();
        node.physics.force_direction = Vector3::new(1.0, 0.0, 0.0);
        node.physics.force_magnitude = 5.0;
        let body = build_rigid(&node).unwrap();
        assert_eq!(body.linear_velocity, Vector3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_degenerate_node_builds_nothing() {
        let node = SceneNode::new("empty", TriangleSoup::new());
        assert!(build_rigid(&node).is_none());
        assert!(build_deformable(&node).is_none());
    }
}
