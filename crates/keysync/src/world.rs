//! The simulation world: rebuild, frame advance, and write-back.

use crate::{
    build_deformable, build_rigid, update_render_cache, SceneNode, UploadMode,
    VertexCorrespondence,
};
use keysync_dynamics::DynamicsWorld;
use keysync_types::{FrameConfig, NodeId, Result, RigidBodyId, SoftBodyId, SyncError};
use tracing::{debug, warn};

/// A body built from a scene node, tagged with the node it came from.
///
/// The variant is fixed at build time; there is no downcasting at
/// write-back. The node reference is an index into the node slice the
/// caller passes to every operation.
#[derive(Debug, Clone)]
pub enum ActiveBody {
    /// Rigid body (static or movable).
    Rigid {
        /// Body id in the dynamics world.
        body: RigidBodyId,
        /// Source node.
        node: NodeId,
    },
    /// Deformable body with its authoring-vertex correspondence.
    Deformable {
        /// Body id in the dynamics world.
        body: SoftBodyId,
        /// Source node.
        node: NodeId,
        /// Authoring-vertex to simulation-node map.
        correspondence: VertexCorrespondence,
    },
}

impl ActiveBody {
    /// Source node of this body.
    #[must_use]
    pub fn node(&self) -> NodeId {
        match self {
            Self::Rigid { node, .. } | Self::Deformable { node, .. } => *node,
        }
    }
}

/// Owns the dynamics world and keeps it in sync with the scene.
///
/// All operations take the scene's node slice explicitly; the world holds
/// node indices, never references into the scene.
///
/// Frames advance monotonically through
/// [`advance_to`](Self::advance_to). Requesting an earlier frame than the
/// last applied one rebuilds the world and replays from frame 0, so
/// scrubbing backward is deterministic: the same frame always shows the
/// same state.
#[derive(Debug)]
pub struct SimulationWorld {
    dynamics: DynamicsWorld,
    bodies: Vec<ActiveBody>,
    last_applied_frame: u32,
    config: FrameConfig,
}

impl SimulationWorld {
    /// Create an empty world with the given stepping configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidConfig`] or
    /// [`SyncError::InvalidTimestep`] when the configuration is unusable.
    pub fn new(config: FrameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dynamics: DynamicsWorld::new(config.gravity),
            bodies: Vec::new(),
            last_applied_frame: 0,
            config,
        })
    }

    /// Number of active bodies.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Active bodies and their source nodes.
    #[must_use]
    pub fn bodies(&self) -> &[ActiveBody] {
        &self.bodies
    }

    /// Last frame whose results were applied to the scene.
    #[must_use]
    pub fn last_applied_frame(&self) -> u32 {
        self.last_applied_frame
    }

    /// Tear down and rebuild every body from the current scene state.
    ///
    /// Call whenever scene content or physics properties change. Nodes with
    /// physics disabled are ignored; nodes whose mesh cannot produce a body
    /// are skipped with a warning and take no part in the simulation.
    /// Deformable nodes get their render cache invalidated so the next
    /// advance reallocates it from the authored mesh.
    pub fn rebuild(&mut self, nodes: &mut [SceneNode]) {
        self.dynamics.clear();
        self.bodies.clear();
        self.last_applied_frame = 0;

        for (index, node) in nodes.iter_mut().enumerate() {
            if !node.physics.enabled {
                continue;
            }
            let node_id = NodeId::new(index);
            if node.physics.is_soft {
                match build_deformable(node) {
                    Some((body, correspondence)) => {
                        node.render_cache = None;
                        node.upload_mode = UploadMode::Dynamic;
                        let body = self.dynamics.add_soft_body(body);
                        self.bodies.push(ActiveBody::Deformable {
                            body,
                            node: node_id,
                            correspondence,
                        });
                    }
                    None => {
                        warn!(node = %node.name, "skipping deformable node with degenerate mesh");
                    }
                }
            } else {
                match build_rigid(node) {
                    Some(body) => {
                        let body = self.dynamics.add_rigid_body(body);
                        self.bodies.push(ActiveBody::Rigid {
                            body,
                            node: node_id,
                        });
                    }
                    None => {
                        warn!(node = %node.name, "skipping rigid node with degenerate mesh");
                    }
                }
            }
        }

        debug!(bodies = self.bodies.len(), "rebuilt simulation world");
    }

    /// Advance the simulation to `frame` and apply the results.
    ///
    /// Steps once per integer frame between the last applied frame
    /// (exclusive) and `frame` (inclusive). Requesting an earlier frame
    /// rebuilds and replays from 0. At any `frame > 0` the results are
    /// written back: rigid poses and the (fixed) deformable placement pose
    /// become keyframes at `frame`, each carrying the node's frame-0
    /// scale, and deformable render caches are refreshed.
    ///
    /// Does nothing when no bodies are active.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NodeIndexOutOfBounds`] when an active body
    /// refers to a node index outside `nodes`, which indicates the slice
    /// changed without a rebuild.
    pub fn advance_to(&mut self, nodes: &mut [SceneNode], frame: u32) -> Result<()> {
        if self.bodies.is_empty() {
            return Ok(());
        }
        if frame < self.last_applied_frame {
            debug!(
                from = self.last_applied_frame,
                to = frame,
                "rewind requested, rebuilding and replaying"
            );
            self.rebuild(nodes);
        }

        for _ in self.last_applied_frame..frame {
            self.dynamics.step_frame(
                self.config.frame_dt,
                self.config.max_substeps as usize,
                self.config.substep_dt,
            );
        }

        if frame > 0 {
            self.write_back(nodes, frame)?;
        }
        self.last_applied_frame = frame;
        Ok(())
    }

    fn write_back(&self, nodes: &mut [SceneNode], frame: u32) -> Result<()> {
        let len = nodes.len();
        for active in &self.bodies {
            let index = active.node().index();
            let node = nodes
                .get_mut(index)
                .ok_or(SyncError::NodeIndexOutOfBounds { index, len })?;
            let scale = node.timeline.key_for_frame(0).scale;

            match active {
                ActiveBody::Rigid { body, .. } => {
                    if let Some(rigid) = self.dynamics.rigid_body(*body) {
                        node.timeline.set_position(frame, rigid.pose.position);
                        node.timeline.set_rotation(frame, rigid.pose.rotation);
                        node.timeline.set_scale(frame, scale);
                    }
                }
                ActiveBody::Deformable {
                    body,
                    correspondence,
                    ..
                } => {
                    if let Some(soft) = self.dynamics.soft_body(*body) {
                        node.timeline.set_position(frame, soft.pose.position);
                        node.timeline.set_rotation(frame, soft.pose.rotation);
                        node.timeline.set_scale(frame, scale);
                        update_render_cache(node, soft, correspondence);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use keysync_mesh::{unit_cube, TriangleSoup};
    use keysync_types::{Keyframe, PhysicsKind, Point3, Vector3};

    fn world() -> SimulationWorld {
        match SimulationWorld::new(FrameConfig::default()) {
            Ok(w) => w,
            Err(e) => panic!("default config must validate: {e}"),
        }
    }

    fn node_with_kind(name: &str, kind: PhysicsKind, y: f64) -> SceneNode {
        let mut node = SceneNode::new(name, unit_cube());
        node.assign_physics_kind(kind);
        node.physics.enabled = true;
        node.timeline.set_position(0, Point3::new(0.0, y, 0.0));
        node
    }

    fn falling_scene() -> Vec<SceneNode> {
        vec![
            node_with_kind("floor", PhysicsKind::Static, 0.0),
            node_with_kind("crate", PhysicsKind::Heavy, 5.0),
        ]
    }

    #[test]
    fn test_rebuild_skips_disabled_and_degenerate() {
        let mut nodes = falling_scene();
        nodes.push(SceneNode::new("empty", TriangleSoup::new()));
        nodes[2].physics.enabled = true;
        nodes.push(node_with_kind("idle", PhysicsKind::Heavy, 1.0));
        nodes[3].physics.enabled = false;

        let mut world = world();
        world.rebuild(&mut nodes);
        assert_eq!(world.body_count(), 2);
    }

    #[test]
    fn test_advance_writes_keys_per_frame() {
        let mut nodes = falling_scene();
        let mut world = world();
        world.rebuild(&mut nodes);

        world.advance_to(&mut nodes, 3).unwrap();
        assert_eq!(world.last_applied_frame(), 3);
        // Only the requested frame receives keys, not the intermediate ones.
        assert!(nodes[1].timeline.has_key_at(3));
        assert!(!nodes[1].timeline.has_key_at(2));
        // The crate fell.
        assert!(nodes[1].timeline.key_for_frame(3).position.y < 5.0);
    }

    #[test]
    fn test_advance_to_frame_zero_writes_nothing() {
        let mut nodes = falling_scene();
        let mut world = world();
        world.rebuild(&mut nodes);
        world.advance_to(&mut nodes, 0).unwrap();
        assert!(!nodes[1].timeline.has_key_at(1));
        assert_eq!(nodes[1].timeline.position_key_count(), 1); // frame-0 key
    }

    #[test]
    fn test_empty_world_is_a_no_op() {
        let mut nodes = vec![SceneNode::new("plain", unit_cube())];
        let mut world = world();
        world.rebuild(&mut nodes);
        world.advance_to(&mut nodes, 8).unwrap();
        assert_eq!(world.last_applied_frame(), 0);
        assert!(!nodes[0].timeline.has_key_at(8));
    }

    #[test]
    fn test_static_node_transform_never_changes() {
        let mut nodes = falling_scene();
        let mut world = world();
        world.rebuild(&mut nodes);
        world.advance_to(&mut nodes, 10).unwrap();

        let frame0 = Keyframe {
            position: Point3::new(0.0, 0.0, 0.0),
            ..Keyframe::default()
        };
        let key = nodes[0].timeline.key_for_frame(10);
        assert_eq!(key.position, frame0.position);
        assert_eq!(key.rotation, frame0.rotation);
        assert_eq!(key.scale, frame0.scale);
    }

    #[test]
    fn test_frame_zero_scale_written_at_every_frame() {
        let mut nodes = falling_scene();
        nodes[1].timeline.set_scale(0, Vector3::new(2.0, 2.0, 2.0));
        let mut world = world();
        world.rebuild(&mut nodes);
        world.advance_to(&mut nodes, 6).unwrap();
        assert_eq!(
            nodes[1].timeline.key_for_frame(6).scale,
            Vector3::new(2.0, 2.0, 2.0)
        );
    }

    #[test]
    fn test_repeat_advance_is_idempotent() {
        let mut nodes = falling_scene();
        let mut world = world();
        world.rebuild(&mut nodes);

        world.advance_to(&mut nodes, 4).unwrap();
        let first = nodes[1].timeline.key_for_frame(4);
        world.advance_to(&mut nodes, 4).unwrap();
        let second = nodes[1].timeline.key_for_frame(4);

        assert_eq!(first.position, second.position);
        assert_eq!(first.rotation, second.rotation);
        assert_eq!(nodes[1].timeline.position_key_count(), 2); // frame 0 + frame 4
    }

    #[test]
    fn test_rewind_replays_deterministically() {
        let mut nodes = falling_scene();
        let mut world = world();
        world.rebuild(&mut nodes);

        world.advance_to(&mut nodes, 8).unwrap();
        let forward = nodes[1].timeline.key_for_frame(8);

        // Scrub back, then forward again: rebuild + replay must land on
        // exactly the same state.
        world.advance_to(&mut nodes, 3).unwrap();
        world.advance_to(&mut nodes, 8).unwrap();
        let replayed = nodes[1].timeline.key_for_frame(8);

        assert_eq!(forward.position, replayed.position);
        assert_eq!(forward.rotation, replayed.rotation);
    }

    #[test]
    fn test_rewind_resets_before_stepping() {
        let mut nodes = falling_scene();
        let mut world = world();
        world.rebuild(&mut nodes);
        world.advance_to(&mut nodes, 10).unwrap();

        world.advance_to(&mut nodes, 2).unwrap();
        assert_eq!(world.last_applied_frame(), 2);
        // Two frames of fall is less than ten frames of fall.
        let at2 = nodes[1].timeline.key_for_frame(2).position.y;
        let at10 = nodes[1].timeline.key_for_frame(10).position.y;
        assert!(at2 > at10);
    }

    #[test]
    fn test_deformable_node_gets_cache_and_keys() {
        let mut nodes = vec![
            node_with_kind("floor", PhysicsKind::Static, 0.0),
            node_with_kind("jelly", PhysicsKind::Jelly, 3.0),
        ];
        let mut world = world();
        world.rebuild(&mut nodes);
        world.advance_to(&mut nodes, 5).unwrap();

        // Placement pose is reported unchanged; deformation lives in the
        // render cache.
        let key = nodes[1].timeline.key_for_frame(5);
        assert_relative_eq!(key.position.y, 3.0);

        let cache = nodes[1].render_cache.as_ref().unwrap();
        assert_eq!(cache.vertex_count(), 24);
        assert!(cache.generation() > 0);
        assert_eq!(nodes[1].upload_mode, UploadMode::Dynamic);
        // The jelly fell: cached positions are below the authored mesh.
        let cached_top = cache.positions.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!(cached_top < 3.5 + 0.01);
        // Frozen attributes still match the authored mesh.
        assert_eq!(cache.normals, nodes[1].mesh.normals);
        assert_eq!(cache.uvs, nodes[1].mesh.uvs);
        assert_eq!(cache.indices, nodes[1].mesh.indices);
    }

    #[test]
    fn test_rebuild_invalidates_deformable_cache() {
        let mut nodes = vec![node_with_kind("jelly", PhysicsKind::Jelly, 3.0)];
        let mut world = world();
        world.rebuild(&mut nodes);
        world.advance_to(&mut nodes, 2).unwrap();
        assert!(nodes[0].render_cache.is_some());

        world.rebuild(&mut nodes);
        assert!(nodes[0].render_cache.is_none());
        assert_eq!(world.last_applied_frame(), 0);
    }

    #[test]
    fn test_shrunk_node_slice_is_an_error() {
        let mut nodes = falling_scene();
        let mut world = world();
        world.rebuild(&mut nodes);

        let mut shrunk = vec![nodes[0].clone()];
        let err = world.advance_to(&mut shrunk, 1).unwrap_err();
        assert!(matches!(err, SyncError::NodeIndexOutOfBounds { .. }));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = FrameConfig {
            frame_dt: 0.0,
            ..FrameConfig::default()
        };
        assert!(SimulationWorld::new(config).is_err());
    }
}
