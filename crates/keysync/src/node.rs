//! Scene node: the unit the adapter works on.

use keysync_mesh::{RenderMeshCache, TriangleSoup};
use keysync_types::{KeyframeTimeline, PhysicsKind, PhysicsProperties};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the renderer uploads a node's vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UploadMode {
    /// Uploaded once; geometry never changes on the GPU.
    #[default]
    Static,
    /// Re-uploaded whenever the render cache generation changes.
    Dynamic,
}

/// One authored object: mesh, physics properties, animation timeline, and
/// the render cache the simulation refreshes for deformables.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneNode {
    /// Display name, used in log output.
    pub name: String,
    /// Physics classification and authored parameters.
    pub physics: PhysicsProperties,
    /// Authoring mesh as imported.
    pub mesh: TriangleSoup,
    /// Animation timeline the simulation writes into.
    pub timeline: KeyframeTimeline,
    /// Render snapshot, allocated lazily for deformable nodes.
    pub render_cache: Option<RenderMeshCache>,
    /// GPU upload mode.
    pub upload_mode: UploadMode,
}

impl SceneNode {
    /// Create a node with default (disabled) physics and an empty timeline.
    pub fn new(name: impl Into<String>, mesh: TriangleSoup) -> Self {
        Self {
            name: name.into(),
            mesh,
            ..Self::default()
        }
    }

    /// Classify the node and derive its simulated weight.
    ///
    /// Weight is the mesh bounding-box volume times the class density.
    /// Soft classifications force `is_soft` regardless of the (zero)
    /// derived weight.
    pub fn assign_physics_kind(&mut self, kind: PhysicsKind) {
        self.physics.kind = kind;
        self.physics.is_soft = kind.is_soft();
        self.physics.weight = self.mesh.aabb().volume() * kind.density();
    }
}
