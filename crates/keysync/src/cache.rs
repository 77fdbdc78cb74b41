//! Render mesh cache refresh for deformable nodes.

use crate::{SceneNode, UploadMode, VertexCorrespondence};
use keysync_dynamics::SoftBody;
use keysync_mesh::RenderMeshCache;
use nalgebra::Point3;

/// Refresh a node's render cache from simulated soft-body nodes.
///
/// On first call the cache is allocated from the authoring mesh, copying
/// normals, texture coordinates, indices, and the format tag, and the node
/// is switched to dynamic upload. Subsequent calls only rewrite positions.
/// Each authoring vertex takes the position of its corresponding simulation
/// node; vertices without a correspondence keep whatever position the cache
/// already holds. Ends with a commit so the renderer re-uploads.
pub fn update_render_cache(node: &mut SceneNode, body: &SoftBody, map: &VertexCorrespondence) {
    if node.render_cache.is_none() {
        node.render_cache = Some(RenderMeshCache::from_soup(&node.mesh));
        node.upload_mode = UploadMode::Dynamic;
    }
    let Some(cache) = node.render_cache.as_mut() else {
        return;
    };

    let node_positions: Vec<Point3<f64>> = body.node_positions().collect();
    for (v, slot) in cache.positions.iter_mut().enumerate() {
        if let Some(p) = map.node_index(v).and_then(|i| node_positions.get(i)) {
            *slot = *p;
        }
    }
    cache.commit();
}
