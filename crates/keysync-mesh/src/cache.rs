//! Per-node render mesh cache.

use crate::{MeshFormat, TriangleSoup};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A renderer-facing vertex buffer refreshed from simulation results.
///
/// Allocated lazily the first time a deformable node produces results.
/// Normals, texture coordinates, indices, and the format tag are copied
/// from the authoring mesh once at allocation; only `positions` is
/// rewritten afterwards. Every refresh ends with [`commit`](Self::commit),
/// which bumps the generation counter so the renderer can re-upload.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderMeshCache {
    /// Vertex positions, one per authoring vertex. Rewritten each refresh.
    pub positions: Vec<Point3<f64>>,
    /// Vertex normals, frozen at allocation.
    pub normals: Vec<Vector3<f64>>,
    /// Texture coordinates, frozen at allocation.
    pub uvs: Vec<(f32, f32)>,
    /// Triangle index stream, frozen at allocation.
    pub indices: Vec<u32>,
    /// Vertex layout tag, frozen at allocation.
    pub format: MeshFormat,
    generation: u64,
}

impl RenderMeshCache {
    /// Allocate a cache sized and filled from the authoring mesh.
    #[must_use]
    pub fn from_soup(soup: &TriangleSoup) -> Self {
        Self {
            positions: soup.positions.clone(),
            normals: soup.normals.clone(),
            uvs: soup.uvs.clone(),
            indices: soup.indices.clone(),
            format: soup.format,
            generation: 0,
        }
    }

    /// Number of vertices in the buffer.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Mark the buffer dirty for re-upload.
    pub fn commit(&mut self) {
        self.generation += 1;
    }

    /// Monotonic upload generation. The renderer re-uploads when this
    /// differs from the generation it last saw.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::unit_cube;

    #[test]
    fn test_from_soup_copies_attributes() {
        let cube = unit_cube();
        let cache = RenderMeshCache::from_soup(&cube);
        assert_eq!(cache.vertex_count(), cube.vertex_count());
        assert_eq!(cache.normals, cube.normals);
        assert_eq!(cache.uvs, cube.uvs);
        assert_eq!(cache.indices, cube.indices);
        assert_eq!(cache.format, cube.format);
        assert_eq!(cache.generation(), 0);
    }

    #[test]
    fn test_commit_bumps_generation() {
        let mut cache = RenderMeshCache::from_soup(&unit_cube());
        cache.commit();
        cache.commit();
        assert_eq!(cache.generation(), 2);
    }
}
