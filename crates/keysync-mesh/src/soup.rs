//! The authoring mesh: triangle soup with per-face duplicated vertices.

use crate::Aabb;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vertex layout of an authoring mesh, copied verbatim into the render cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MeshFormat {
    /// Position + normal + texture coordinates.
    #[default]
    Standard,
    /// Standard layout plus bone indices/weights (authored by the rig tool).
    Rigged,
}

/// An authoring mesh as produced by the import pipeline.
///
/// Vertices are duplicated per face so each face corner can carry its own
/// normal and texture coordinates; positions shared between faces therefore
/// appear multiple times. The `indices` stream has length 3 × triangle
/// count and indexes all three attribute arrays in parallel.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleSoup {
    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Per-vertex unit normals.
    pub normals: Vec<Vector3<f64>>,
    /// Per-vertex texture coordinates.
    pub uvs: Vec<(f32, f32)>,
    /// Triangle index stream (length 3 × triangle count).
    pub indices: Vec<u32>,
    /// Vertex layout tag.
    pub format: MeshFormat,
}

impl TriangleSoup {
    /// Create an empty mesh.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            format: MeshFormat::Standard,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh cannot produce any collision geometry.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.positions.is_empty() || self.indices.len() < 3
    }

    /// Position referenced by index-stream entry `i`.
    ///
    /// Returns `None` if the stream entry or the index it holds is out of
    /// bounds (malformed import data).
    #[must_use]
    pub fn position_at_entry(&self, i: usize) -> Option<Point3<f64>> {
        let index = *self.indices.get(i)? as usize;
        self.positions.get(index).copied()
    }

    /// Triangle corner positions, one triple per triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            Some([
                *self.positions.get(tri[0] as usize)?,
                *self.positions.get(tri[1] as usize)?,
                *self.positions.get(tri[2] as usize)?,
            ])
        })
    }

    /// Bounding box of all vertex positions.
    #[must_use]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.positions)
    }
}

/// A unit cube as triangle soup: 4 vertices per face, 6 faces, 24 vertices
/// total over 8 distinct corner positions.
///
/// This is the canonical fixture for deduplication: collapsing it by exact
/// position equality must yield exactly 8 simulation nodes.
#[must_use]
pub fn unit_cube() -> TriangleSoup {
    let h = 0.5;
    // (normal, four corners CCW seen from outside)
    let faces: [(Vector3<f64>, [Point3<f64>; 4]); 6] = [
        (
            Vector3::new(0.0, 0.0, 1.0),
            [
                Point3::new(-h, -h, h),
                Point3::new(h, -h, h),
                Point3::new(h, h, h),
                Point3::new(-h, h, h),
            ],
        ),
        (
            Vector3::new(0.0, 0.0, -1.0),
            [
                Point3::new(h, -h, -h),
                Point3::new(-h, -h, -h),
                Point3::new(-h, h, -h),
                Point3::new(h, h, -h),
            ],
        ),
        (
            Vector3::new(1.0, 0.0, 0.0),
            [
                Point3::new(h, -h, h),
                Point3::new(h, -h, -h),
                Point3::new(h, h, -h),
                Point3::new(h, h, h),
            ],
        ),
        (
            Vector3::new(-1.0, 0.0, 0.0),
            [
                Point3::new(-h, -h, -h),
                Point3::new(-h, -h, h),
                Point3::new(-h, h, h),
                Point3::new(-h, h, -h),
            ],
        ),
        (
            Vector3::new(0.0, 1.0, 0.0),
            [
                Point3::new(-h, h, h),
                Point3::new(h, h, h),
                Point3::new(h, h, -h),
                Point3::new(-h, h, -h),
            ],
        ),
        (
            Vector3::new(0.0, -1.0, 0.0),
            [
                Point3::new(-h, -h, -h),
                Point3::new(h, -h, -h),
                Point3::new(h, -h, h),
                Point3::new(-h, -h, h),
            ],
        ),
    ];

    let mut soup = TriangleSoup::new();
    for (normal, corners) in &faces {
        let base = soup.positions.len() as u32;
        let uv = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        for (corner, &tex) in corners.iter().zip(uv.iter()) {
            soup.positions.push(*corner);
            soup.normals.push(*normal);
            soup.uvs.push(tex);
        }
        soup.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    soup
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube_counts() {
        let cube = unit_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert!(!cube.is_degenerate());
    }

    #[test]
    fn test_unit_cube_bounds() {
        let aabb = unit_cube().aabb();
        assert_eq!(aabb.volume(), 1.0);
        assert_eq!(aabb.center(), Point3::origin());
    }

    #[test]
    fn test_empty_mesh_is_degenerate() {
        assert!(TriangleSoup::new().is_degenerate());
    }

    #[test]
    fn test_position_at_entry_bounds_checked() {
        let cube = unit_cube();
        assert!(cube.position_at_entry(0).is_some());
        assert!(cube.position_at_entry(cube.indices.len()).is_none());
    }
}
