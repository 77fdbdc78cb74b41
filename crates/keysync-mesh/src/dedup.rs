//! Vertex deduplication: triangle soup to simulation mesh.
//!
//! The renderer needs vertices duplicated per face; a deformable body needs
//! one point mass per geometrically-unique position. This module collapses
//! the soup's index stream by exact floating-point position equality.

use crate::TriangleSoup;
use nalgebra::Point3;
use tracing::debug;

/// A deduplicated simulation mesh.
///
/// `positions[i]` is the i-th unique position encountered while walking the
/// soup's index stream; `indices` is the remapped triangle stream referring
/// into `positions`. Invariant: `positions` has no two entries with equal
/// coordinates.
#[derive(Debug, Clone, Default)]
pub struct DedupMesh {
    /// Unique vertex positions in first-occurrence order.
    pub positions: Vec<Point3<f64>>,
    /// Remapped triangle index stream (same length as the soup's).
    pub indices: Vec<u32>,
}

impl DedupMesh {
    /// Number of unique positions (future simulation nodes).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.positions.len()
    }
}

/// Collapse a triangle soup into a unique-position vertex set.
///
/// Walks the index stream and compares each entry's position against all
/// earlier entries by exact equality; the first occurrence wins and later
/// duplicates alias its slot. This is an O(n²) scan, fine for the mesh
/// sizes this engine sees. Meshes beyond a few thousand stream entries
/// would want a spatial hash on quantized positions instead, keeping the
/// same first-occurrence tie-break.
///
/// Stream entries referencing out-of-range vertices are skipped together
/// with their triangle.
#[must_use]
pub fn dedup_index_stream(soup: &TriangleSoup) -> DedupMesh {
    let stream_len = soup.indices.len();
    // slot[i]: index into positions for stream entry i
    let mut slots: Vec<Option<u32>> = vec![None; stream_len];
    let mut positions: Vec<Point3<f64>> = Vec::new();

    for i in 0..stream_len {
        let Some(p) = soup.position_at_entry(i) else {
            continue;
        };
        let mut assigned = None;
        for j in 0..i {
            let Some(q) = soup.position_at_entry(j) else {
                continue;
            };
            if p == q {
                assigned = slots[j];
                break;
            }
        }
        slots[i] = assigned.or_else(|| {
            positions.push(p);
            Some((positions.len() - 1) as u32)
        });
    }

    // Keep only triangles whose three corners all resolved.
    let mut indices = Vec::with_capacity(stream_len);
    for tri in slots.chunks_exact(3) {
        if let (Some(a), Some(b), Some(c)) = (tri[0], tri[1], tri[2]) {
            indices.extend_from_slice(&[a, b, c]);
        }
    }

    debug!(
        stream = stream_len,
        unique = positions.len(),
        "deduplicated index stream"
    );

    DedupMesh { positions, indices }
}
