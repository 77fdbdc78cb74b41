//! Mesh types for the keysync engine.
//!
//! This crate bridges the three representations of one object the engine
//! has to keep in correspondence:
//!
//! - [`TriangleSoup`] - the authoring mesh: vertices duplicated per face,
//!   exactly as the renderer wants them
//! - [`DedupMesh`] - the simulation mesh: geometrically-unique positions
//!   suitable for building a deformable body
//! - [`RenderMeshCache`] - the render snapshot: a per-node vertex buffer
//!   whose positions are refreshed from simulation nodes each frame
//!
//! # Deduplication
//!
//! [`dedup_index_stream`] collapses the triangle-soup index stream by exact
//! position equality, first occurrence wins. Two authoring vertices sharing
//! an identical position always map to one simulation node.
//!
//! # Example
//!
//! ```
//! use keysync_mesh::{unit_cube, dedup_index_stream};
//!
//! let soup = unit_cube();
//! assert_eq!(soup.vertex_count(), 24); // 4 per face × 6 faces
//!
//! let dedup = dedup_index_stream(&soup);
//! assert_eq!(dedup.positions.len(), 8); // cube corners
//! ```

#![doc(html_root_url = "https://docs.rs/keysync-mesh/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn)]

mod bounds;
mod cache;
mod dedup;
mod soup;

pub use bounds::Aabb;
pub use cache::RenderMeshCache;
pub use dedup::{dedup_index_stream, DedupMesh};
pub use soup::{unit_cube, MeshFormat, TriangleSoup};

// Re-export math types for convenience
pub use nalgebra::{Point3, Vector3};
