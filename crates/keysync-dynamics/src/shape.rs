//! Collision shapes.

use keysync_mesh::Aabb;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of support directions sampled when simplifying a convex hull.
const HULL_SAMPLE_DIRECTIONS: usize = 42;

/// Collision geometry attached to a body.
///
/// Static scenery uses the exact triangle list so other bodies rest on the
/// authored surface; movable bodies use a simplified convex hull. Margins
/// follow that split: a generous margin on the static mesh keeps resting
/// contacts stable, while hulls carry no margin so they match the authored
/// silhouette.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollisionShape {
    /// Exact triangle list in local space. Only valid on static bodies.
    TriangleMesh {
        /// Triangle corner positions.
        triangles: Vec<[Point3<f64>; 3]>,
        /// Collision margin added around each triangle.
        margin: f64,
    },
    /// Convex point cloud in local space.
    ConvexHull {
        /// Hull vertices.
        points: Vec<Point3<f64>>,
        /// Collision margin added around the hull.
        margin: f64,
    },
}

impl CollisionShape {
    /// Exact triangle mesh shape with the standard static margin.
    #[must_use]
    pub fn triangle_mesh(triangles: Vec<[Point3<f64>; 3]>) -> Self {
        Self::TriangleMesh {
            triangles,
            margin: 0.5,
        }
    }

    /// Convex hull shape with zero margin.
    #[must_use]
    pub fn convex_hull(points: Vec<Point3<f64>>) -> Self {
        Self::ConvexHull { points, margin: 0.0 }
    }

    /// Collision margin.
    #[must_use]
    pub fn margin(&self) -> f64 {
        match self {
            Self::TriangleMesh { margin, .. } | Self::ConvexHull { margin, .. } => *margin,
        }
    }

    /// Bake a per-axis scale into the shape's local vertices.
    pub fn apply_local_scaling(&mut self, scale: &Vector3<f64>) {
        let scale_point = |p: &mut Point3<f64>| {
            p.x *= scale.x;
            p.y *= scale.y;
            p.z *= scale.z;
        };
        match self {
            Self::TriangleMesh { triangles, .. } => {
                for tri in triangles {
                    for corner in tri {
                        scale_point(corner);
                    }
                }
            }
            Self::ConvexHull { points, .. } => {
                for p in points {
                    scale_point(p);
                }
            }
        }
    }

    /// Local-space bounding box (margin not included).
    #[must_use]
    pub fn local_aabb(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        match self {
            Self::TriangleMesh { triangles, .. } => {
                for tri in triangles {
                    for corner in tri {
                        aabb.grow(corner);
                    }
                }
            }
            Self::ConvexHull { points, .. } => {
                for p in points {
                    aabb.grow(p);
                }
            }
        }
        aabb
    }

    /// Radius of the bounding sphere around the local origin, margin
    /// included. Used as the contact proxy for movable bodies.
    #[must_use]
    pub fn bounding_radius(&self) -> f64 {
        let mut max_sq: f64 = 0.0;
        match self {
            Self::TriangleMesh { triangles, .. } => {
                for tri in triangles {
                    for corner in tri {
                        max_sq = max_sq.max(corner.coords.norm_squared());
                    }
                }
            }
            Self::ConvexHull { points, .. } => {
                for p in points {
                    max_sq = max_sq.max(p.coords.norm_squared());
                }
            }
        }
        max_sq.sqrt() + self.margin()
    }

    /// Principal moments of inertia for the given mass, approximated from
    /// the shape's bounding box as a solid cuboid. Zero for static shapes
    /// and non-positive masses.
    #[must_use]
    pub fn local_inertia(&self, mass: f64) -> Vector3<f64> {
        if mass <= 0.0 || matches!(self, Self::TriangleMesh { .. }) {
            return Vector3::zeros();
        }
        let e = self.local_aabb().extents();
        let k = mass / 12.0;
        Vector3::new(
            k * (e.y * e.y + e.z * e.z),
            k * (e.x * e.x + e.z * e.z),
            k * (e.x * e.x + e.y * e.y),
        )
    }
}

/// Reduce a convex point cloud to its support points along a fixed set of
/// directions.
///
/// Directions are distributed over the unit sphere with a golden-angle
/// spiral; for each one the farthest input point is kept, duplicates
/// collapsed. The result has at most 42 vertices and contains the extremes
/// of the input along every sampled direction, which is what contact
/// resolution needs from a movable body's hull.
#[must_use]
pub fn simplify_hull(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut hull: Vec<Point3<f64>> = Vec::with_capacity(HULL_SAMPLE_DIRECTIONS);
    for dir in sample_directions() {
        let mut best = points[0];
        let mut best_dot = best.coords.dot(&dir);
        for p in &points[1..] {
            let d = p.coords.dot(&dir);
            if d > best_dot {
                best_dot = d;
                best = *p;
            }
        }
        if !hull.contains(&best) {
            hull.push(best);
        }
    }
    hull
}

/// Golden-angle spiral over the unit sphere.
fn sample_directions() -> impl Iterator<Item = Vector3<f64>> {
    let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    (0..HULL_SAMPLE_DIRECTIONS).map(move |i| {
        let n = HULL_SAMPLE_DIRECTIONS as f64;
        let y = 1.0 - 2.0 * (i as f64 + 0.5) / n;
        let r = (1.0 - y * y).sqrt();
        let theta = golden_angle * i as f64;
        Vector3::new(r * theta.cos(), y, r * theta.sin())
    })
}
