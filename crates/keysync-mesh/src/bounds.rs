//! Axis-aligned bounding box.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// Used for weight derivation (`volume × density`) and broad culling.
/// An empty box has `min > max` and zero volume.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Create an empty box (any point grows it).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create a box from explicit corners.
    #[must_use]
    pub const fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Build the bounding box of a point set.
    #[must_use]
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.grow(p);
        }
        aabb
    }

    /// Grow the box to contain `p`.
    pub fn grow(&mut self, p: &Point3<f64>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Whether the box contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Per-axis extents. Zero for an empty box.
    #[must_use]
    pub fn extents(&self) -> Vector3<f64> {
        if self.is_empty() {
            Vector3::zeros()
        } else {
            self.max - self.min
        }
    }

    /// Volume of the box. Zero for an empty box.
    #[must_use]
    pub fn volume(&self) -> f64 {
        let e = self.extents();
        e.x * e.y * e.z
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_box() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_eq!(aabb.volume(), 0.0);
        assert_eq!(aabb.extents(), Vector3::zeros());
    }

    #[test]
    fn test_from_points() {
        let points = [
            Point3::new(-1.0, 0.0, 2.0),
            Point3::new(3.0, -2.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let aabb = Aabb::from_points(&points);
        assert_eq!(aabb.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Point3::new(3.0, 1.0, 2.0));
        assert_eq!(aabb.volume(), 4.0 * 3.0 * 2.0);
    }

    #[test]
    fn test_center() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Point3::new(1.0, 2.0, 3.0));
    }
}
