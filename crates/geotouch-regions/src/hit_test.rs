//! Point-in-polygon classification.
//!
//! Containment is boundary-inclusive: a point within [`BOUNDARY_TOLERANCE`]
//! of any edge (vertices included) is inside. Interior points use the
//! even-odd crossing rule. The same rule is used in camera and map space, and
//! since a homography maps edges to edges the outcome does not depend on the
//! space the test runs in (up to the tolerance).
//!
//! Cost is O(R * P) per query with a bounding-box reject per region; no
//! spatial index.

use crate::Region;
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Distance (in the polygon's units) within which a point counts as lying on
/// an edge.
pub const BOUNDARY_TOLERANCE: f32 = 1e-3;

fn on_segment(a: Point2<f32>, b: Point2<f32>, p: Point2<f32>, tol: f64) -> bool {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (px, py) = (p.x as f64, p.y as f64);

    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (qx, qy) = (ax + t * dx - px, ay + t * dy - py);
    qx * qx + qy * qy <= tol * tol
}

/// Boundary-inclusive point-in-polygon test. Polygons with fewer than 3
/// vertices contain nothing.
pub fn contains_point(polygon: &[Point2<f32>], p: Point2<f32>) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let tol = BOUNDARY_TOLERANCE as f64;
    let mut inside = false;
    let (px, py) = (p.x as f64, p.y as f64);

    let mut j = n - 1;
    for i in 0..n {
        let vi = polygon[i];
        let vj = polygon[j];
        if on_segment(vj, vi, p, tol) {
            return true;
        }

        let (xi, yi) = (vi.x as f64, vi.y as f64);
        let (xj, yj) = (vj.x as f64, vj.y as f64);
        if (yi > py) != (yj > py) {
            let x_cross = (xj - xi) * (py - yi) / (yj - yi) + xi;
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Indices of every region containing `p`, in store order.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "trace", skip(regions), fields(regions = regions.len()))
)]
pub fn classify_indices(p: Point2<f32>, regions: &[Region]) -> Vec<usize> {
    regions
        .iter()
        .enumerate()
        .filter(|(_, r)| r.bounds().contains(p, BOUNDARY_TOLERANCE))
        .filter(|(_, r)| contains_point(r.polygon(), p))
        .map(|(i, _)| i)
        .collect()
}

/// Names of every region containing `p`, in store order. Overlapping regions
/// all match.
pub fn classify(p: Point2<f32>, regions: &[Region]) -> Vec<&str> {
    classify_indices(p, regions)
        .into_iter()
        .map(|i| regions[i].name())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f32, f32)]) -> Vec<Point2<f32>> {
        raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn square_interior_exterior_and_boundary() {
        let sq = pts(&[(200.0, 200.0), (600.0, 200.0), (600.0, 600.0), (200.0, 600.0)]);
        assert!(contains_point(&sq, Point2::new(400.0, 400.0)));
        assert!(!contains_point(&sq, Point2::new(700.0, 700.0)));
        // edges and vertices are inside
        assert!(contains_point(&sq, Point2::new(600.0, 400.0)));
        assert!(contains_point(&sq, Point2::new(400.0, 200.0)));
        assert!(contains_point(&sq, Point2::new(200.0, 600.0)));
        assert!(!contains_point(&sq, Point2::new(600.01, 400.0)));
    }

    #[test]
    fn concave_polygon_notch_is_outside() {
        // "U" shape opening upwards
        let u = pts(&[
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (7.0, 10.0),
            (7.0, 3.0),
            (3.0, 3.0),
            (3.0, 10.0),
            (0.0, 10.0),
        ]);
        assert!(contains_point(&u, Point2::new(1.5, 8.0)));
        assert!(contains_point(&u, Point2::new(8.5, 8.0)));
        assert!(!contains_point(&u, Point2::new(5.0, 8.0)));
        assert!(contains_point(&u, Point2::new(5.0, 1.0)));
    }

    #[test]
    fn ray_through_vertex_is_counted_once() {
        let diamond = pts(&[(5.0, 0.0), (10.0, 5.0), (5.0, 10.0), (0.0, 5.0)]);
        assert!(contains_point(&diamond, Point2::new(2.0, 5.0)));
        assert!(!contains_point(&diamond, Point2::new(-2.0, 5.0)));
    }

    #[test]
    fn degenerate_polygons_contain_nothing() {
        assert!(!contains_point(&pts(&[(0.0, 0.0), (1.0, 1.0)]), Point2::new(0.5, 0.5)));
    }

    #[test]
    fn overlapping_regions_report_all_in_order() {
        let regions = vec![
            Region::new("A", pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]))
                .expect("A"),
            Region::new("B", pts(&[(20.0, 20.0), (30.0, 20.0), (30.0, 30.0)])).expect("B"),
            Region::new("C", pts(&[(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0)]))
                .expect("C"),
        ];
        assert_eq!(classify(Point2::new(7.0, 7.0), &regions), vec!["A", "C"]);
        assert_eq!(classify_indices(Point2::new(12.0, 12.0), &regions), vec![2]);
        assert!(classify(Point2::new(50.0, 50.0), &regions).is_empty());
    }
}
