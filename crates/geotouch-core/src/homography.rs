use crate::GeoError;
use nalgebra::{DMatrix, Matrix3, Point2, SMatrix, SVector, Vector3};

/// Determinant / homogeneous-weight magnitude below which a transform is
/// treated as singular.
pub const PROJECTIVE_EPS: f64 = 1e-9;

/// Relative triangle-area threshold used to reject collinear correspondences.
const COLLINEAR_REL_EPS: f64 = 1e-6;

/// 3x3 projective transform acting on homogeneous 2D points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity())
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]))
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    /// Project without a singularity check. Callers on the hot warp path use
    /// this and discard non-finite results themselves.
    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        Point2::new((v[0] / w) as f32, (v[1] / w) as f32)
    }

    /// Homogeneous transform `(x, y, 1) -> (x'/w', y'/w')`.
    ///
    /// Fails with [`GeoError::TransformSingularity`] when `|w'|` is below
    /// [`PROJECTIVE_EPS`], i.e. the point maps to infinity.
    #[inline]
    pub fn try_apply(&self, p: Point2<f32>) -> Result<Point2<f32>, GeoError> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        if !w.is_finite() || w.abs() < PROJECTIVE_EPS {
            return Err(GeoError::TransformSingularity { w });
        }
        Ok(Point2::new((v[0] / w) as f32, (v[1] / w) as f32))
    }

    pub fn determinant(&self) -> f64 {
        self.h.determinant()
    }

    /// Matrix inverse; fails when `|det|` is below [`PROJECTIVE_EPS`].
    pub fn inverse(&self) -> Result<Self, GeoError> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < PROJECTIVE_EPS {
            return Err(GeoError::NonInvertibleTransform { det });
        }
        self.h
            .try_inverse()
            .map(Self::new)
            .ok_or(GeoError::NonInvertibleTransform { det })
    }
}

fn hartley_normalization(cx: f64, cy: f64, mean_dist: f64) -> Matrix3<f64> {
    let s = if mean_dist > 1e-12 {
        (2.0_f64).sqrt() / mean_dist
    } else {
        1.0
    };

    Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn normalize_points(pts: &[Point2<f32>]) -> (Vec<Point2<f64>>, Matrix3<f64>) {
    // Hartley: centroid to origin, mean distance sqrt(2)
    let n = pts.len() as f64;
    let (mut cx, mut cy) = (0.0, 0.0);
    for p in pts {
        cx += p.x as f64;
        cy += p.y as f64;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0;
    for p in pts {
        let dx = p.x as f64 - cx;
        let dy = p.y as f64 - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n;

    let t = hartley_normalization(cx, cy, mean_dist);
    let out = pts
        .iter()
        .map(|p| {
            let v = t * Vector3::new(p.x as f64, p.y as f64, 1.0);
            Point2::new(v[0], v[1])
        })
        .collect();
    (out, t)
}

fn normalize_homography(h: Matrix3<f64>) -> Option<Matrix3<f64>> {
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        return None;
    }
    Some(h / s)
}

fn denormalize_homography(
    hn: Matrix3<f64>,
    t_src: Matrix3<f64>,
    t_dst: Matrix3<f64>,
) -> Option<Matrix3<f64>> {
    let t_dst_inv = t_dst.try_inverse()?;
    Some(t_dst_inv * hn * t_src)
}

/// True if any three of the four points are (numerically) collinear.
///
/// The threshold is relative to the squared extent of the point set so the
/// test behaves the same for pixel and normalized coordinates.
pub fn has_collinear_triple(pts: &[Point2<f32>; 4]) -> bool {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in pts {
        min_x = min_x.min(p.x as f64);
        min_y = min_y.min(p.y as f64);
        max_x = max_x.max(p.x as f64);
        max_y = max_y.max(p.y as f64);
    }
    let extent = (max_x - min_x).max(max_y - min_y);
    if !extent.is_finite() || extent <= 0.0 {
        return true;
    }
    let tol = COLLINEAR_REL_EPS * extent * extent;

    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    TRIPLES.iter().any(|&[a, b, c]| {
        let (pa, pb, pc) = (pts[a], pts[b], pts[c]);
        let cross = (pb.x as f64 - pa.x as f64) * (pc.y as f64 - pa.y as f64)
            - (pb.y as f64 - pa.y as f64) * (pc.x as f64 - pa.x as f64);
        cross.abs() <= tol
    })
}

/// Compute H such that `dst ~ H * src` from exactly 4 correspondences.
///
/// Corner order must be consistent between `src` and `dst`. Fails with
/// [`GeoError::DegenerateCalibration`] when either quadrilateral has three
/// collinear corners or the linear system is singular.
pub fn homography_from_4pt(
    src: &[Point2<f32>; 4],
    dst: &[Point2<f32>; 4],
) -> Result<Homography, GeoError> {
    if has_collinear_triple(src) || has_collinear_triple(dst) {
        return Err(GeoError::DegenerateCalibration);
    }

    // Unknowns: [h11 h12 h13 h21 h22 h23 h31 h32], h33 = 1
    // h11 x + h12 y + h13 - u h31 x - u h32 y = u
    // h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let (src_n, t_src) = normalize_points(src);
    let (dst_n, t_dst) = normalize_points(dst);

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let x = src_n[k].x;
        let y = src_n[k].y;
        let u = dst_n[k].x;
        let v = dst_n[k].y;

        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        let r1 = 2 * k + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = a.lu().solve(&b).ok_or(GeoError::DegenerateCalibration)?;

    let hn = Matrix3::<f64>::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    let h = denormalize_homography(hn, t_src, t_dst)
        .and_then(normalize_homography)
        .ok_or(GeoError::DegenerateCalibration)?;
    if !h.iter().all(|v| v.is_finite()) {
        return Err(GeoError::DegenerateCalibration);
    }
    Ok(Homography::new(h))
}

/// Least-squares DLT estimate of H with `dst ~ H * src` from N >= 4
/// correspondences. Exactly 4 points dispatch to [`homography_from_4pt`].
pub fn estimate_homography(
    src: &[Point2<f32>],
    dst: &[Point2<f32>],
) -> Result<Homography, GeoError> {
    if src.len() != dst.len() || src.len() < 4 {
        return Err(GeoError::InvalidCalibrationLength {
            got: src.len().min(dst.len()),
        });
    }

    if let (Ok(s4), Ok(d4)) = (
        <&[Point2<f32>; 4]>::try_from(src),
        <&[Point2<f32>; 4]>::try_from(dst),
    ) {
        return homography_from_4pt(s4, d4);
    }

    let (s, ts) = normalize_points(src);
    let (d, td) = normalize_points(dst);

    let n = src.len();
    let mut a = DMatrix::<f64>::zeros(2 * n, 9);
    for k in 0..n {
        let (x, y) = (s[k].x, s[k].y);
        let (u, v) = (d[k].x, d[k].y);

        // [ -x -y -1   0  0  0   u*x u*y u ]
        a[(2 * k, 0)] = -x;
        a[(2 * k, 1)] = -y;
        a[(2 * k, 2)] = -1.0;
        a[(2 * k, 6)] = u * x;
        a[(2 * k, 7)] = u * y;
        a[(2 * k, 8)] = u;

        // [ 0  0  0  -x -y -1   v*x v*y v ]
        a[(2 * k + 1, 3)] = -x;
        a[(2 * k + 1, 4)] = -y;
        a[(2 * k + 1, 5)] = -1.0;
        a[(2 * k + 1, 6)] = v * x;
        a[(2 * k + 1, 7)] = v * y;
        a[(2 * k + 1, 8)] = v;
    }

    // h is the right singular vector of the smallest singular value
    let svd = a.svd(true, true);
    let vt = svd.v_t.ok_or(GeoError::DegenerateCalibration)?;
    let last = vt
        .nrows()
        .checked_sub(1)
        .ok_or(GeoError::DegenerateCalibration)?;
    let h = vt.row(last);

    let hn =
        Matrix3::<f64>::from_row_slice(&[h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], h[8]]);

    let h = denormalize_homography(hn, ts, td)
        .and_then(normalize_homography)
        .ok_or(GeoError::DegenerateCalibration)?;
    Ok(Homography::new(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point2<f32>, b: Point2<f32>, tol: f32) {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        assert!(
            dx < tol && dy < tol,
            "expected ({:.6},{:.6}) ~ ({:.6},{:.6}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn inverse_round_trips_points() {
        let h = Homography::new(Matrix3::new(
            1.2, 0.1, 5.0, //
            -0.05, 0.9, 3.0, //
            0.001, 0.0005, 1.0,
        ));
        let inv = h.inverse().expect("invertible");

        for p in [
            Point2::new(0.0_f32, 0.0),
            Point2::new(50.0_f32, -20.0),
            Point2::new(320.0_f32, 200.0),
        ] {
            let back = inv.apply(h.apply(p));
            assert_close(back, p, 1e-3);
        }
    }

    #[test]
    fn four_point_solve_recovers_h() {
        let ground_truth = Homography::new(Matrix3::new(
            0.8, 0.05, 120.0, //
            -0.02, 1.1, 80.0, //
            0.0009, -0.0004, 1.0,
        ));

        let rect = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(180.0_f32, 0.0),
            Point2::new(0.0_f32, 130.0),
            Point2::new(180.0_f32, 130.0),
        ];
        let dst = rect.map(|p| ground_truth.apply(p));

        let recovered = homography_from_4pt(&rect, &dst).expect("recoverable");
        for p in [
            Point2::new(0.0_f32, 0.0),
            Point2::new(60.0, 40.0),
            Point2::new(150.0, 120.0),
        ] {
            assert_close(recovered.apply(p), ground_truth.apply(p), 1e-3);
        }
    }

    #[test]
    fn dlt_handles_overdetermined_case() {
        let ground_truth = Homography::new(Matrix3::new(
            1.0, 0.2, 12.0, //
            -0.1, 0.9, 6.0, //
            0.0006, 0.0004, 1.0,
        ));

        let src: Vec<Point2<f32>> = (0..3)
            .flat_map(|y| (0..3).map(move |x| Point2::new(x as f32 * 40.0, y as f32 * 50.0)))
            .collect();
        let dst: Vec<Point2<f32>> = src.iter().map(|&p| ground_truth.apply(p)).collect();

        let estimated = estimate_homography(&src, &dst).expect("estimate");
        for p in [Point2::new(0.0_f32, 0.0), Point2::new(60.0, 40.0)] {
            assert_close(estimated.apply(p), ground_truth.apply(p), 1e-3);
        }
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let src = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(20.0, 20.0),
            Point2::new(5.0, 40.0),
        ];
        let dst = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(0.0, 100.0),
            Point2::new(100.0, 100.0),
        ];
        assert_eq!(
            homography_from_4pt(&src, &dst),
            Err(GeoError::DegenerateCalibration)
        );
    }

    #[test]
    fn singular_matrix_is_not_invertible() {
        let h = Homography::from_array([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]);
        assert!(matches!(
            h.inverse(),
            Err(GeoError::NonInvertibleTransform { .. })
        ));
    }

    #[test]
    fn point_on_vanishing_line_is_singular() {
        // w' = 0.01 x + 1 vanishes at x = -100
        let h = Homography::from_array([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.01, 0.0, 1.0]]);
        assert!(matches!(
            h.try_apply(Point2::new(-100.0, 3.0)),
            Err(GeoError::TransformSingularity { .. })
        ));
        assert!(h.try_apply(Point2::new(10.0, 3.0)).is_ok());
    }

    #[test]
    fn mismatched_input_lengths_fail() {
        let src = [Point2::new(0.0_f32, 0.0); 4];
        let dst = [Point2::new(1.0_f32, 1.0); 3];
        assert!(estimate_homography(&src, &dst).is_err());
    }
}
