use crate::io::{read_json_lenient, write_json, LoadOutcome, StoreIoError};
use nalgebra::Point2;
use std::path::Path;

/// Number of calibration corners.
pub const CALIBRATION_POINTS: usize = 4;

/// Camera-space calibration corners, collected one click at a time in the
/// order top-left, top-right, bottom-left, bottom-right.
///
/// Locked once 4 points are recorded; only [`CalibrationStore::reset`]
/// unlocks it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalibrationStore {
    points: Vec<Point2<f32>>,
}

impl CalibrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_quad(quad: [Point2<f32>; CALIBRATION_POINTS]) -> Self {
        Self {
            points: quad.to_vec(),
        }
    }

    /// Append a point. Returns `false` (and ignores the point) when already
    /// complete or when the point is not finite.
    pub fn record_point(&mut self, p: Point2<f32>) -> bool {
        if self.is_complete() || !(p.x.is_finite() && p.y.is_finite()) {
            return false;
        }
        self.points.push(p);
        true
    }

    pub fn reset(&mut self) {
        self.points.clear();
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.points.len() == CALIBRATION_POINTS
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }

    /// The 4 corners once complete.
    pub fn quad(&self) -> Option<[Point2<f32>; CALIBRATION_POINTS]> {
        <[Point2<f32>; CALIBRATION_POINTS]>::try_from(self.points.as_slice()).ok()
    }

    /// Write the 4 corners as a JSON array of `[x, y]` pairs.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), StoreIoError> {
        let quad = self.quad().ok_or(StoreIoError::IncompleteCalibration {
            got: self.points.len(),
        })?;
        write_json(path.as_ref(), &quad)
    }

    /// Load calibration, falling back to empty on a missing or corrupt file.
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::load_with_outcome(path).0
    }

    pub fn load_with_outcome(path: impl AsRef<Path>) -> (Self, LoadOutcome) {
        let (quad, outcome) = read_json_lenient::<[Point2<f32>; CALIBRATION_POINTS], _>(
            path.as_ref(),
            "calibration",
            |q| {
                if q.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
                    Ok(CALIBRATION_POINTS)
                } else {
                    Err("non-finite calibration point".to_string())
                }
            },
        );
        (quad.map(Self::from_quad).unwrap_or_default(), outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locks_at_four_points() {
        let mut c = CalibrationStore::new();
        for i in 0..4 {
            assert!(c.record_point(Point2::new(i as f32, 0.0)));
            assert_eq!(c.is_complete(), i == 3);
        }
        assert!(!c.record_point(Point2::new(99.0, 99.0)));
        assert_eq!(c.len(), 4);
        assert_eq!(c.points()[3], Point2::new(3.0, 0.0));
    }

    #[test]
    fn reset_clears() {
        let mut c = CalibrationStore::from_quad([Point2::new(1.0, 1.0); 4]);
        assert!(c.quad().is_some());
        c.reset();
        assert!(c.is_empty());
        assert!(c.quad().is_none());
        assert!(c.record_point(Point2::new(5.0, 5.0)));
    }

    #[test]
    fn rejects_non_finite_points() {
        let mut c = CalibrationStore::new();
        assert!(!c.record_point(Point2::new(f32::NAN, 1.0)));
        assert!(c.is_empty());
    }

    #[test]
    fn persist_requires_complete_calibration() {
        let c = CalibrationStore::new();
        let err = c.persist("unused.json").unwrap_err();
        assert!(matches!(err, StoreIoError::IncompleteCalibration { got: 0 }));
    }
}
