/// Errors raised by the projective geometry and frame helpers.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("calibration points are degenerate (three or more collinear, or singular system)")]
    DegenerateCalibration,
    #[error("calibration needs exactly 4 points, got {got}")]
    InvalidCalibrationLength { got: usize },
    #[error("transform is not invertible (det={det:e})")]
    NonInvertibleTransform { det: f64 },
    #[error("point maps to infinity (w={w:e})")]
    TransformSingularity { w: f64 },
    #[error("invalid frame buffer length (expected {expected} bytes, got {got})")]
    InvalidFrameBuffer { expected: usize, got: usize },
}
