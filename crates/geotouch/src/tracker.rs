//! Fingertip tracker capability.

use geotouch_core::FrameView;
use nalgebra::Point2;

/// Points beyond this count are dropped each frame.
pub const MAX_TRACKED_POINTS: usize = 2;

/// Source of camera-space fingertip positions, one per detected hand.
///
/// Implementations may return more than [`MAX_TRACKED_POINTS`]; the pipeline
/// keeps the first two.
pub trait PointTracker {
    fn detect_points(&mut self, frame: &FrameView<'_>) -> Vec<Point2<f32>>;
}

impl<T: PointTracker + ?Sized> PointTracker for &mut T {
    fn detect_points(&mut self, frame: &FrameView<'_>) -> Vec<Point2<f32>> {
        (**self).detect_points(frame)
    }
}

impl<T: PointTracker + ?Sized> PointTracker for Box<T> {
    fn detect_points(&mut self, frame: &FrameView<'_>) -> Vec<Point2<f32>> {
        (**self).detect_points(frame)
    }
}

/// Deterministic tracker that replays scripted detections, one entry per
/// frame, ignoring the image content.
#[derive(Clone, Debug, Default)]
pub struct FixtureTracker {
    script: Vec<Vec<Point2<f32>>>,
    cursor: usize,
    cycle: bool,
}

impl FixtureTracker {
    /// Replay `script` once, then report no points.
    pub fn new(script: Vec<Vec<Point2<f32>>>) -> Self {
        Self {
            script,
            cursor: 0,
            cycle: false,
        }
    }

    /// Report the same points on every frame.
    pub fn constant(points: Vec<Point2<f32>>) -> Self {
        Self {
            script: vec![points],
            cursor: 0,
            cycle: true,
        }
    }

    /// Frames served so far.
    pub fn frames_served(&self) -> usize {
        self.cursor
    }
}

impl PointTracker for FixtureTracker {
    fn detect_points(&mut self, _frame: &FrameView<'_>) -> Vec<Point2<f32>> {
        let idx = if self.cycle && !self.script.is_empty() {
            self.cursor % self.script.len()
        } else {
            self.cursor
        };
        self.cursor += 1;
        self.script.get(idx).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotouch_core::{Frame, FrameSize};

    #[test]
    fn script_then_empty() {
        let frame = Frame::black(FrameSize::new(2, 2));
        let mut t = FixtureTracker::new(vec![vec![Point2::new(1.0, 1.0)], vec![]]);
        assert_eq!(t.detect_points(&frame.view()).len(), 1);
        assert!(t.detect_points(&frame.view()).is_empty());
        assert!(t.detect_points(&frame.view()).is_empty());
        assert_eq!(t.frames_served(), 3);
    }

    #[test]
    fn constant_repeats() {
        let frame = Frame::black(FrameSize::new(2, 2));
        let mut t = FixtureTracker::constant(vec![Point2::new(1.0, 2.0), Point2::new(3.0, 4.0)]);
        for _ in 0..3 {
            assert_eq!(t.detect_points(&frame.view()).len(), 2);
        }
    }
}
