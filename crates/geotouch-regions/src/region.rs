//! Named map-space polygons.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Rejected region commit. The store is never mutated when this is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("region name must not be empty")]
    EmptyName,
    #[error("region needs at least 3 points, got {got}")]
    TooFewPoints { got: usize },
    #[error("region point {index} is not finite")]
    NonFinitePoint { index: usize },
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point2<f32>,
    pub max: Point2<f32>,
}

impl Bounds {
    #[inline]
    pub fn contains(&self, p: Point2<f32>, tol: f32) -> bool {
        p.x >= self.min.x - tol
            && p.x <= self.max.x + tol
            && p.y >= self.min.y - tol
            && p.y <= self.max.y + tol
    }
}

/// A named simple polygon ("country") in map space.
///
/// Only constructed through [`Region::new`], so every instance has a
/// non-blank name and at least 3 finite vertices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionRecord")]
pub struct Region {
    name: String,
    polygon: Vec<Point2<f32>>,
}

/// Unvalidated on-disk shape of a [`Region`].
#[derive(Deserialize)]
struct RegionRecord {
    name: String,
    polygon: Vec<Point2<f32>>,
}

impl TryFrom<RegionRecord> for Region {
    type Error = RegionError;

    fn try_from(raw: RegionRecord) -> Result<Self, Self::Error> {
        Region::new(raw.name, raw.polygon)
    }
}

impl Region {
    pub fn new(name: impl Into<String>, polygon: Vec<Point2<f32>>) -> Result<Self, RegionError> {
        let name = name.into();
        validate(&name, &polygon)?;
        Ok(Self { name, polygon })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn polygon(&self) -> &[Point2<f32>] {
        &self.polygon
    }

    /// Vertex centroid (mean of the vertices). Used to anchor labels.
    pub fn centroid(&self) -> Point2<f32> {
        let n = self.polygon.len() as f32;
        let (sx, sy) = self
            .polygon
            .iter()
            .fold((0.0_f32, 0.0_f32), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2::new(sx / n, sy / n)
    }

    pub fn bounds(&self) -> Bounds {
        let mut min = Point2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Point2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in &self.polygon {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Bounds { min, max }
    }
}

fn validate(name: &str, polygon: &[Point2<f32>]) -> Result<(), RegionError> {
    if name.trim().is_empty() {
        return Err(RegionError::EmptyName);
    }
    if polygon.len() < 3 {
        return Err(RegionError::TooFewPoints { got: polygon.len() });
    }
    if let Some(index) = polygon
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite()))
    {
        return Err(RegionError::NonFinitePoint { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2<f32>> {
        vec![
            Point2::new(200.0, 200.0),
            Point2::new(600.0, 200.0),
            Point2::new(600.0, 600.0),
            Point2::new(200.0, 600.0),
        ]
    }

    #[test]
    fn rejects_blank_names_and_short_polygons() {
        assert_eq!(Region::new("  ", square()), Err(RegionError::EmptyName));
        assert_eq!(
            Region::new("A", square()[..2].to_vec()),
            Err(RegionError::TooFewPoints { got: 2 })
        );
        let mut bad = square();
        bad[1].x = f32::NAN;
        assert_eq!(
            Region::new("A", bad),
            Err(RegionError::NonFinitePoint { index: 1 })
        );
    }

    #[test]
    fn centroid_and_bounds() {
        let r = Region::new("Testland", square()).expect("valid");
        assert_eq!(r.centroid(), Point2::new(400.0, 400.0));
        let b = r.bounds();
        assert_eq!(b.min, Point2::new(200.0, 200.0));
        assert_eq!(b.max, Point2::new(600.0, 600.0));
    }

    #[test]
    fn serializes_as_name_and_point_pairs() {
        let r = Region::new("A", square()).expect("valid");
        let json = serde_json::to_value(&r).expect("json");
        assert_eq!(json["name"], "A");
        assert_eq!(json["polygon"][1][0], 600.0);
        assert_eq!(json["polygon"][1][1], 200.0);
    }

    #[test]
    fn deserialization_applies_commit_rules() {
        let ok: Region =
            serde_json::from_str(r#"{"name":"A","polygon":[[0,0],[1,0],[0,1]]}"#).expect("valid");
        assert_eq!(ok.polygon().len(), 3);
        let bad = serde_json::from_str::<Region>(r#"{"name":"A","polygon":[[0,0],[1,0]]}"#);
        assert!(bad.is_err());
    }
}
