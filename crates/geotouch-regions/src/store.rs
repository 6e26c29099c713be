use crate::io::{read_json_lenient, write_json, LoadOutcome, StoreIoError};
use crate::{classify, Region, RegionError};
use nalgebra::Point2;
use std::path::Path;

/// Ordered collection of regions. Insertion order is z-order for drawing and
/// the order in which overlapping matches are reported.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionStore {
    regions: Vec<Region>,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_regions(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Validate and append a region. On error the store is unchanged.
    pub fn add_region(
        &mut self,
        name: impl Into<String>,
        points: Vec<Point2<f32>>,
    ) -> Result<&Region, RegionError> {
        let region = Region::new(name, points)?;
        self.regions.push(region);
        Ok(&self.regions[self.regions.len() - 1])
    }

    /// Pop the most recently added region; `None` on an empty store.
    pub fn remove_last(&mut self) -> Option<Region> {
        self.regions.pop()
    }

    /// Replace the whole sequence.
    pub fn replace(&mut self, regions: Vec<Region>) {
        self.regions = regions;
    }

    #[inline]
    pub fn all(&self) -> &[Region] {
        &self.regions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    /// Names of regions containing `p`, see [`classify`].
    pub fn classify(&self, p: Point2<f32>) -> Vec<&str> {
        classify(p, &self.regions)
    }

    /// Write the full ordered sequence as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreIoError> {
        write_json(path.as_ref(), &self.regions)
    }

    /// Load a store, falling back to empty on a missing or corrupt file.
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::load_with_outcome(path).0
    }

    pub fn load_with_outcome(path: impl AsRef<Path>) -> (Self, LoadOutcome) {
        let (regions, outcome) =
            read_json_lenient::<Vec<Region>, _>(path.as_ref(), "region", |r| Ok(r.len()));
        (Self::from_regions(regions.unwrap_or_default()), outcome)
    }
}
