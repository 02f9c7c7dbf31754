//! Region segmentation
//!
//! Partitions a [`LabGrid`] into regions of near-uniform color and finds the
//! pixels on region boundaries. The passes run strictly in order, each
//! taking the shared [`SegmentationState`] by reference:
//!
//! 1. [`columns::build_column_regions`] - vertical runs per column
//! 2. [`rows::merge_rows`] - unions across horizontal neighbours
//! 3. [`borders::detect_borders`] - region-id transitions, read-only

pub mod borders;
pub mod columns;
pub mod disjoint_set;
pub mod rows;

use std::collections::BTreeMap;

use crate::color::LabGrid;

pub use borders::{detect_borders, BorderMap};
pub use columns::build_column_regions;
pub use disjoint_set::DisjointSet;
pub use rows::merge_rows;

/// Region identifier; allocated in increasing order during column segmentation
pub type RegionId = u32;

/// Pixel coordinate, `0 <= x < width`, `0 <= y < height`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Counters collected while segmenting one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentationStats {
    /// Regions after column segmentation
    pub initial_regions: usize,
    /// Regions after row merging
    pub final_regions: usize,
    /// Unions that joined two distinct regions
    pub merges: usize,
    /// In-range pixels flagged as border
    pub border_pixels: usize,
}

/// Owned segmentation state: colors, region table and reverse lookup.
///
/// The region table and the reverse lookup are kept mutually consistent by
/// every mutating method: each member of region `R` maps back to `R`, and no
/// pixel maps to a region absent from the table.
#[derive(Debug, Clone)]
pub struct SegmentationState {
    grid: LabGrid,
    threshold: f64,
    next_id: RegionId,
    regions: BTreeMap<RegionId, Vec<Point>>,
    lookup: Vec<Option<RegionId>>,
}

impl SegmentationState {
    /// Create an unsegmented state; every pixel starts without a region
    pub fn new(grid: LabGrid, threshold: f64) -> Self {
        let len = grid.width() * grid.height();
        Self {
            grid,
            threshold,
            next_id: 0,
            regions: BTreeMap::new(),
            lookup: vec![None; len],
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn grid(&self) -> &LabGrid {
        &self.grid
    }

    /// Region currently owning (x, y), if segmentation has reached it
    pub fn region_of(&self, x: usize, y: usize) -> Option<RegionId> {
        self.lookup[self.index(Point::new(x, y))]
    }

    /// Number of live regions
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Live region ids in ascending order
    pub fn region_ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.keys().copied()
    }

    /// Members of a live region in insertion order
    pub fn members(&self, id: RegionId) -> Option<&[Point]> {
        self.regions.get(&id).map(Vec::as_slice)
    }

    /// Dense reverse lookup in row-major order
    pub fn lookup(&self) -> &[Option<RegionId>] {
        &self.lookup
    }

    /// Whether the two pixels are close enough in color to share a region
    pub fn within_threshold(&self, a: Point, b: Point) -> bool {
        self.grid.distance((a.x, a.y), (b.x, b.y)) <= self.threshold
    }

    /// Verify the region table and reverse lookup agree
    pub fn is_consistent(&self) -> bool {
        let members_map_back = self.regions.iter().all(|(&id, members)| {
            members
                .iter()
                .all(|&p| self.lookup[self.index(p)] == Some(id))
        });
        let lookup_is_live = self
            .lookup
            .iter()
            .flatten()
            .all(|id| self.regions.contains_key(id));
        let member_total: usize = self.regions.values().map(Vec::len).sum();
        let assigned = self.lookup.iter().filter(|id| id.is_some()).count();

        members_map_back && lookup_is_live && member_total == assigned
    }

    /// First id not yet allocated; every allocated id is below it
    pub(crate) fn id_bound(&self) -> RegionId {
        self.next_id
    }

    /// Open a new region with `first` as its sole member
    pub(crate) fn open_region(&mut self, first: Point) -> RegionId {
        let id = self.next_id;
        self.next_id += 1;
        self.regions.insert(id, vec![first]);
        let index = self.index(first);
        self.lookup[index] = Some(id);
        id
    }

    /// Append `point` to an existing region
    pub(crate) fn extend_region(&mut self, id: RegionId, point: Point) {
        if let Some(members) = self.regions.get_mut(&id) {
            members.push(point);
            let index = self.index(point);
            self.lookup[index] = Some(id);
        }
    }

    /// Move every member of the region owning `absorbed` into the region
    /// owning `keep`, deleting the absorbed region.
    ///
    /// Returns `false` when both pixels already share a region.
    pub(crate) fn absorb(&mut self, keep: Point, absorbed: Point) -> bool {
        let (Some(keep_id), Some(absorbed_id)) = (
            self.lookup[self.index(keep)],
            self.lookup[self.index(absorbed)],
        ) else {
            return false;
        };
        if keep_id == absorbed_id {
            return false;
        }

        let Some(moved) = self.regions.remove(&absorbed_id) else {
            return false;
        };
        for &p in &moved {
            let index = self.index(p);
            self.lookup[index] = Some(keep_id);
        }
        self.regions.entry(keep_id).or_default().extend(moved);
        true
    }

    /// Rename every region through `canonical`, concatenating the member
    /// lists of regions that map to the same id (in ascending id order).
    pub(crate) fn relabel(&mut self, mut canonical: impl FnMut(RegionId) -> RegionId) {
        let old = std::mem::take(&mut self.regions);
        for (id, members) in old {
            let target = canonical(id);
            for &p in &members {
                let index = self.index(p);
                self.lookup[index] = Some(target);
            }
            self.regions.entry(target).or_default().extend(members);
        }
    }

    fn index(&self, p: Point) -> usize {
        p.y * self.grid.width() + p.x
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::color::LabSample;
    use palette::Lab;

    /// Grid from per-pixel lightness values given row by row
    pub fn lightness_grid(rows: &[&[f64]]) -> LabGrid {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let samples: Vec<LabSample> = rows
            .iter()
            .flat_map(|row| row.iter().map(|&l| Lab::new(l, 0.0, 0.0)))
            .collect();
        LabGrid::from_samples(width, height, samples).expect("rectangular rows")
    }

    pub fn state(rows: &[&[f64]]) -> SegmentationState {
        SegmentationState::new(lightness_grid(rows), 5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::state;
    use super::*;

    #[test]
    fn test_new_state_is_empty_and_consistent() {
        let state = state(&[&[0.0, 0.0], &[0.0, 0.0]]);
        assert_eq!(state.region_count(), 0);
        assert!(state.lookup().iter().all(Option::is_none));
        assert!(state.is_consistent());
    }

    #[test]
    fn test_open_extend_absorb() {
        let mut state = state(&[&[0.0, 0.0], &[0.0, 0.0]]);
        let a = state.open_region(Point::new(0, 0));
        state.extend_region(a, Point::new(0, 1));
        let b = state.open_region(Point::new(1, 0));
        state.extend_region(b, Point::new(1, 1));
        assert_eq!((a, b), (0, 1));
        assert!(state.is_consistent());

        assert!(state.absorb(Point::new(0, 0), Point::new(1, 1)));
        assert!(!state.absorb(Point::new(0, 1), Point::new(1, 0)));
        assert_eq!(state.region_count(), 1);
        assert_eq!(state.region_of(1, 0), Some(a));
        assert_eq!(
            state.members(a).unwrap(),
            &[
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(1, 0),
                Point::new(1, 1)
            ]
        );
        assert!(state.members(b).is_none());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_relabel_merges_member_lists() {
        let mut state = state(&[&[0.0, 0.0, 0.0]]);
        for x in 0..3 {
            state.open_region(Point::new(x, 0));
        }
        state.relabel(|id| if id == 2 { 0 } else { id });

        assert_eq!(state.region_count(), 2);
        assert_eq!(state.region_of(2, 0), Some(0));
        assert_eq!(state.members(0).unwrap().len(), 2);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_within_threshold_is_inclusive() {
        let state = state(&[&[10.0, 15.0, 20.1]]);
        assert!(state.within_threshold(Point::new(0, 0), Point::new(1, 0)));
        assert!(!state.within_threshold(Point::new(1, 0), Point::new(2, 0)));
    }
}
