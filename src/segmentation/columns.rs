//! Column segmentation
//!
//! Walks every column top to bottom and cuts it into maximal vertical runs
//! whose consecutive pixels stay within the color threshold.

use log::debug;
use rayon::prelude::*;
use std::time::Instant;

use super::{Point, SegmentationState};
use crate::color::LabGrid;

/// Assign every pixel to a column-local region.
///
/// Region ids come from one counter shared by all columns and are allocated
/// left to right, top to bottom. With `parallel` the run boundaries of each
/// column are found on the rayon pool and ids are assigned afterwards in
/// column order, so both paths produce identical ids.
///
/// # Returns
///
/// Number of regions created
pub fn build_column_regions(state: &mut SegmentationState, parallel: bool) -> usize {
    let start = Instant::now();
    let width = state.width();
    let threshold = state.threshold();

    let column_runs: Vec<Vec<usize>> = {
        let grid = state.grid();
        if parallel {
            (0..width)
                .into_par_iter()
                .map(|x| run_starts(grid, x, threshold))
                .collect()
        } else {
            (0..width).map(|x| run_starts(grid, x, threshold)).collect()
        }
    };

    let height = state.height();
    let mut created = 0;
    for (x, starts) in column_runs.iter().enumerate() {
        for (run, &first) in starts.iter().enumerate() {
            let end = starts.get(run + 1).copied().unwrap_or(height);
            let id = state.open_region(Point::new(x, first));
            for y in first + 1..end {
                state.extend_region(id, Point::new(x, y));
            }
            created += 1;
        }
    }

    debug!(
        "column pass: {} regions over {} columns in {:?}",
        created,
        width,
        start.elapsed()
    );
    created
}

/// Rows at which a new run begins in column `x`.
///
/// The anchor is always the previous pixel, so a run ends as soon as two
/// consecutive pixels differ by more than `threshold`.
fn run_starts(grid: &LabGrid, x: usize, threshold: f64) -> Vec<usize> {
    if grid.height() == 0 {
        return Vec::new();
    }

    let mut starts = vec![0];
    for y in 1..grid.height() {
        if grid.distance((x, y - 1), (x, y)) > threshold {
            starts.push(y);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::test_support::state;

    #[test]
    fn test_single_column_runs() {
        // Gradual drift stays in one run; the jump to 50 opens a new one
        let mut state = state(&[&[0.0], &[4.0], &[8.0], &[50.0], &[52.0]]);
        let created = build_column_regions(&mut state, false);

        assert_eq!(created, 2);
        assert_eq!(state.region_of(0, 0), Some(0));
        assert_eq!(state.region_of(0, 2), Some(0));
        assert_eq!(state.region_of(0, 3), Some(1));
        assert_eq!(state.region_of(0, 4), Some(1));
        assert_eq!(state.members(0).unwrap().len(), 3);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_ids_increase_across_columns() {
        let mut state = state(&[&[0.0, 0.0, 90.0], &[90.0, 0.0, 90.0]]);
        let created = build_column_regions(&mut state, false);

        assert_eq!(created, 4);
        // column 0: {0}, {1}; column 1: {2}; column 2: {3}
        assert_eq!(state.region_of(0, 0), Some(0));
        assert_eq!(state.region_of(0, 1), Some(1));
        assert_eq!(state.region_of(1, 0), Some(2));
        assert_eq!(state.region_of(1, 1), Some(2));
        assert_eq!(state.region_of(2, 1), Some(3));
    }

    #[test]
    fn test_regions_are_column_local() {
        // Identical colors in neighbouring columns still get separate ids
        let mut state = state(&[&[20.0, 20.0], &[20.0, 20.0]]);
        build_column_regions(&mut state, false);
        assert_ne!(state.region_of(0, 0), state.region_of(1, 0));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rows: Vec<Vec<f64>> = (0..7)
            .map(|y| (0..9).map(|x| ((x * 7 + y * 13) % 5) as f64 * 4.0).collect())
            .collect();
        let rows: Vec<&[f64]> = rows.iter().map(Vec::as_slice).collect();

        let mut sequential = state(&rows);
        let mut parallel = state(&rows);
        build_column_regions(&mut sequential, false);
        build_column_regions(&mut parallel, true);

        assert_eq!(sequential.lookup(), parallel.lookup());
    }

    #[test]
    fn test_empty_grid() {
        let mut state = state(&[]);
        assert_eq!(build_column_regions(&mut state, false), 0);
        assert_eq!(state.region_count(), 0);
    }
}
