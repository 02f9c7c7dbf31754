//! Border detection
//!
//! Two read-only passes over the final reverse lookup: rows left to right,
//! then columns top to bottom. Wherever the region id changes between
//! consecutive pixels, both pixels are flagged. The result is the union of
//! both passes.
//!
//! Every line starts from a "no region" sentinel, so its first pixel is
//! always a transition. That transition is recorded in a dedicated slot for
//! the coordinate one before the start of the line (x = -1 for rows,
//! y = -1 for columns) and never reaches the in-range flags unless edge
//! framing is requested.

use log::debug;
use std::time::Instant;

use super::{Point, RegionId, SegmentationState};

/// Border flags for every pixel plus the out-of-range origin slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderMap {
    width: usize,
    height: usize,
    flags: Vec<bool>,
    /// Slot (-1, y) for each row
    row_origins: Vec<bool>,
    /// Slot (x, -1) for each column
    column_origins: Vec<bool>,
}

impl BorderMap {
    /// An all-false map
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            flags: vec![false; width * height],
            row_origins: vec![false; height],
            column_origins: vec![false; width],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the in-range pixel (x, y) is on a border
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.flags[y * self.width + x]
    }

    /// Number of flagged in-range pixels
    pub fn flagged_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Number of flagged origin slots
    pub fn sentinel_count(&self) -> usize {
        self.row_origins.iter().chain(&self.column_origins).filter(|&&f| f).count()
    }

    /// Flagged in-range pixels in row-major order
    pub fn flagged_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| Point::new(i % self.width, i / self.width))
    }

    /// Merge another map of the same size into this one
    pub fn union_with(&mut self, other: &BorderMap) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        let pairs = [
            (&mut self.flags, &other.flags),
            (&mut self.row_origins, &other.row_origins),
            (&mut self.column_origins, &other.column_origins),
        ];
        for (mine, theirs) in pairs {
            for (a, &b) in mine.iter_mut().zip(theirs) {
                *a |= b;
            }
        }
    }

    fn flag(&mut self, x: usize, y: usize) {
        self.flags[y * self.width + x] = true;
    }
}

/// Flag every pixel adjacent to a pixel of another region.
///
/// With `frame_edges` the start-of-line transition also flags the first
/// pixel of every row and column. With `parallel` the row and column
/// passes run concurrently on the rayon pool.
pub fn detect_borders(state: &SegmentationState, frame_edges: bool, parallel: bool) -> BorderMap {
    let start = Instant::now();

    let (mut borders, column_borders) = if parallel {
        rayon::join(
            || scan_rows(state, frame_edges),
            || scan_columns(state, frame_edges),
        )
    } else {
        (scan_rows(state, frame_edges), scan_columns(state, frame_edges))
    };
    borders.union_with(&column_borders);

    debug!(
        "border pass: {} pixels flagged ({} origin slots) in {:?}",
        borders.flagged_count(),
        borders.sentinel_count(),
        start.elapsed()
    );
    borders
}

fn scan_rows(state: &SegmentationState, frame_edges: bool) -> BorderMap {
    let mut map = BorderMap::new(state.width(), state.height());
    for y in 0..state.height() {
        let line = (0..state.width()).map(|x| state.region_of(x, y));
        for_each_transition(line, |x| {
            if x == 0 {
                map.row_origins[y] = true;
                if frame_edges {
                    map.flag(0, y);
                }
            } else {
                map.flag(x, y);
                map.flag(x - 1, y);
            }
        });
    }
    map
}

fn scan_columns(state: &SegmentationState, frame_edges: bool) -> BorderMap {
    let mut map = BorderMap::new(state.width(), state.height());
    for x in 0..state.width() {
        let line = (0..state.height()).map(|y| state.region_of(x, y));
        for_each_transition(line, |y| {
            if y == 0 {
                map.column_origins[x] = true;
                if frame_edges {
                    map.flag(x, 0);
                }
            } else {
                map.flag(x, y);
                map.flag(x, y - 1);
            }
        });
    }
    map
}

/// Call `on_transition(i)` for every position whose id differs from the
/// one before it; the id before position 0 is "no region".
fn for_each_transition(
    line: impl Iterator<Item = Option<RegionId>>,
    mut on_transition: impl FnMut(usize),
) {
    let mut current = None;
    for (i, next) in line.enumerate() {
        if i == 0 || next != current {
            on_transition(i);
        }
        current = next;
    }
}
