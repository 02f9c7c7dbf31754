//! Row merging
//!
//! Walks every row left to right and unions the regions of horizontally
//! adjacent pixels whose colors are within the threshold. Only unions are
//! performed; regions are never split.

use log::debug;
use std::time::Instant;

use super::{DisjointSet, Point, SegmentationState};
use crate::config::MergeStrategy;

/// Union column regions across horizontal neighbours.
///
/// For each pixel after the first of its row, the anchor is its left
/// neighbour. When the two are within threshold, the region owning the
/// current pixel is absorbed into the region owning the anchor. Both
/// strategies leave identical ids in the reverse lookup.
///
/// # Returns
///
/// Number of unions that joined two distinct regions
pub fn merge_rows(state: &mut SegmentationState, strategy: MergeStrategy) -> usize {
    let start = Instant::now();
    let before = state.region_count();

    let merges = match strategy {
        MergeStrategy::MemberList => merge_member_lists(state),
        MergeStrategy::DisjointSet => merge_disjoint_sets(state),
    };

    debug!(
        "row pass ({:?}): {} merges, {} -> {} regions in {:?}",
        strategy,
        merges,
        before,
        state.region_count(),
        start.elapsed()
    );
    debug_assert!(state.is_consistent());
    merges
}

/// Reference merge: relabel every member of the absorbed region immediately.
///
/// Cost is proportional to the size of the absorbed region, so long
/// gradients can approach `width * height` work per row.
fn merge_member_lists(state: &mut SegmentationState) -> usize {
    let mut merges = 0;
    for_each_linked_pair(state, |state, anchor, next| {
        if state.absorb(anchor, next) {
            merges += 1;
        }
    });
    merges
}

/// Union-find merge; the lookup is rewritten once after the whole pass.
fn merge_disjoint_sets(state: &mut SegmentationState) -> usize {
    let mut sets = DisjointSet::new(state.id_bound() as usize);
    let mut merges = 0;

    // Lookup entries keep their column-pass ids until the final relabel
    for_each_linked_pair(state, |state, anchor, next| {
        let (Some(keep), Some(absorbed)) = (
            state.region_of(anchor.x, anchor.y),
            state.region_of(next.x, next.y),
        ) else {
            return;
        };
        if sets.union_into(keep, absorbed) {
            merges += 1;
        }
    });

    state.relabel(|id| sets.find(id));
    merges
}

/// Visit every horizontally adjacent pair within threshold, row by row
fn for_each_linked_pair(
    state: &mut SegmentationState,
    mut visit: impl FnMut(&mut SegmentationState, Point, Point),
) {
    for y in 0..state.height() {
        for x in 1..state.width() {
            let anchor = Point::new(x - 1, y);
            let next = Point::new(x, y);
            if state.within_threshold(anchor, next) {
                visit(state, anchor, next);
            }
        }
    }
}
