//! Union-find over region ids.
//!
//! `union_into(keep, absorbed)` always makes `keep`'s root the root of the
//! joined set, so the root of a set is the same id the member-list merge
//! would leave on its pixels.

use super::RegionId;

#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<RegionId>,
}

impl DisjointSet {
    /// `len` singleton sets, ids `0..len`
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len as RegionId).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the set containing `id`, halving the path on the way up
    pub fn find(&mut self, mut id: RegionId) -> RegionId {
        while self.parent[id as usize] != id {
            let grandparent = self.parent[self.parent[id as usize] as usize];
            self.parent[id as usize] = grandparent;
            id = grandparent;
        }
        id
    }

    /// Join the sets of `keep` and `absorbed` under `keep`'s root.
    ///
    /// Returns `false` if they were already joined.
    pub fn union_into(&mut self, keep: RegionId, absorbed: RegionId) -> bool {
        let keep_root = self.find(keep);
        let absorbed_root = self.find(absorbed);
        if keep_root == absorbed_root {
            return false;
        }
        self.parent[absorbed_root as usize] = keep_root;
        true
    }
}
