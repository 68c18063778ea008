//! Merge table: which addresses belong to which merged region.
//!
//! The table maintains two views of the same facts: a per-address membership
//! map and an ordered set of distinct regions in first-seen order. The
//! ordered set is what integer indexing and [`regions`](MergeTable::regions)
//! listing run against.
//!
//! # Overlap policy
//!
//! Merging a region that touches cells of a previously recorded region
//! *fully re-absorbs* the prior region: every one of its member cells
//! reverts to unmerged before the new region is recorded. The closure
//! property (every address inside a recorded region resolves to that
//! region) therefore holds unconditionally, and no region can be left
//! stranded with part of its extent reassigned.

use crate::error::{GridError, Result};
use crate::geometry::{GridAddress, Region};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Records merged regions and resolves addresses or indices to them.
#[derive(Debug, Default, Clone)]
pub struct MergeTable {
    cells: FxHashMap<GridAddress, Region>,
    regions: IndexSet<Region>,
}

impl MergeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `region` as merged, re-absorbing any prior region it touches.
    ///
    /// A 1x1 region is recorded like any other and shows up in
    /// [`regions`](Self::regions); only cells never named in a merge call
    /// are excluded from the listing.
    pub fn merge(&mut self, region: Region) {
        for addr in region.addresses() {
            if let Some(prior) = self.cells.get(&addr).copied() {
                if prior != region {
                    debug!(?prior, new = ?region, "merge re-absorbs overlapping region");
                    for member in prior.addresses() {
                        self.cells.remove(&member);
                    }
                    self.regions.shift_remove(&prior);
                }
            }
        }
        for addr in region.addresses() {
            self.cells.insert(addr, region);
        }
        self.regions.insert(region);
    }

    /// Apply [`merge`](Self::merge) to each region in order.
    pub fn merge_bulk(&mut self, regions: impl IntoIterator<Item = Region>) {
        for region in regions {
            self.merge(region);
        }
    }

    /// Region containing `addr`, or the trivial single-cell region if the
    /// address was never merged.
    pub fn resolve(&self, addr: GridAddress) -> Region {
        self.cells
            .get(&addr)
            .copied()
            .unwrap_or_else(|| Region::single(addr))
    }

    /// The `index`-th distinct region in first-seen order.
    pub fn resolve_index(&self, index: usize) -> Result<Region> {
        self.regions
            .get_index(index)
            .copied()
            .ok_or(GridError::IndexOutOfRange {
                index,
                len: self.regions.len(),
            })
    }

    /// Distinct recorded regions in first-seen insertion order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Number of distinct recorded regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no merges have been recorded.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Position of `region` in first-seen order, if it is recorded.
    pub fn index_of(&self, region: &Region) -> Option<usize> {
        self.regions.get_index_of(region)
    }
}
