//! Pixel cache and region mutator.
//!
//! Every cell's pixel rectangle is computed from [`CellGeometry`] exactly
//! once, on first access, and cached under an integer-encoded address key.
//! From then on the cached value is authoritative: edge adjustments mutate
//! it in place, and region queries take the union of member-cell rectangles
//! rather than recomputing from the formula. The union is the only region
//! conversion kept; a closed-form corner formula would disagree with the
//! cache as soon as any cell had been adjusted.
//!
//! Mutations are append/overwrite only. Memory is bounded by `rows x cols`.

use crate::error::{GridError, Result};
use crate::geometry::{CellGeometry, GridAddress, PixelRect, Region};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

/// Lazily populated map from grid address to (possibly mutated) pixel rect.
#[derive(Debug, Clone)]
pub struct PixelCache {
    geometry: CellGeometry,
    rects: FxHashMap<u64, PixelRect>,
}

impl PixelCache {
    /// Create an empty cache backed by `geometry`.
    pub fn new(geometry: CellGeometry) -> Self {
        Self {
            geometry,
            rects: FxHashMap::default(),
        }
    }

    /// The formula this cache falls back to on first access.
    pub fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    /// Rectangle of a single cell, computing and caching it on first access.
    ///
    /// An inverted rectangle (degenerate margins, or a prior adjustment that
    /// crossed the edges over) is rejected without being cached.
    pub fn rect(&mut self, addr: GridAddress) -> Result<PixelRect> {
        let key = addr.encode();
        if let Some(rect) = self.rects.get(&key) {
            return checked(*rect);
        }
        let rect = checked(self.geometry.cell_rect(addr))?;
        trace!(?addr, ?rect, "materialized cell rect");
        self.rects.insert(key, rect);
        Ok(rect)
    }

    /// Union of the member-cell rectangles of `region`.
    ///
    /// Fresh cells are validated before anything is committed to the cache,
    /// so a failing query leaves the cache exactly as it was.
    pub fn region_rect(&mut self, region: &Region) -> Result<PixelRect> {
        let mut fresh: SmallVec<[(u64, PixelRect); 8]> = SmallVec::new();
        let mut union: Option<PixelRect> = None;

        for addr in region.addresses() {
            let key = addr.encode();
            let rect = match self.rects.get(&key) {
                Some(rect) => *rect,
                None => {
                    let rect = self.geometry.cell_rect(addr);
                    fresh.push((key, rect));
                    rect
                }
            };
            checked(rect)?;
            union = Some(match union {
                Some(u) => u.union(&rect),
                None => rect,
            });
        }

        for (key, rect) in fresh {
            self.rects.insert(key, rect);
        }
        // A region spans at least one address by construction.
        union.ok_or_else(|| GridError::InvalidArgument("empty region".into()))
    }

    /// Shift the outer-facing edges of `region` by the given deltas.
    ///
    /// Sign convention: positive deltas expand outward. `dx1` moves the left
    /// edge left, `dy1` the top edge up, `dx2` the right edge right, `dy2`
    /// the bottom edge down; negative deltas shrink correspondingly. Only
    /// cells on the region's perimeter rows/columns are touched; interior
    /// boundaries inside a merged region stay as they are (they become
    /// irrelevant once the region is queried as a union).
    ///
    /// The adjustment itself never fails once the perimeter cells exist;
    /// an adjustment that inverts a rectangle surfaces as
    /// [`GridError::GeometryInconsistency`] on the next query of it.
    pub fn adjust_edges(
        &mut self,
        region: &Region,
        dx1: i32,
        dy1: i32,
        dx2: i32,
        dy2: i32,
    ) -> Result<()> {
        let (start, end) = (region.start, region.end);

        // Materialize (and validate) every touched cell before mutating any,
        // so a degenerate-geometry error cannot leave a half-applied edit.
        if dy1 != 0 || dy2 != 0 {
            for col in start.col..=end.col {
                if dy1 != 0 {
                    self.rect(GridAddress::new(start.row, col))?;
                }
                if dy2 != 0 {
                    self.rect(GridAddress::new(end.row, col))?;
                }
            }
        }
        if dx1 != 0 || dx2 != 0 {
            for row in start.row..=end.row {
                if dx1 != 0 {
                    self.rect(GridAddress::new(row, start.col))?;
                }
                if dx2 != 0 {
                    self.rect(GridAddress::new(row, end.col))?;
                }
            }
        }

        if dy1 != 0 {
            for col in start.col..=end.col {
                if let Some(rect) = self.rects.get_mut(&GridAddress::new(start.row, col).encode()) {
                    rect.y1 -= dy1;
                }
            }
        }
        if dy2 != 0 {
            for col in start.col..=end.col {
                if let Some(rect) = self.rects.get_mut(&GridAddress::new(end.row, col).encode()) {
                    rect.y2 += dy2;
                }
            }
        }
        if dx1 != 0 {
            for row in start.row..=end.row {
                if let Some(rect) = self.rects.get_mut(&GridAddress::new(row, start.col).encode()) {
                    rect.x1 -= dx1;
                }
            }
        }
        if dx2 != 0 {
            for row in start.row..=end.row {
                if let Some(rect) = self.rects.get_mut(&GridAddress::new(row, end.col).encode()) {
                    rect.x2 += dx2;
                }
            }
        }
        Ok(())
    }
}

fn checked(rect: PixelRect) -> Result<PixelRect> {
    if rect.is_inverted() {
        Err(GridError::GeometryInconsistency { rect })
    } else {
        Ok(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_4x4() -> PixelCache {
        PixelCache::new(CellGeometry::new(480, 280, 4, 4, 0, 0))
    }

    #[test]
    fn test_single_cell_rect() {
        let mut cache = cache_4x4();
        assert_eq!(
            cache.rect(GridAddress::new(0, 0)).unwrap(),
            PixelRect::new(0, 0, 120, 70)
        );
    }

    #[test]
    fn test_region_union_matches_corner_cells() {
        let mut cache = cache_4x4();
        let rect = cache.region_rect(&Region::new((0, 0), (0, 3))).unwrap();
        assert_eq!(rect, PixelRect::new(0, 0, 480, 70));

        let rect = cache.region_rect(&Region::new((1, 1), (1, 2))).unwrap();
        assert_eq!(rect, PixelRect::new(120, 70, 360, 140));
    }

    #[test]
    fn test_adjust_single_cell_outward() {
        let mut cache = cache_4x4();
        let region = Region::single((0, 0));
        cache.adjust_edges(&region, 10, 5, 10, 5).unwrap();
        assert_eq!(
            cache.rect(GridAddress::new(0, 0)).unwrap(),
            PixelRect::new(-10, -5, 130, 75)
        );
    }

    #[test]
    fn test_adjust_negative_deltas_shrink() {
        let mut cache = cache_4x4();
        let region = Region::single((1, 1));
        cache.adjust_edges(&region, -10, -5, -10, -5).unwrap();
        assert_eq!(
            cache.rect(GridAddress::new(1, 1)).unwrap(),
            PixelRect::new(130, 75, 230, 135)
        );
    }

    #[test]
    fn test_adjust_merged_region_moves_outer_edges_only() {
        let mut cache = cache_4x4();
        let region = Region::new((1, 1), (2, 2));
        cache.adjust_edges(&region, 20, 15, 20, 15).unwrap();
        assert_eq!(
            cache.region_rect(&region).unwrap(),
            PixelRect::new(100, 55, 380, 225)
        );
        // Interior edge of (1, 1) untouched: its right boundary is not the
        // region's right column.
        assert_eq!(
            cache.rect(GridAddress::new(1, 1)).unwrap(),
            PixelRect::new(100, 55, 240, 140)
        );
    }

    #[test]
    fn test_union_reflects_prior_mutation() {
        let mut cache = cache_4x4();
        cache.adjust_edges(&Region::single((0, 0)), 10, 0, 0, 0).unwrap();
        let rect = cache.region_rect(&Region::new((0, 0), (0, 1))).unwrap();
        assert_eq!(rect, PixelRect::new(-10, 0, 240, 70));
    }

    #[test]
    fn test_degenerate_margins_rejected_not_cached() {
        let mut cache = PixelCache::new(CellGeometry::new(480, 280, 4, 4, 70, 0));
        let err = cache.rect(GridAddress::new(0, 0)).unwrap_err();
        assert!(matches!(err, GridError::GeometryInconsistency { .. }));
        assert!(cache.rects.is_empty());
    }

    #[test]
    fn test_inverting_adjustment_surfaces_on_next_query() {
        let mut cache = cache_4x4();
        let region = Region::single((0, 0));
        cache.adjust_edges(&region, -100, 0, -100, 0).unwrap();
        let err = cache.rect(GridAddress::new(0, 0)).unwrap_err();
        assert!(matches!(err, GridError::GeometryInconsistency { .. }));
    }

    #[test]
    fn test_failed_region_query_commits_nothing() {
        let mut cache = PixelCache::new(CellGeometry::new(480, 280, 4, 4, 70, 0));
        assert!(cache.region_rect(&Region::new((0, 0), (0, 3))).is_err());
        assert!(cache.rects.is_empty());
    }
}
