//! Grid facade: cell and merge management, text placement, image pasting,
//! dimension queries, border drawing, and the debug layout view.
//!
//! A [`Grid`] is constructed once with fixed row/column counts and margins;
//! merges and pixel-cache mutations accumulate monotonically over its
//! lifetime, and it is discarded rather than reset when a new layout is
//! needed. It owns its merge table and pixel cache exclusively; no internal
//! synchronization is provided (one render pass builds one image).

use crate::cache::PixelCache;
use crate::error::{GridError, Result};
use crate::fit::{fit_to_box, tallest_fitting_height};
use crate::geometry::{CellGeometry, GridAddress, PixelRect, Region};
use crate::merge::MergeTable;
use crate::style::{Anchor, HAnchor, Rgb, TextSpec, VAnchor};
use crate::surface::Surface;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::debug;

/// A placement target: either a grid address or the index of a merged
/// region in first-seen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRef {
    /// A `(row, col)` address.
    Address(GridAddress),
    /// Index into the distinct merged-region list.
    Merged(usize),
}

impl From<GridAddress> for CellRef {
    fn from(addr: GridAddress) -> Self {
        Self::Address(addr)
    }
}

impl From<(u32, u32)> for CellRef {
    fn from(pair: (u32, u32)) -> Self {
        Self::Address(pair.into())
    }
}

impl From<usize> for CellRef {
    fn from(index: usize) -> Self {
        Self::Merged(index)
    }
}

/// Resolved span and pixel extent of a cell or merged region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Top-left address of the span.
    pub start: GridAddress,
    /// Bottom-right address of the span.
    pub end: GridAddress,
    /// Left pixel coordinate.
    pub x: i32,
    /// Top pixel coordinate.
    pub y: i32,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// Outcome of a `set_text` call: measured extent and chosen font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFit {
    /// Measured text width at the chosen size.
    pub width: u32,
    /// Measured text height at the chosen size.
    pub height: u32,
    /// Font size selected by the growth search.
    pub font_size: u32,
}

/// Rectangular partition of a canvas into addressable, mergeable cells.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: u32,
    cols: u32,
    margin_y: u32,
    merges: MergeTable,
    cache: PixelCache,
}

impl Grid {
    /// Create a `rows x cols` grid over a canvas, without margins.
    pub fn new(rows: u32, cols: u32, canvas_width: u32, canvas_height: u32) -> Result<Self> {
        Self::with_margins(rows, cols, canvas_width, canvas_height, 0, 0)
    }

    /// Create a grid with per-cell margins (applied on all four sides).
    pub fn with_margins(
        rows: u32,
        cols: u32,
        canvas_width: u32,
        canvas_height: u32,
        margin_x: u32,
        margin_y: u32,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidArgument(format!(
                "grid must have at least one row and column, got {rows}x{cols}"
            )));
        }
        let geometry =
            CellGeometry::new(canvas_width, canvas_height, rows, cols, margin_x, margin_y);
        Ok(Self {
            rows,
            cols,
            margin_y,
            merges: MergeTable::new(),
            cache: PixelCache::new(geometry),
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Real-valued cell width.
    pub fn cell_width(&self) -> f64 {
        self.cache.geometry().cell_width()
    }

    /// Real-valued cell height.
    pub fn cell_height(&self) -> f64 {
        self.cache.geometry().cell_height()
    }

    /// Merge the cells spanning `start..=end` into one region.
    ///
    /// Overlapping prior regions are fully re-absorbed; see
    /// [`MergeTable::merge`].
    pub fn merge(
        &mut self,
        start: impl Into<GridAddress>,
        end: impl Into<GridAddress>,
    ) -> Result<()> {
        let region = Region::new(start, end);
        self.check_address(region.start)?;
        self.check_address(region.end)?;
        self.merges.merge(region);
        Ok(())
    }

    /// Apply [`merge`](Self::merge) to each span in order.
    pub fn merge_bulk(
        &mut self,
        spans: impl IntoIterator<Item = (GridAddress, GridAddress)>,
    ) -> Result<()> {
        for (start, end) in spans {
            self.merge(start, end)?;
        }
        Ok(())
    }

    /// Distinct merged regions in first-seen order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.merges.regions()
    }

    /// Number of distinct merged regions.
    pub fn region_count(&self) -> usize {
        self.merges.len()
    }

    /// Resolve a target to its region: merged-region membership for an
    /// address, list lookup for an index.
    pub fn resolve(&self, target: impl Into<CellRef>) -> Result<Region> {
        self.resolve_span(target.into(), None)
    }

    fn resolve_span(&self, target: CellRef, end: Option<GridAddress>) -> Result<Region> {
        match (target, end) {
            (CellRef::Address(start), Some(end)) => {
                self.check_address(start)?;
                self.check_address(end)?;
                Ok(Region::new(start, end))
            }
            (CellRef::Address(addr), None) => {
                self.check_address(addr)?;
                Ok(self.merges.resolve(addr))
            }
            (CellRef::Merged(index), None) => self.merges.resolve_index(index),
            (CellRef::Merged(_), Some(_)) => Err(GridError::InvalidArgument(
                "an explicit end requires an address start, not a merged index".into(),
            )),
        }
    }

    fn check_address(&self, addr: GridAddress) -> Result<()> {
        if addr.row >= self.rows || addr.col >= self.cols {
            return Err(GridError::InvalidArgument(format!(
                "address ({}, {}) outside {}x{} grid",
                addr.row, addr.col, self.rows, self.cols
            )));
        }
        Ok(())
    }

    /// Pixel rectangle of a region: the union of its member cells' cached
    /// rectangles.
    pub fn region_rect(&mut self, region: &Region) -> Result<PixelRect> {
        self.cache.region_rect(region)
    }

    /// Resolved span and pixel extent of a target.
    pub fn dimensions(
        &mut self,
        target: impl Into<CellRef>,
        end: Option<GridAddress>,
    ) -> Result<Dimensions> {
        let region = self.resolve_span(target.into(), end)?;
        let rect = self.cache.region_rect(&region)?;
        Ok(Dimensions {
            start: region.start,
            end: region.end,
            x: rect.x1,
            y: rect.y1,
            width: rect.width() as u32,
            height: rect.height() as u32,
        })
    }

    /// Place text in a cell or merged span, growing the font to the largest
    /// size that fits the span's rectangle.
    ///
    /// The font is rebuilt through the collaborator at each probed size;
    /// the final measured extent and chosen size are returned. A missing
    /// `start` target is a contract violation. On error nothing has been
    /// drawn and the pixel cache is unchanged.
    pub fn set_text<S: Surface>(&mut self, surface: &mut S, spec: &TextSpec) -> Result<TextFit> {
        let target = spec.start.ok_or_else(|| {
            GridError::InvalidArgument("set_text requires a start target".into())
        })?;
        let region = self.resolve_span(target, spec.end)?;
        let rect = self.cache.region_rect(&region)?;

        let font_name = spec.font.as_deref();
        let variation = spec.variation.as_deref();
        let font_size = fit_to_box(
            |size| {
                let font = surface.build_font(font_name, size, variation);
                surface.measure(&spec.text, &font)
            },
            rect.width() as u32,
            rect.height() as u32,
        );

        let font = surface.build_font(font_name, font_size, variation);
        let (width, height) = surface.measure(&spec.text, &font);
        let at = spec.anchor.position_in(&rect);
        surface.draw_text(&spec.text, at, &font, spec.anchor, &spec.style);
        debug!(?region, font_size, width, height, "placed text");

        Ok(TextFit {
            width,
            height,
            font_size,
        })
    }

    /// Apply [`set_text`](Self::set_text) to each spec in order, stopping at
    /// the first error.
    pub fn set_text_batch<S: Surface>(
        &mut self,
        surface: &mut S,
        specs: &[TextSpec],
    ) -> Result<()> {
        for spec in specs {
            self.set_text(surface, spec)?;
        }
        Ok(())
    }

    /// Paste an image into a cell or merged span, aligning its box inside
    /// the span's rectangle per `anchor`.
    pub fn paste_image<S: Surface>(
        &mut self,
        surface: &mut S,
        target: impl Into<CellRef>,
        image: &S::Image,
        end: Option<GridAddress>,
        anchor: Anchor,
    ) -> Result<()> {
        let region = self.resolve_span(target.into(), end)?;
        let rect = self.cache.region_rect(&region)?;
        let (iw, ih) = surface.image_size(image);
        let (iw, ih) = (iw as i32, ih as i32);
        let x = match anchor.h {
            HAnchor::Left => rect.x1,
            HAnchor::Middle => (rect.x1 + rect.x2) / 2 - iw / 2,
            HAnchor::Right => rect.x2 - iw,
        };
        let y = match anchor.v {
            VAnchor::Top => rect.y1,
            VAnchor::Middle => (rect.y1 + rect.y2) / 2 - ih / 2,
            VAnchor::Bottom => rect.y2 - ih,
        };
        surface.paste(image, (x, y));
        Ok(())
    }

    /// Pixel height needed to fit `text` on one line across the resolved
    /// span's full width, margins included. Returns 0 for empty text.
    ///
    /// Binary search over font sizes in `[4, 300]`; see
    /// [`tallest_fitting_height`].
    pub fn required_row_height<S: Surface>(
        &mut self,
        surface: &mut S,
        target: impl Into<CellRef>,
        text: &str,
        end: Option<GridAddress>,
        font_name: Option<&str>,
        variation: Option<&str>,
    ) -> Result<u32> {
        if text.is_empty() {
            return Ok(0);
        }
        let region = self.resolve_span(target.into(), end)?;
        let rect = self.cache.region_rect(&region)?;
        let best_height = tallest_fitting_height(
            |size| {
                let font = surface.build_font(font_name, size, variation);
                surface.measure(text, &font)
            },
            rect.width() as u32,
        );
        Ok(best_height + 2 * self.margin_y)
    }

    /// Shift the outer-facing edges of a target's region by pixel deltas.
    ///
    /// Positive deltas expand outward (`dx1` left, `dy1` up, `dx2` right,
    /// `dy2` down); negative deltas shrink. See [`PixelCache::adjust_edges`].
    pub fn adjust_region(
        &mut self,
        target: impl Into<CellRef>,
        dx1: i32,
        dy1: i32,
        dx2: i32,
        dy2: i32,
    ) -> Result<()> {
        let region = self.resolve_span(target.into(), None)?;
        debug!(?region, dx1, dy1, dx2, dy2, "adjusting region edges");
        self.cache.adjust_edges(&region, dx1, dy1, dx2, dy2)
    }

    /// Move the top and/or bottom edge of every region touching `row`.
    ///
    /// Sign convention: positive deltas move the edge downward for both
    /// parameters: `delta_top > 0` shrinks the row from above,
    /// `delta_bottom > 0` grows it below. A region's top edge moves only if
    /// the region starts in `row`, its bottom edge only if it ends there,
    /// and a region spanning several columns of the row is adjusted at most
    /// once.
    pub fn adjust_row_height(&mut self, row: u32, delta_top: i32, delta_bottom: i32) -> Result<()> {
        if row >= self.rows {
            return Err(GridError::InvalidArgument(format!(
                "row {row} outside {} rows",
                self.rows
            )));
        }
        if delta_top == 0 && delta_bottom == 0 {
            return Ok(());
        }

        let mut adjusted: SmallVec<[Region; 8]> = SmallVec::new();
        for col in 0..self.cols {
            let region = self.merges.resolve(GridAddress::new(row, col));
            if adjusted.contains(&region) {
                continue;
            }
            adjusted.push(region);

            let dy1 = if region.start.row == row { -delta_top } else { 0 };
            let dy2 = if region.end.row == row { delta_bottom } else { 0 };
            if dy1 != 0 || dy2 != 0 {
                self.cache.adjust_edges(&region, 0, dy1, 0, dy2)?;
            }
        }
        Ok(())
    }

    /// Stroke the boundary of every distinct region exactly once, visiting
    /// each address once regardless of how many cells a region spans.
    pub fn draw_borders<S: Surface>(
        &mut self,
        surface: &mut S,
        color: Rgb,
        width: u32,
    ) -> Result<()> {
        let mut visited: FxHashSet<GridAddress> = FxHashSet::default();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let addr = GridAddress::new(row, col);
                if visited.contains(&addr) {
                    continue;
                }
                let region = self.merges.resolve(addr);
                visited.extend(region.addresses());
                let rect = self.cache.region_rect(&region)?;
                surface.stroke_rect(rect, color, width);
            }
        }
        Ok(())
    }

    /// Debug view of the merge layout: one token per cell, the region's
    /// first-seen index for merged cells and `.` for unmerged ones.
    pub fn layout_string(&self) -> String {
        let width = match self.merges.len() {
            0..=10 => 1,
            n => (n - 1).to_string().len(),
        };
        let mut out = String::new();
        for row in 0..self.rows {
            if row > 0 {
                out.push('\n');
            }
            for col in 0..self.cols {
                if col > 0 {
                    out.push(' ');
                }
                let addr = GridAddress::new(row, col);
                let token = match self.merges.index_of(&self.merges.resolve(addr)) {
                    Some(index) => index.to_string(),
                    None => ".".to_string(),
                };
                out.push_str(&format!("{token:>width$}"));
            }
        }
        out
    }
}
