//! Core geometry types and the cell-to-pixel formula.
//!
//! A canvas is partitioned into `rows x cols` cells of real-valued size
//! `canvas / count`; truncation to integer pixels happens per cell at
//! rectangle construction, so rounding error never compounds across cells.
//! With no margins, neighboring rectangles share edges with no gap; the
//! grid's outer edge may fall short of the canvas boundary by at most one
//! pixel of truncation per cell.

/// Address of one atomic cell: `(row, col)`, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridAddress {
    /// Row index, `0 <= row < rows`.
    pub row: u32,
    /// Column index, `0 <= col < cols`.
    pub col: u32,
}

impl GridAddress {
    /// Create an address from row and column indices.
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Pack into a single integer key for cache maps.
    pub(crate) const fn encode(self) -> u64 {
        ((self.row as u64) << 32) | self.col as u64
    }
}

impl From<(u32, u32)> for GridAddress {
    fn from((row, col): (u32, u32)) -> Self {
        Self::new(row, col)
    }
}

/// A rectangular span of one or more grid addresses.
///
/// Invariant: `start.row <= end.row` and `start.col <= end.col`; the
/// constructor normalizes corner order. A single cell is a region where
/// `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Top-left address of the span.
    pub start: GridAddress,
    /// Bottom-right address of the span (inclusive).
    pub end: GridAddress,
}

impl Region {
    /// Create a region spanning `start..=end`, normalizing corner order.
    pub fn new(start: impl Into<GridAddress>, end: impl Into<GridAddress>) -> Self {
        let (a, b) = (start.into(), end.into());
        Self {
            start: GridAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: GridAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Region covering exactly one cell.
    pub fn single(addr: impl Into<GridAddress>) -> Self {
        let addr = addr.into();
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Whether this region covers exactly one cell.
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Whether `addr` lies inside the span.
    pub fn contains(&self, addr: GridAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Iterate every address in the span, row-major.
    pub fn addresses(&self) -> impl Iterator<Item = GridAddress> + '_ {
        let (start, end) = (self.start, self.end);
        (start.row..=end.row)
            .flat_map(move |row| (start.col..=end.col).map(move |col| GridAddress::new(row, col)))
    }

    /// Number of cells in the span.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.end.row - self.start.row + 1) * u64::from(self.end.col - self.start.col + 1)
    }
}

/// Pixel rectangle in top-left/bottom-right convention.
///
/// Coordinates are signed: edge mutation may legitimately push a rectangle
/// past the canvas origin. A rectangle with `x1 > x2` or `y1 > y2` is
/// *inverted* and is rejected by queries with
/// [`GridError::GeometryInconsistency`](crate::GridError::GeometryInconsistency).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge.
    pub x1: i32,
    /// Top edge.
    pub y1: i32,
    /// Right edge.
    pub x2: i32,
    /// Bottom edge.
    pub y2: i32,
}

impl PixelRect {
    /// Create a rectangle from its corner coordinates.
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width in pixels. Negative only for inverted rectangles.
    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Height in pixels. Negative only for inverted rectangles.
    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Whether the start corner lies past the end corner on either axis.
    pub const fn is_inverted(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }
}

/// The cell-to-pixel formula: canvas size, grid shape, per-cell margins.
///
/// Pure and stateless; the pixel cache consults it exactly once per address
/// and is authoritative afterwards.
#[derive(Debug, Clone, Copy)]
pub struct CellGeometry {
    canvas_width: u32,
    canvas_height: u32,
    rows: u32,
    cols: u32,
    margin_x: u32,
    margin_y: u32,
}

impl CellGeometry {
    /// Create the formula for a `rows x cols` partition of the canvas.
    ///
    /// Callers guarantee `rows > 0 && cols > 0`; the grid facade enforces it.
    pub fn new(
        canvas_width: u32,
        canvas_height: u32,
        rows: u32,
        cols: u32,
        margin_x: u32,
        margin_y: u32,
    ) -> Self {
        Self {
            canvas_width,
            canvas_height,
            rows,
            cols,
            margin_x,
            margin_y,
        }
    }

    /// Real-valued cell width, `canvas_width / cols`.
    pub fn cell_width(&self) -> f64 {
        f64::from(self.canvas_width) / f64::from(self.cols)
    }

    /// Real-valued cell height, `canvas_height / rows`.
    pub fn cell_height(&self) -> f64 {
        f64::from(self.canvas_height) / f64::from(self.rows)
    }

    /// Number of rows in the partition.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the partition.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Horizontal margin inside each cell.
    pub fn margin_x(&self) -> u32 {
        self.margin_x
    }

    /// Vertical margin inside each cell.
    pub fn margin_y(&self) -> u32 {
        self.margin_y
    }

    /// Raw pixel rectangle of one cell, margins applied.
    ///
    /// May be inverted when `2 * margin >= cell size`; the pixel cache
    /// rejects such rectangles before caching them.
    pub fn cell_rect(&self, addr: GridAddress) -> PixelRect {
        let cw = self.cell_width();
        let ch = self.cell_height();
        let mx = f64::from(self.margin_x);
        let my = f64::from(self.margin_y);
        PixelRect {
            x1: (f64::from(addr.col) * cw + mx).floor() as i32,
            y1: (f64::from(addr.row) * ch + my).floor() as i32,
            x2: (f64::from(addr.col + 1) * cw - mx).floor() as i32,
            y2: (f64::from(addr.row + 1) * ch - my).floor() as i32,
        }
    }
}
