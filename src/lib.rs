//! Grid layout for raster canvases, with text auto-fitting and terminal
//! color-quantized output.
//!
//! The core type is [`Grid`]: an R x C partition of a pixel canvas into
//! cells, with rectangular merges, per-region pixel rectangles, edge
//! adjustment, and size-searched text placement. Drawing goes through the
//! [`Surface`] trait so the engine stays independent of any particular
//! raster backend.
//!
//! Around the grid sit a few self-contained renderers: [`AsciiArt`]
//! converts raster pixels to ANSI-colored glyph text, [`Dial`] and
//! [`Squares`] draw percentage indicators onto a surface.
//!
//! ```no_run
//! use rastergrid::{Grid, TextSpec};
//!
//! # fn demo<S: rastergrid::Surface>(surface: &mut S) -> rastergrid::Result<()> {
//! let (width, height) = surface.size();
//! let mut grid = Grid::new(4, 4, width, height)?;
//! grid.merge((0, 0), (0, 3))?;
//! let fit = grid.set_text(surface, &TextSpec::new("Title").start((0u32, 0u32)))?;
//! tracing::debug!(font_size = fit.font_size, "placed title");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod ascii;
pub mod cache;
pub mod dial;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod grid;
pub mod merge;
pub mod squares;
pub mod style;
pub mod surface;

pub use ascii::{AsciiArt, PixelSource};
pub use cache::PixelCache;
pub use dial::Dial;
pub use error::{GridError, Result};
pub use fit::{fit_to_box, tallest_fitting_height};
pub use geometry::{CellGeometry, GridAddress, PixelRect, Region};
pub use grid::{CellRef, Dimensions, Grid, TextFit};
pub use merge::MergeTable;
pub use squares::Squares;
pub use style::{Anchor, HAnchor, Rgb, TextSpec, TextStyle, VAnchor};
pub use surface::Surface;
