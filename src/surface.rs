//! Collaborator interface to the embedding raster backend.
//!
//! The grid engine never rasterizes glyphs, shapes text, or mutates pixels
//! itself. Everything it needs from the outside world goes through
//! [`Surface`]: font construction, text measurement, glyph-run drawing,
//! image pasting, and the primitive shape operations the indicator
//! renderers use.
//!
//! Implementations are assumed synchronous. `measure` must be monotonic
//! non-decreasing in font size or the growth search's maximality guarantee
//! does not hold.

use crate::geometry::PixelRect;
use crate::style::{Anchor, Rgb, TextStyle};

/// A raster canvas plus the font machinery to measure and draw on it.
pub trait Surface {
    /// Opaque handle to a built font at a specific size and variation.
    type Font;
    /// Image type accepted by [`paste`](Self::paste).
    type Image;

    /// Canvas dimensions in pixels.
    fn size(&self) -> (u32, u32);

    /// Build a font handle. `None` for `name` selects the backend default.
    fn build_font(&mut self, name: Option<&str>, size: u32, variation: Option<&str>) -> Self::Font;

    /// Measure `text` rendered with `font`, returning `(width, height)`.
    fn measure(&mut self, text: &str, font: &Self::Font) -> (u32, u32);

    /// Draw `text` with its anchor point at `at`.
    ///
    /// The anchor is passed along because the backend interprets it relative
    /// to that point: the resolver picked *where*, the anchor flag says *how
    /// the glyph box relates to that point*.
    fn draw_text(
        &mut self,
        text: &str,
        at: (i32, i32),
        font: &Self::Font,
        anchor: Anchor,
        style: &TextStyle,
    );

    /// Dimensions of an image, for anchor-aware placement.
    fn image_size(&self, image: &Self::Image) -> (u32, u32);

    /// Paste `image` with its top-left corner at `at`.
    fn paste(&mut self, image: &Self::Image, at: (i32, i32));

    /// Fill a rectangle.
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb);

    /// Stroke a rectangle outline.
    fn stroke_rect(&mut self, rect: PixelRect, color: Rgb, width: u32);

    /// Stroke a line segment.
    fn stroke_line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgb, width: u32);

    /// Stroke a circular arc inside `bbox`, angles in degrees, 0 at the
    /// positive x axis growing clockwise (raster y grows downward).
    fn stroke_arc(&mut self, bbox: PixelRect, start_deg: f32, end_deg: f32, color: Rgb, width: u32);

    /// Fill an ellipse inscribed in `bbox`, with an optional outline.
    fn fill_ellipse(&mut self, bbox: PixelRect, fill: Rgb, outline: Option<Rgb>);
}
