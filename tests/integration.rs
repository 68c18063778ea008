#![allow(clippy::unwrap_used)]
//! Integration tests for the grid layout engine.
//!
//! These tests drive the public API end to end: grid construction, merging,
//! text placement through a fake drawing surface, edge adjustment, border
//! drawing, and the indicator renderers.

use rastergrid::ascii::PixelSource;
use rastergrid::{
    Anchor, AsciiArt, Dial, Grid, GridAddress, GridError, PixelRect, Rgb, Squares, Surface,
    TextSpec, TextStyle,
};

/// Fake surface with size-linear text metrics: a font of size `s` measures
/// `(7s, 2s)` for any text. Every draw call is recorded.
#[derive(Default)]
struct FakeSurface {
    canvas: (u32, u32),
    texts: Vec<(String, (i32, i32), u32)>,
    rects: Vec<(PixelRect, Rgb)>,
    fills: Vec<(PixelRect, Rgb)>,
    lines: usize,
    arcs: usize,
    ellipses: usize,
    pastes: Vec<(i32, i32)>,
}

impl FakeSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: (width, height),
            ..Self::default()
        }
    }
}

impl Surface for FakeSurface {
    type Font = u32;
    type Image = (u32, u32);

    fn size(&self) -> (u32, u32) {
        self.canvas
    }

    fn build_font(&mut self, _name: Option<&str>, size: u32, _variation: Option<&str>) -> u32 {
        size
    }

    fn measure(&mut self, _text: &str, font: &u32) -> (u32, u32) {
        (font * 7, font * 2)
    }

    fn draw_text(&mut self, text: &str, at: (i32, i32), font: &u32, _a: Anchor, _s: &TextStyle) {
        self.texts.push((text.to_owned(), at, *font));
    }

    fn image_size(&self, image: &(u32, u32)) -> (u32, u32) {
        *image
    }

    fn paste(&mut self, _image: &(u32, u32), at: (i32, i32)) {
        self.pastes.push(at);
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        self.fills.push((rect, color));
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Rgb, _width: u32) {
        self.rects.push((rect, color));
    }

    fn stroke_line(&mut self, _f: (i32, i32), _t: (i32, i32), _c: Rgb, _w: u32) {
        self.lines += 1;
    }

    fn stroke_arc(&mut self, _b: PixelRect, _s: f32, _e: f32, _c: Rgb, _w: u32) {
        self.arcs += 1;
    }

    fn fill_ellipse(&mut self, _b: PixelRect, _f: Rgb, _o: Option<Rgb>) {
        self.ellipses += 1;
    }
}

#[test]
fn test_dashboard_layout_pipeline() {
    let mut surface = FakeSurface::new(480, 280);
    let mut grid = Grid::new(4, 4, 480, 280).unwrap();

    // Header row plus a 2x2 body panel.
    grid.merge((0, 0), (0, 3)).unwrap();
    grid.merge((1, 1), (2, 2)).unwrap();
    assert_eq!(grid.region_count(), 2);

    // Centered header: (0,0)-(480,70), height binds at size 35.
    let fit = grid
        .set_text(
            &mut surface,
            &TextSpec::new("Overview").start((0, 0)).anchor(Anchor::CENTER),
        )
        .unwrap();
    assert_eq!(fit.font_size, 35);
    assert_eq!(surface.texts.last().unwrap().1, (240, 35));

    // Body panel: (120,70)-(360,210), width binds at 240/7 = 34.
    let fit = grid
        .set_text(&mut surface, &TextSpec::new("body").start((1, 1)))
        .unwrap();
    assert_eq!(fit.font_size, 34);

    grid.draw_borders(&mut surface, Rgb::new(128, 128, 128), 1)
        .unwrap();
    // The two regions absorb 8 of the 16 cells: 2 region outlines + 8
    // single-cell outlines.
    assert_eq!(surface.rects.len(), 10);

    assert_eq!(grid.layout_string(), "0 0 0 0\n. 1 1 .\n. 1 1 .\n. . . .");
}

#[test]
fn test_row_height_rebalancing() {
    let mut surface = FakeSurface::new(480, 280);
    let mut grid = Grid::new(4, 4, 480, 280).unwrap();
    grid.merge((0, 0), (0, 3)).unwrap();

    // Largest size whose width 7s fits the 480px span is 68, so the row
    // must be 136px tall.
    let needed = grid
        .required_row_height(&mut surface, (0, 0), "Overview", None, None, None)
        .unwrap();
    assert_eq!(needed, 136);

    // Grow row 0 downward to the computed height and push row 1's top down
    // to match.
    let current = grid.dimensions((0, 0), None).unwrap().height as i32;
    let delta = needed as i32 - current;
    grid.adjust_row_height(0, 0, delta).unwrap();
    grid.adjust_row_height(1, delta, 0).unwrap();

    let header = grid.dimensions((0, 0), None).unwrap();
    assert_eq!(header.height, needed);
    let below = grid.dimensions((1, 0), None).unwrap();
    assert_eq!(below.y, header.y + header.height as i32);
}

#[test]
fn test_merge_reabsorbs_overlap() {
    let mut grid = Grid::new(4, 4, 480, 280).unwrap();
    grid.merge((0, 0), (1, 1)).unwrap();
    grid.merge((1, 1), (2, 2)).unwrap();

    // The first region is fully retracted; its former cells are unmerged.
    assert_eq!(grid.region_count(), 1);
    let region = grid.resolve((0u32, 0u32)).unwrap();
    assert!(region.is_single());
    let region = grid.resolve((1u32, 1u32)).unwrap();
    assert_eq!(region.end, GridAddress::new(2, 2));
}

#[test]
fn test_inverting_adjustment_surfaces_on_query() {
    let mut grid = Grid::new(2, 2, 100, 100).unwrap();

    // Collapsing a 50px cell by 60px from both sides inverts it; the
    // inconsistency surfaces on the next query, not on the adjustment.
    grid.adjust_region((0, 0), -60, 0, -60, 0).unwrap();
    let err = grid.dimensions((0, 0), None).unwrap_err();
    assert!(matches!(err, GridError::GeometryInconsistency { .. }));

    // Untouched cells still answer.
    let dims = grid.dimensions((1, 1), None).unwrap();
    assert_eq!((dims.width, dims.height), (50, 50));
}

#[test]
fn test_paste_image_bottom_right() {
    let mut surface = FakeSurface::new(480, 280);
    let mut grid = Grid::new(4, 4, 480, 280).unwrap();
    grid.paste_image(&mut surface, (3, 3), &(40, 20), None, Anchor::parse("br"))
        .unwrap();
    // Cell (3,3) is (360,210)-(480,280).
    assert_eq!(surface.pastes, vec![(440, 260)]);
}

#[test]
fn test_dial_draws_onto_surface() {
    let mut surface = FakeSurface::new(200, 200);
    Dial::new(0.6).render(&mut surface);

    // Track and value arcs, needle plus tick lines, pivot ellipse, labels.
    assert_eq!(surface.arcs, 2);
    assert!(surface.lines > 0);
    assert_eq!(surface.ellipses, 1);
    assert!(surface.texts.iter().any(|(t, _, _)| t == "60%"));
}

#[test]
fn test_squares_fill_counts() {
    let mut surface = FakeSurface::new(200, 200);
    Squares::new(0.42).render(&mut surface);

    let fg = Rgb::new(0x4c, 0xaf, 0x50);
    let full = surface.fills.iter().filter(|(_, c)| *c == fg).count();
    // 42 full squares; 0.42 * 100 leaves no partial.
    assert_eq!(full, 42);
}

/// In-memory pixel buffer for exercising the quantizer without the image
/// feature.
struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelSource for PixelBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.pixels[(y * self.width + x) as usize]
    }
}

#[test]
fn test_ascii_render_black_white_split() {
    // Left half black, right half white, 8x4 source at 4 columns.
    let mut pixels = Vec::new();
    for _y in 0..4 {
        for x in 0..8 {
            pixels.push(if x < 4 {
                Rgb::new(0, 0, 0)
            } else {
                Rgb::new(255, 255, 255)
            });
        }
    }
    let source = PixelBuffer {
        width: 8,
        height: 4,
        pixels,
    };

    let art = AsciiArt::new()
        .columns(4)
        .width_ratio(1.0)
        .monochrome(true)
        .render(&source);
    let lines: Vec<&str> = art.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert_eq!(*line, "  @@");
    }
}

#[test]
fn test_ascii_color_output_has_single_reset() {
    let source = PixelBuffer {
        width: 2,
        height: 1,
        pixels: vec![Rgb::new(255, 0, 0), Rgb::new(255, 0, 0)],
    };
    let art = AsciiArt::new().columns(2).render(&source);

    // One escape for the run, one trailing reset.
    assert_eq!(art.matches("\x1b[").count(), 2);
    assert!(art.ends_with("\x1b[0m"));
}
