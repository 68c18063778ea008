//! Progress-squares indicator: a percentage shown as a grid of filled,
//! partially filled, and empty squares.
//!
//! Pure caller of the drawing collaborator; layout inference and fill
//! accounting only.

use crate::geometry::PixelRect;
use crate::style::Rgb;
use crate::surface::Surface;

/// A percentage square-grid. Build with setters, then
/// [`render`](Squares::render).
#[derive(Debug, Clone)]
pub struct Squares {
    percentage: f64,
    max_squares: u32,
    size: u32,
    bg_color: Rgb,
    fg_color: Rgb,
    empty_color: Rgb,
    gap: u32,
    rows: Option<u32>,
    columns: Option<u32>,
    border_width: u32,
    border_color: Rgb,
    show_partial: bool,
}

impl Squares {
    /// Indicator for `percentage` (clamped to [0, 1]): 100 squares in an
    /// as-square-as-possible layout, 200px wide, green on light gray.
    pub fn new(percentage: f64) -> Self {
        Self {
            percentage: percentage.clamp(0.0, 1.0),
            max_squares: 100,
            size: 200,
            bg_color: Rgb::new(255, 255, 255),
            fg_color: Rgb::new(0x4c, 0xaf, 0x50),
            empty_color: Rgb::new(0xe0, 0xe0, 0xe0),
            gap: 2,
            rows: None,
            columns: None,
            border_width: 1,
            border_color: Rgb::new(0xcc, 0xcc, 0xcc),
            show_partial: true,
        }
    }

    /// Total number of squares.
    pub fn max_squares(mut self, n: u32) -> Self {
        self.max_squares = n.max(1);
        self
    }

    /// Target width in pixels used to derive the square size.
    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Fix the number of rows; columns are inferred.
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows.max(1));
        self
    }

    /// Fix the number of columns; rows are inferred.
    pub fn columns(mut self, columns: u32) -> Self {
        self.columns = Some(columns.max(1));
        self
    }

    /// Gap between squares in pixels.
    pub fn gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    /// Border width and color of each square; width 0 disables borders.
    pub fn border(mut self, width: u32, color: Rgb) -> Self {
        self.border_width = width;
        self.border_color = color;
        self
    }

    /// Background fill color.
    pub fn background(mut self, color: Rgb) -> Self {
        self.bg_color = color;
        self
    }

    /// Color of filled squares.
    pub fn foreground(mut self, color: Rgb) -> Self {
        self.fg_color = color;
        self
    }

    /// Color of empty squares.
    pub fn empty(mut self, color: Rgb) -> Self {
        self.empty_color = color;
        self
    }

    /// Toggle left-to-right partial fill of the boundary square.
    pub fn partial(mut self, on: bool) -> Self {
        self.show_partial = on;
        self
    }

    /// Inferred `(rows, columns)` layout.
    ///
    /// With neither fixed, columns is `ceil(sqrt(max_squares))` and rows
    /// whatever covers the remainder, keeping the grid near-square.
    pub fn layout(&self) -> (u32, u32) {
        fn ceil_div(n: u32, d: u32) -> u32 {
            (n + d - 1) / d
        }
        match (self.rows, self.columns) {
            (Some(rows), Some(columns)) => (rows, columns),
            (Some(rows), None) => (rows, ceil_div(self.max_squares, rows)),
            (None, Some(columns)) => (ceil_div(self.max_squares, columns), columns),
            (None, None) => {
                let columns = (f64::from(self.max_squares).sqrt().ceil() as u32).max(1);
                (ceil_div(self.max_squares, columns), columns)
            }
        }
    }

    /// Edge length of one square, derived from `size`, layout, and gaps.
    pub fn square_size(&self) -> u32 {
        let (_, columns) = self.layout();
        let gaps = (columns + 1) * self.gap;
        self.size.saturating_sub(gaps) / columns
    }

    /// Canvas size `(width, height)` the rendering will cover; size the
    /// surface with this before calling [`render`](Self::render).
    pub fn canvas_size(&self) -> (u32, u32) {
        let (rows, columns) = self.layout();
        let square = self.square_size();
        (
            square * columns + (columns + 1) * self.gap,
            square * rows + (rows + 1) * self.gap,
        )
    }

    /// Draw the indicator onto `surface`.
    pub fn render<S: Surface>(&self, surface: &mut S) {
        let (rows, columns) = self.layout();
        let square = self.square_size() as i32;
        let gap = self.gap as i32;
        let (canvas_w, canvas_h) = self.canvas_size();
        surface.fill_rect(
            PixelRect::new(0, 0, canvas_w as i32, canvas_h as i32),
            self.bg_color,
        );

        let filled = self.percentage * f64::from(self.max_squares);
        let full = filled.floor() as u32;
        let partial_fraction = filled - filled.floor();
        let outline = (self.border_width > 0).then_some(self.border_color);

        for row in 0..rows {
            for col in 0..columns {
                let index = row * columns + col;
                if index >= self.max_squares {
                    break;
                }
                let x = gap + col as i32 * (square + gap);
                let y = gap + row as i32 * (square + gap);
                let rect = PixelRect::new(x, y, x + square, y + square);

                if index < full {
                    self.draw_square(surface, rect, self.fg_color, outline);
                } else if index == full && partial_fraction > 0.0 && self.show_partial {
                    self.draw_square(surface, rect, self.empty_color, outline);
                    let filled_width = (f64::from(square) * partial_fraction) as i32;
                    let border = self.border_width as i32;
                    if filled_width > border {
                        surface.fill_rect(
                            PixelRect::new(x + border, y, x + filled_width, y + square - border),
                            self.fg_color,
                        );
                    }
                } else {
                    self.draw_square(surface, rect, self.empty_color, outline);
                }
            }
        }
    }

    fn draw_square<S: Surface>(
        &self,
        surface: &mut S,
        rect: PixelRect,
        fill: Rgb,
        outline: Option<Rgb>,
    ) {
        surface.fill_rect(rect, fill);
        if let Some(color) = outline {
            surface.stroke_rect(rect, color, self.border_width);
        }
    }
}
