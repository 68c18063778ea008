//! Colors, anchors, and text specifications.
//!
//! The anchor resolver picks *where* in a rectangle a placement is relative
//! to; the drawing collaborator's anchor flag tells the rasterizer *how the
//! glyph box relates to that point*. Both halves travel together through
//! [`Surface::draw_text`](crate::surface::Surface::draw_text).

use crate::error::{GridError, Result};
use crate::geometry::PixelRect;

/// 24-bit sRGB color handed to the drawing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` hex string.
    ///
    /// # Example
    ///
    /// ```
    /// use rastergrid::style::Rgb;
    ///
    /// assert_eq!(Rgb::from_hex("#4CAF50").unwrap(), Rgb::new(0x4c, 0xaf, 0x50));
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(GridError::InvalidArgument(format!(
                "expected #RRGGBB hex color, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| GridError::InvalidArgument(format!("bad hex color {hex:?}: {e}")))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Vertical half of an anchor code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAnchor {
    /// `t`: align to the top edge.
    #[default]
    Top,
    /// `m`: align to the vertical midpoint.
    Middle,
    /// `b` or `s`: align to the bottom edge / baseline.
    Bottom,
}

/// Horizontal half of an anchor code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAnchor {
    /// `l`: align to the left edge.
    #[default]
    Left,
    /// `m`: align to the horizontal midpoint.
    Middle,
    /// `r`: align to the right edge.
    Right,
}

/// Two-character placement anchor: vertical then horizontal.
///
/// `"tl"` is top-left, `"mm"` dead center, `"br"` bottom-right, `"sm"`
/// baseline-center. Anything that is not exactly two valid characters
/// parses as top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    /// Vertical component (first character).
    pub v: VAnchor,
    /// Horizontal component (second character).
    pub h: HAnchor,
}

impl Anchor {
    /// Top-left, the fallback for unrecognized codes.
    pub const TOP_LEFT: Self = Self {
        v: VAnchor::Top,
        h: HAnchor::Left,
    };

    /// Dead center.
    pub const CENTER: Self = Self {
        v: VAnchor::Middle,
        h: HAnchor::Middle,
    };

    /// Create an anchor from its components.
    pub const fn new(v: VAnchor, h: HAnchor) -> Self {
        Self { v, h }
    }

    /// Parse a 2-character code, falling back to top-left on anything else.
    ///
    /// # Example
    ///
    /// ```
    /// use rastergrid::style::{Anchor, VAnchor};
    ///
    /// assert_eq!(Anchor::parse("mm"), Anchor::CENTER);
    /// assert_eq!(Anchor::parse("bogus"), Anchor::TOP_LEFT);
    /// assert_eq!(Anchor::parse("sr").v, VAnchor::Bottom);
    /// ```
    pub fn parse(code: &str) -> Self {
        let mut chars = code.chars();
        let (Some(vc), Some(hc), None) = (chars.next(), chars.next(), chars.next()) else {
            return Self::TOP_LEFT;
        };
        let v = match vc {
            't' => VAnchor::Top,
            'm' => VAnchor::Middle,
            'b' | 's' => VAnchor::Bottom,
            _ => return Self::TOP_LEFT,
        };
        let h = match hc {
            'l' => HAnchor::Left,
            'm' => HAnchor::Middle,
            'r' => HAnchor::Right,
            _ => return Self::TOP_LEFT,
        };
        Self { v, h }
    }

    /// Canonical 2-character code for this anchor.
    pub const fn code(&self) -> &'static str {
        match (self.v, self.h) {
            (VAnchor::Top, HAnchor::Left) => "tl",
            (VAnchor::Top, HAnchor::Middle) => "tm",
            (VAnchor::Top, HAnchor::Right) => "tr",
            (VAnchor::Middle, HAnchor::Left) => "ml",
            (VAnchor::Middle, HAnchor::Middle) => "mm",
            (VAnchor::Middle, HAnchor::Right) => "mr",
            (VAnchor::Bottom, HAnchor::Left) => "bl",
            (VAnchor::Bottom, HAnchor::Middle) => "bm",
            (VAnchor::Bottom, HAnchor::Right) => "br",
        }
    }

    /// Resolve the anchor point inside `rect`.
    ///
    /// Horizontal: left is `x1`, middle `(x1 + x2) / 2`, right `x2`.
    /// Vertical: top is `y1`, middle `(y1 + y2) / 2`, bottom `y2`.
    pub fn position_in(&self, rect: &PixelRect) -> (i32, i32) {
        let x = match self.h {
            HAnchor::Left => rect.x1,
            HAnchor::Middle => (rect.x1 + rect.x2) / 2,
            HAnchor::Right => rect.x2,
        };
        let y = match self.v {
            VAnchor::Top => rect.y1,
            VAnchor::Middle => (rect.y1 + rect.y2) / 2,
            VAnchor::Bottom => rect.y2,
        };
        (x, y)
    }
}

/// Recognized style parameters forwarded to the drawing collaborator.
///
/// Unlike an opaque parameter map, unknown keys are rejected at the
/// boundary (see [`TextSpec::apply_option`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    /// Fill color of the glyphs.
    pub fill: Option<Rgb>,
    /// Stroke (outline) width in pixels.
    pub stroke_width: u32,
    /// Stroke color; ignored by collaborators when `stroke_width` is 0.
    pub stroke_fill: Option<Rgb>,
}

/// A complete request to place text in a grid cell or merged span.
#[derive(Debug, Clone, Default)]
pub struct TextSpec {
    /// Target cell or merged-region index. Required; `None` is a contract
    /// violation rejected with `InvalidArgument`.
    pub start: Option<crate::grid::CellRef>,
    /// Explicit bottom-right address, overriding merge resolution.
    pub end: Option<crate::geometry::GridAddress>,
    /// The text to place.
    pub text: String,
    /// Font name, or `None` for the collaborator's default.
    pub font: Option<String>,
    /// Named variation for variable fonts (for example `Bold`).
    pub variation: Option<String>,
    /// Placement anchor within the target rectangle.
    pub anchor: Anchor,
    /// Recognized style parameters.
    pub style: TextStyle,
}

impl TextSpec {
    /// Start building a spec for `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the target cell or merged-region index.
    pub fn start(mut self, target: impl Into<crate::grid::CellRef>) -> Self {
        self.start = Some(target.into());
        self
    }

    /// Set an explicit bottom-right address.
    pub fn end(mut self, end: impl Into<crate::geometry::GridAddress>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Set the font name.
    pub fn font(mut self, name: impl Into<String>) -> Self {
        self.font = Some(name.into());
        self
    }

    /// Set the font variation.
    pub fn variation(mut self, variation: impl Into<String>) -> Self {
        self.variation = Some(variation.into());
        self
    }

    /// Set the placement anchor.
    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the glyph fill color.
    pub fn fill(mut self, color: Rgb) -> Self {
        self.style.fill = Some(color);
        self
    }

    /// Set stroke width and color.
    pub fn stroke(mut self, width: u32, color: Rgb) -> Self {
        self.style.stroke_width = width;
        self.style.stroke_fill = Some(color);
        self
    }

    /// Apply one key/value option from a marshalled source.
    ///
    /// Recognized keys: `anchor`, `fill`, `stroke_width`, `stroke_fill`,
    /// `variation`, `font`. Anything else is rejected with
    /// `InvalidArgument` rather than forwarded blindly.
    pub fn apply_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "anchor" => self.anchor = Anchor::parse(value),
            "fill" => self.style.fill = Some(Rgb::from_hex(value)?),
            "stroke_fill" => self.style.stroke_fill = Some(Rgb::from_hex(value)?),
            "stroke_width" => {
                self.style.stroke_width = value.parse().map_err(|e| {
                    GridError::InvalidArgument(format!("stroke_width {value:?}: {e}"))
                })?;
            }
            "variation" => self.variation = Some(value.to_owned()),
            "font" => self.font = Some(value.to_owned()),
            _ => {
                return Err(GridError::InvalidArgument(format!(
                    "unrecognized text option {key:?}"
                )))
            }
        }
        Ok(())
    }
}
