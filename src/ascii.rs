//! ASCII/ANSI quantization of a finished raster image.
//!
//! Nearest-color search against a fixed 16-entry palette of
//! gamma-corrected linear-RGB reference colors, a brightness-to-glyph ramp,
//! and run-length suppression of redundant color escapes. Independent of
//! the grid engine; it shares only the "nearest match under a fixed budget"
//! character.

use crate::style::Rgb;

/// One palette entry: linear-RGB reference color, terminal escape, hex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    /// Reference color in linear RGB, each channel in [0, 1].
    pub rgb: [f32; 3],
    /// ANSI foreground escape selecting this color.
    pub escape: &'static str,
    /// sRGB hex string of the display color.
    pub hex: &'static str,
}

/// The fixed 16-entry terminal palette. Never mutated at runtime.
pub const PALETTE: [PaletteEntry; 16] = [
    PaletteEntry { rgb: [0.0, 0.0, 0.0], escape: "\x1b[30m", hex: "#000000" },
    PaletteEntry { rgb: [0.5, 0.0, 0.0], escape: "\x1b[31m", hex: "#800000" },
    PaletteEntry { rgb: [0.0, 0.5, 0.0], escape: "\x1b[32m", hex: "#008000" },
    PaletteEntry { rgb: [0.5, 0.5, 0.0], escape: "\x1b[33m", hex: "#808000" },
    PaletteEntry { rgb: [0.0, 0.0, 0.5], escape: "\x1b[34m", hex: "#000080" },
    PaletteEntry { rgb: [0.5, 0.0, 0.5], escape: "\x1b[35m", hex: "#800080" },
    PaletteEntry { rgb: [0.0, 0.5, 0.5], escape: "\x1b[36m", hex: "#008080" },
    PaletteEntry { rgb: [0.75, 0.75, 0.75], escape: "\x1b[37m", hex: "#c0c0c0" },
    PaletteEntry { rgb: [0.5, 0.5, 0.5], escape: "\x1b[90m", hex: "#808080" },
    PaletteEntry { rgb: [1.0, 0.0, 0.0], escape: "\x1b[91m", hex: "#ff0000" },
    PaletteEntry { rgb: [0.0, 1.0, 0.0], escape: "\x1b[92m", hex: "#00ff00" },
    PaletteEntry { rgb: [1.0, 1.0, 0.0], escape: "\x1b[93m", hex: "#ffff00" },
    PaletteEntry { rgb: [0.0, 0.0, 1.0], escape: "\x1b[94m", hex: "#0000ff" },
    PaletteEntry { rgb: [1.0, 0.0, 1.0], escape: "\x1b[95m", hex: "#ff00ff" },
    PaletteEntry { rgb: [0.0, 1.0, 1.0], escape: "\x1b[96m", hex: "#00ffff" },
    PaletteEntry { rgb: [1.0, 1.0, 1.0], escape: "\x1b[97m", hex: "#ffffff" },
];

/// Reset escape appended after colored output.
pub const RESET: &str = "\x1b[0m";

/// Default glyph ramp, darkest to brightest.
pub const DEFAULT_GLYPHS: &str = " .:-=+*#%@";

const GAMMA: f32 = 2.2;

fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

/// Palette entry closest (squared Euclidean, linear RGB) to `rgb_linear`
/// after scaling each reference color by `brightness`.
///
/// Ties resolve to the first entry in palette declaration order.
pub fn nearest_color(rgb_linear: [f32; 3], brightness: f32) -> &'static PaletteEntry {
    let mut best = &PALETTE[0];
    let mut best_distance = f32::INFINITY;
    for entry in &PALETTE {
        let scaled = [
            entry.rgb[0] * brightness,
            entry.rgb[1] * brightness,
            entry.rgb[2] * brightness,
        ];
        let distance = squared_distance(scaled, rgb_linear);
        if distance < best_distance {
            best = entry;
            best_distance = distance;
        }
    }
    best
}

/// Read access to a finished image's pixels, in sRGB.
pub trait PixelSource {
    /// Image dimensions, `(width, height)`.
    fn dimensions(&self) -> (u32, u32);
    /// The sRGB pixel at `(x, y)`.
    fn pixel(&self, x: u32, y: u32) -> Rgb;
}

#[cfg(feature = "image")]
impl PixelSource for image::RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        image::RgbImage::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        let p = self.get_pixel(x, y);
        Rgb::new(p.0[0], p.0[1], p.0[2])
    }
}

/// Renders a pixel source as ASCII art, optionally ANSI-colored.
#[derive(Debug, Clone)]
pub struct AsciiArt {
    columns: u32,
    width_ratio: f32,
    glyphs: Vec<char>,
    monochrome: bool,
}

impl Default for AsciiArt {
    fn default() -> Self {
        Self::new()
    }
}

impl AsciiArt {
    /// Renderer with the default glyph ramp, 80 columns, colored output.
    pub fn new() -> Self {
        Self {
            columns: 80,
            width_ratio: 2.2,
            glyphs: DEFAULT_GLYPHS.chars().collect(),
            monochrome: false,
        }
    }

    /// Target width in characters.
    pub fn columns(mut self, columns: u32) -> Self {
        self.columns = columns.max(1);
        self
    }

    /// Character aspect-ratio compensation (terminal glyphs are taller than
    /// wide).
    pub fn width_ratio(mut self, ratio: f32) -> Self {
        self.width_ratio = ratio;
        self
    }

    /// Custom glyph ramp, darkest to brightest. Empty input keeps the
    /// default ramp.
    pub fn glyphs(mut self, ramp: &str) -> Self {
        if !ramp.is_empty() {
            self.glyphs = ramp.chars().collect();
        }
        self
    }

    /// Skip color escapes entirely.
    pub fn monochrome(mut self, on: bool) -> Self {
        self.monochrome = on;
        self
    }

    /// Render the whole image. Escape suppression state spans the full
    /// render; colored output ends with a reset escape.
    pub fn render(&self, source: &impl PixelSource) -> String {
        let (src_w, src_h) = source.dimensions();
        if src_w == 0 || src_h == 0 {
            return String::new();
        }

        // Downsample to `columns` wide, compensating for glyph aspect ratio.
        let scalar = src_w as f32 * self.width_ratio / self.columns as f32;
        let out_w = self.columns;
        let out_h = ((src_h as f32 / scalar) as u32).max(1);

        let mut lines = Vec::with_capacity(out_h as usize);
        let mut previous_escape: Option<&'static str> = None;
        for y in 0..out_h {
            let sy = (u64::from(y) * u64::from(src_h) / u64::from(out_h)) as u32;
            let row: Vec<Rgb> = (0..out_w)
                .map(|x| {
                    let sx = (u64::from(x) * u64::from(src_w) / u64::from(out_w)) as u32;
                    source.pixel(sx.min(src_w - 1), sy.min(src_h - 1))
                })
                .collect();
            lines.push(self.render_row_with(&row, &mut previous_escape));
        }

        let mut out = lines.join("\n");
        if !self.monochrome {
            out.push_str(RESET);
        }
        out
    }

    /// Render one row of pixels with fresh suppression state and no
    /// trailing reset.
    pub fn render_row(&self, pixels: &[Rgb]) -> String {
        let mut previous_escape = None;
        self.render_row_with(pixels, &mut previous_escape)
    }

    fn render_row_with(&self, pixels: &[Rgb], previous_escape: &mut Option<&'static str>) -> String {
        let mut line = String::with_capacity(pixels.len());
        for &pixel in pixels {
            let brightness = luma(pixel);
            let index = (brightness * (self.glyphs.len() - 1) as f32) as usize;
            let glyph = self.glyphs[index.min(self.glyphs.len() - 1)];

            if !self.monochrome {
                let linear = [
                    to_linear(pixel.r),
                    to_linear(pixel.g),
                    to_linear(pixel.b),
                ];
                let escape = nearest_color(linear, brightness).escape;
                if *previous_escape != Some(escape) {
                    line.push_str(escape);
                    *previous_escape = Some(escape);
                }
            }
            line.push(glyph);
        }
        line
    }
}

/// Rec.601 luma of an sRGB pixel, in [0, 1].
fn luma(pixel: Rgb) -> f32 {
    (0.299 * f32::from(pixel.r) + 0.587 * f32::from(pixel.g) + 0.114 * f32::from(pixel.b)) / 255.0
}

fn to_linear(channel: u8) -> f32 {
    (f32::from(channel) / 255.0).powf(GAMMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat {
        w: u32,
        h: u32,
        color: Rgb,
    }

    impl PixelSource for Flat {
        fn dimensions(&self) -> (u32, u32) {
            (self.w, self.h)
        }

        fn pixel(&self, _x: u32, _y: u32) -> Rgb {
            self.color
        }
    }

    #[test]
    fn test_exact_palette_color_maps_to_itself() {
        for entry in &PALETTE {
            assert_eq!(
                nearest_color(entry.rgb, 1.0).escape,
                entry.escape,
                "{}",
                entry.hex
            );
        }
    }

    #[test]
    fn test_tie_resolves_to_first_entry() {
        // Brightness 0 collapses every reference color to black; the first
        // entry must win.
        let entry = nearest_color([0.2, 0.2, 0.2], 0.0);
        assert_eq!(entry.hex, "#000000");
    }

    #[test]
    fn test_glyph_ramp_extremes() {
        let art = AsciiArt::new().monochrome(true);
        assert_eq!(art.render_row(&[Rgb::new(0, 0, 0)]), " ");
        assert_eq!(art.render_row(&[Rgb::new(255, 255, 255)]), "@");
    }

    #[test]
    fn test_escape_emitted_once_per_run() {
        let art = AsciiArt::new();
        let white = Rgb::new(255, 255, 255);
        let line = art.render_row(&[white, white, white]);
        assert_eq!(line, "\x1b[97m@@@");
    }

    #[test]
    fn test_escape_reemitted_on_color_change() {
        let art = AsciiArt::new();
        let line = art.render_row(&[
            Rgb::new(255, 255, 255),
            Rgb::new(255, 0, 0),
            Rgb::new(255, 0, 0),
        ]);
        let escapes = line.matches('\x1b').count();
        assert_eq!(escapes, 2);
    }

    #[test]
    fn test_monochrome_has_no_escapes() {
        let art = AsciiArt::new().columns(4).monochrome(true);
        let out = art.render(&Flat {
            w: 8,
            h: 8,
            color: Rgb::new(128, 128, 128),
        });
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_color_render_ends_with_reset() {
        let art = AsciiArt::new().columns(4);
        let out = art.render(&Flat {
            w: 8,
            h: 8,
            color: Rgb::new(0, 255, 0),
        });
        assert!(out.ends_with(RESET));
    }

    #[test]
    fn test_render_shape() {
        // 8x8 source at 4 columns, ratio 2.0: scalar = 4, out 4x2.
        let art = AsciiArt::new().columns(4).width_ratio(2.0).monochrome(true);
        let out = art.render(&Flat {
            w: 8,
            h: 8,
            color: Rgb::new(255, 255, 255),
        });
        insta::assert_snapshot!(out, @r"
        @@@@
        @@@@
        ");
    }

    #[test]
    fn test_custom_ramp() {
        let art = AsciiArt::new().glyphs("█▓▒░ ").monochrome(true);
        assert_eq!(art.render_row(&[Rgb::new(0, 0, 0)]), "█");
        assert_eq!(art.render_row(&[Rgb::new(255, 255, 255)]), " ");
    }

    #[test]
    fn test_empty_source() {
        let art = AsciiArt::new();
        assert_eq!(
            art.render(&Flat {
                w: 0,
                h: 0,
                color: Rgb::new(0, 0, 0)
            }),
            ""
        );
    }
}
