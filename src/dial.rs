//! Dial (gauge) indicator: a percentage rendered as an arc with optional
//! needle, ticks, and centered value label.
//!
//! Pure caller of the drawing collaborator; no new algorithm beyond
//! elementary trigonometry.

use crate::geometry::PixelRect;
use crate::style::{Anchor, Rgb, TextStyle};
use crate::surface::Surface;
use tracing::debug;

const MAJOR_TICKS: u32 = 5;
const MINORS_PER_MAJOR: u32 = 4;

/// A percentage gauge. Build with setters, then [`render`](Dial::render).
#[derive(Debug, Clone)]
pub struct Dial {
    percentage: f64,
    size: u32,
    radius: Option<u32>,
    bg_color: Rgb,
    fg_color: Rgb,
    track_color: Rgb,
    thickness: u32,
    font: Option<String>,
    font_size: Option<u32>,
    variation: Option<String>,
    show_needle: bool,
    show_ticks: bool,
    show_value: bool,
    start_angle: f32,
    end_angle: f32,
}

impl Dial {
    /// Gauge for `percentage` (clamped to [0, 1]) with the default look:
    /// 200px square, −135°..135° sweep, green on light gray.
    pub fn new(percentage: f64) -> Self {
        Self {
            percentage: percentage.clamp(0.0, 1.0),
            size: 200,
            radius: None,
            bg_color: Rgb::new(255, 255, 255),
            fg_color: Rgb::new(0x4c, 0xaf, 0x50),
            track_color: Rgb::new(0xe0, 0xe0, 0xe0),
            thickness: 20,
            font: None,
            font_size: None,
            variation: None,
            show_needle: true,
            show_ticks: true,
            show_value: true,
            start_angle: -135.0,
            end_angle: 135.0,
        }
    }

    /// Canvas edge length in pixels.
    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Fixed radius instead of one derived from `size` and `thickness`.
    pub fn radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Background fill color.
    pub fn background(mut self, color: Rgb) -> Self {
        self.bg_color = color;
        self
    }

    /// Value-arc color.
    pub fn foreground(mut self, color: Rgb) -> Self {
        self.fg_color = color;
        self
    }

    /// Track-arc color.
    pub fn track(mut self, color: Rgb) -> Self {
        self.track_color = color;
        self
    }

    /// Arc stroke width in pixels.
    pub fn thickness(mut self, thickness: u32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Font name for labels.
    pub fn font(mut self, name: impl Into<String>) -> Self {
        self.font = Some(name.into());
        self
    }

    /// Fixed label font size instead of one derived from `size`.
    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Font variation for labels.
    pub fn variation(mut self, variation: impl Into<String>) -> Self {
        self.variation = Some(variation.into());
        self
    }

    /// Toggle the needle.
    pub fn needle(mut self, on: bool) -> Self {
        self.show_needle = on;
        self
    }

    /// Toggle tick marks and their labels.
    pub fn ticks(mut self, on: bool) -> Self {
        self.show_ticks = on;
        self
    }

    /// Toggle the centered percentage label.
    pub fn value_label(mut self, on: bool) -> Self {
        self.show_value = on;
        self
    }

    /// Custom sweep, degrees; 0 points right, angles grow clockwise.
    pub fn sweep(mut self, start_deg: f32, end_deg: f32) -> Self {
        self.start_angle = start_deg;
        self.end_angle = end_deg;
        self
    }

    /// Draw the gauge onto `surface`, assumed at least `size` square.
    pub fn render<S: Surface>(&self, surface: &mut S) {
        let size = self.size as i32;
        surface.fill_rect(PixelRect::new(0, 0, size, size), self.bg_color);

        let margin = (self.thickness / 2 + 5) as i32;
        let cx = size / 2;
        let cy = size / 2;
        let radius = match self.radius {
            Some(r) => r as i32,
            None => (size - 2 * margin) / 2,
        };
        let bbox = PixelRect::new(cx - radius, cy - radius, cx + radius, cy + radius);
        let sweep = self.end_angle - self.start_angle;

        surface.stroke_arc(
            bbox,
            self.start_angle,
            self.end_angle,
            self.track_color,
            self.thickness,
        );
        if self.percentage > 0.0 {
            let value_end = self.start_angle + (self.percentage as f32) * sweep;
            surface.stroke_arc(bbox, self.start_angle, value_end, self.fg_color, self.thickness);
        }

        if self.show_needle {
            let needle_angle = self.start_angle + (self.percentage as f32) * sweep;
            self.draw_needle(surface, cx, cy, radius, needle_angle);
        }
        if self.show_ticks {
            self.draw_ticks(surface, cx, cy, radius);
        }
        if self.show_value {
            let label = format!("{}%", (self.percentage * 100.0) as i32);
            let size_for_label = self.font_size.unwrap_or_else(|| (self.size / 10).max(10));
            let font = surface.build_font(self.font.as_deref(), size_for_label, self.variation.as_deref());
            surface.draw_text(
                &label,
                (cx, cy),
                &font,
                Anchor::CENTER,
                &TextStyle {
                    fill: Some(Rgb::new(0, 0, 0)),
                    ..TextStyle::default()
                },
            );
        }
        debug!(percentage = self.percentage, size = self.size, "rendered dial");
    }

    fn draw_needle<S: Surface>(&self, surface: &mut S, cx: i32, cy: i32, radius: i32, angle: f32) {
        let rad = angle.to_radians();
        let length = radius - (self.thickness / 2) as i32 - 10;
        let tip = (
            cx + (length as f32 * rad.cos()) as i32,
            cy + (length as f32 * rad.sin()) as i32,
        );
        surface.stroke_line((cx, cy), tip, Rgb::new(255, 0, 0), 3);

        let pivot = ((self.size / 30).max(4)) as i32;
        surface.fill_ellipse(
            PixelRect::new(cx - pivot, cy - pivot, cx + pivot, cy + pivot),
            Rgb::new(0, 0, 0),
            Some(Rgb::new(128, 128, 128)),
        );
    }

    fn draw_ticks<S: Surface>(&self, surface: &mut S, cx: i32, cy: i32, radius: i32) {
        let sweep = self.end_angle - self.start_angle;
        let at = |r: i32, rad: f32| {
            (
                cx + (r as f32 * rad.cos()) as i32,
                cy + (r as f32 * rad.sin()) as i32,
            )
        };

        let label_size = self.font_size.unwrap_or_else(|| (self.size / 20).max(8));
        for i in 0..MAJOR_TICKS {
            let fraction = i as f32 / (MAJOR_TICKS - 1) as f32;
            let rad = (self.start_angle + fraction * sweep).to_radians();
            surface.stroke_line(at(radius + 5, rad), at(radius - 10, rad), Rgb::new(0, 0, 0), 2);

            let label = ((fraction * 100.0) as i32).to_string();
            let font = surface.build_font(self.font.as_deref(), label_size, self.variation.as_deref());
            surface.draw_text(
                &label,
                at(radius + 20, rad),
                &font,
                Anchor::CENTER,
                &TextStyle {
                    fill: Some(Rgb::new(0, 0, 0)),
                    ..TextStyle::default()
                },
            );
        }

        let segments = (MAJOR_TICKS - 1) * MINORS_PER_MAJOR;
        for i in 1..segments {
            if i % MINORS_PER_MAJOR == 0 {
                continue; // major tick position
            }
            let rad = (self.start_angle + (i as f32 / segments as f32) * sweep).to_radians();
            surface.stroke_line(
                at(radius + 2, rad),
                at(radius - 5, rad),
                Rgb::new(128, 128, 128),
                1,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;

    #[derive(Default)]
    struct Recorder {
        arcs: Vec<(f32, f32, Rgb)>,
        lines: usize,
        ellipses: usize,
        texts: Vec<String>,
        fills: usize,
    }

    impl Surface for Recorder {
        type Font = u32;
        type Image = ();

        fn size(&self) -> (u32, u32) {
            (200, 200)
        }

        fn build_font(&mut self, _n: Option<&str>, size: u32, _v: Option<&str>) -> u32 {
            size
        }

        fn measure(&mut self, _t: &str, font: &u32) -> (u32, u32) {
            (*font, *font)
        }

        fn draw_text(
            &mut self,
            text: &str,
            _at: (i32, i32),
            _f: &u32,
            _a: Anchor,
            _s: &TextStyle,
        ) {
            self.texts.push(text.to_owned());
        }

        fn image_size(&self, _i: &()) -> (u32, u32) {
            (0, 0)
        }

        fn paste(&mut self, _i: &(), _at: (i32, i32)) {}

        fn fill_rect(&mut self, _r: PixelRect, _c: Rgb) {
            self.fills += 1;
        }

        fn stroke_rect(&mut self, _r: PixelRect, _c: Rgb, _w: u32) {}

        fn stroke_line(&mut self, _f: (i32, i32), _t: (i32, i32), _c: Rgb, _w: u32) {
            self.lines += 1;
        }

        fn stroke_arc(&mut self, _b: PixelRect, start: f32, end: f32, color: Rgb, _w: u32) {
            self.arcs.push((start, end, color));
        }

        fn fill_ellipse(&mut self, _b: PixelRect, _f: Rgb, _o: Option<Rgb>) {
            self.ellipses += 1;
        }
    }

    #[test]
    fn test_half_dial_arcs() {
        let mut surface = Recorder::default();
        Dial::new(0.5).needle(false).ticks(false).value_label(false).render(&mut surface);

        // Track covers the full sweep, value arc half of it.
        assert_eq!(surface.arcs.len(), 2);
        assert_eq!(surface.arcs[0].0, -135.0);
        assert_eq!(surface.arcs[0].1, 135.0);
        assert_eq!(surface.arcs[1].1, 0.0);
    }

    #[test]
    fn test_zero_percentage_skips_value_arc() {
        let mut surface = Recorder::default();
        Dial::new(0.0).needle(false).ticks(false).value_label(false).render(&mut surface);
        assert_eq!(surface.arcs.len(), 1);
    }

    #[test]
    fn test_percentage_clamps() {
        let mut surface = Recorder::default();
        Dial::new(3.5).needle(false).ticks(false).render(&mut surface);
        assert_eq!(surface.texts, vec!["100%"]);
    }

    #[test]
    fn test_ticks_and_needle_counts() {
        let mut surface = Recorder::default();
        Dial::new(0.25).render(&mut surface);

        // 1 needle + 5 major ticks + 12 minor ticks.
        assert_eq!(surface.lines, 18);
        assert_eq!(surface.ellipses, 1);
        // 5 tick labels + the value label.
        assert_eq!(surface.texts.len(), 6);
        assert!(surface.texts.contains(&"25%".to_owned()));
        assert_eq!(surface.fills, 1);
    }
}
