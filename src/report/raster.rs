use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

use super::font;
use super::scene::{Canvas, Color, Point, Scene, Stroke, TextItem};
use crate::error::ReportError;

/// Resolution charts are rasterised at.
pub const DEFAULT_DPI: f64 = 100.0;

// ---------------------------------------------------------------------------
// RasterCanvas – scanline rendering into an RGBA image
// ---------------------------------------------------------------------------

/// Paints scenes into a transparent RGBA image.
pub struct RasterCanvas {
    image: RgbaImage,
    /// Pixels per point.
    scale: f64,
}

impl RasterCanvas {
    pub fn new(width_pt: f64, height_pt: f64, dpi: f64) -> Self {
        let scale = dpi / 72.0;
        let w = (width_pt * scale).ceil().max(1.0) as u32;
        let h = (height_pt * scale).ceil().max(1.0) as u32;
        Self {
            image: RgbaImage::new(w, h),
            scale,
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Source-over blend of `color` onto one pixel.
    fn blend(&mut self, x: u32, y: u32, color: Color) {
        let src_a = color.alpha as f32 / 255.0;
        if src_a <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |s: u8, d: u8| {
            let v = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        *dst = Rgba([
            mix(color.red, dst[0]),
            mix(color.green, dst[1]),
            mix(color.blue, dst[2]),
            (out_a * 255.0).round() as u8,
        ]);
    }

    /// Even-odd scanline fill, sampling pixel centres; `points` in pixels.
    fn fill_pixels(&mut self, points: &[(f64, f64)], color: Color) {
        if points.len() < 3 {
            return;
        }
        let (w, h) = self.image.dimensions();
        let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let y_start = min_y.floor().max(0.0) as u32;
        let y_end = (max_y.ceil().max(0.0) as u32).min(h);

        let mut crossings: Vec<f64> = Vec::new();
        for py in y_start..y_end {
            let sy = py as f64 + 0.5;
            crossings.clear();
            for i in 0..points.len() {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % points.len()];
                if (y0 <= sy && y1 > sy) || (y1 <= sy && y0 > sy) {
                    crossings.push(x0 + (sy - y0) / (y1 - y0) * (x1 - x0));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for span in crossings.chunks_exact(2) {
                let x_start = (span[0] - 0.5).ceil().max(0.0) as u32;
                let x_end = ((span[1] - 0.5).floor() + 1.0).max(0.0) as u32;
                for px in x_start..x_end.min(w) {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn to_px(&self, p: Point) -> (f64, f64) {
        (p.x * self.scale, p.y * self.scale)
    }
}

impl Canvas for RasterCanvas {
    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let px: Vec<(f64, f64)> = points.iter().map(|&p| self.to_px(p)).collect();
        self.fill_pixels(&px, color);
    }

    fn stroke_path(&mut self, points: &[Point], closed: bool, stroke: Stroke) {
        let half = (stroke.width * self.scale / 2.0).max(0.5);
        let segments = if closed {
            points.len()
        } else {
            points.len().saturating_sub(1)
        };
        for i in 0..segments {
            let (x0, y0) = self.to_px(points[i]);
            let (x1, y1) = self.to_px(points[(i + 1) % points.len()]);
            let len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
            if len == 0.0 {
                continue;
            }
            // unit normal, and a half-width extension along the segment so
            // corners meet
            let (nx, ny) = (-(y1 - y0) / len * half, (x1 - x0) / len * half);
            let (ex, ey) = ((x1 - x0) / len * half, (y1 - y0) / len * half);
            let quad = [
                (x0 - ex + nx, y0 - ey + ny),
                (x1 + ex + nx, y1 + ey + ny),
                (x1 + ex - nx, y1 + ey - ny),
                (x0 - ex - nx, y0 - ey - ny),
            ];
            self.fill_pixels(&quad, stroke.color);
        }
    }

    fn draw_text(&mut self, text: &TextItem) {
        let cell = font::cell_size(text.size);
        let ink = if text.bold { cell * 1.6 } else { cell };
        let (ox, oy) = text.box_offset();

        for (i, c) in text.content.chars().enumerate() {
            let left = ox + i as f64 * 6.0 * cell;
            for col in 0..font::GLYPH_COLUMNS {
                for row in 0..font::GLYPH_ROWS {
                    if !font::is_set(c, col, row) {
                        continue;
                    }
                    let lx = left + col as f64 * cell;
                    let ly = oy + row as f64 * cell;
                    let corners = [
                        text.to_page(lx, ly),
                        text.to_page(lx + ink, ly),
                        text.to_page(lx + ink, ly + cell),
                        text.to_page(lx, ly + cell),
                    ];
                    self.fill_polygon(&corners, text.color);
                }
            }
        }
    }
}

/// Rasterise `scene` and write it as a PNG with a transparent background.
pub fn render_png(scene: &Scene, path: &Path, dpi: f64) -> Result<(), ReportError> {
    let mut canvas = RasterCanvas::new(scene.width, scene.height, dpi);
    scene.paint(&mut canvas);
    canvas
        .into_image()
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ReportError::Image {
            path: path.to_path_buf(),
            source,
        })
}
