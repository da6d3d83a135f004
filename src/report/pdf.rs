use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use super::scene::{Canvas, Color, Point, Scene, Stroke, TextItem};
use crate::color::unit_rgb;
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// PdfCanvas – single-page PDF content stream
// ---------------------------------------------------------------------------

/// Collects PDF drawing operators for one page.
///
/// Text uses the standard Helvetica faces, so no font is embedded.
pub struct PdfCanvas {
    width: f64,
    height: f64,
    content: String,
    /// Alpha byte → graphics-state resource name.
    alpha_states: BTreeMap<u8, String>,
}

impl PdfCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            content: String::new(),
            alpha_states: BTreeMap::new(),
        }
    }

    /// Scene y grows downwards, PDF y upwards.
    fn flip(&self, p: Point) -> (f64, f64) {
        (p.x, self.height - p.y)
    }

    /// Open a graphics state, selecting a transparency state when needed.
    fn begin(&mut self, color: Color) {
        self.content.push_str("q\n");
        if color.alpha < 255 {
            let next = format!("GS{}", self.alpha_states.len());
            let name = self.alpha_states.entry(color.alpha).or_insert(next).clone();
            let _ = writeln!(self.content, "/{name} gs");
        }
    }

    fn path(&mut self, points: &[Point]) {
        for (i, &p) in points.iter().enumerate() {
            let (x, y) = self.flip(p);
            let op = if i == 0 { "m" } else { "l" };
            let _ = writeln!(self.content, "{x:.2} {y:.2} {op}");
        }
    }

    /// Serialise the page into a complete PDF document.
    pub fn finish(self) -> Vec<u8> {
        let mut gstates = String::new();
        for (alpha, name) in &self.alpha_states {
            let a = *alpha as f64 / 255.0;
            let _ = write!(gstates, "/{name} << /CA {a:.3} /ca {a:.3} >> ");
        }

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents 4 0 R \
                 /Resources << /Font << /F1 5 0 R /F2 6 0 R >> /ExtGState << {gstates}>> >> >>",
                self.width, self.height
            ),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                self.content.len(),
                self.content
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_at = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for off in offsets {
            let _ = writeln!(xref, "{off:010} 00000 n ");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        );
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

impl Canvas for PdfCanvas {
    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 {
            return;
        }
        self.begin(color);
        let (r, g, b) = unit_rgb(color);
        let _ = writeln!(self.content, "{r:.3} {g:.3} {b:.3} rg");
        self.path(points);
        self.content.push_str("h f\nQ\n");
    }

    fn stroke_path(&mut self, points: &[Point], closed: bool, stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        self.begin(stroke.color);
        let (r, g, b) = unit_rgb(stroke.color);
        let _ = writeln!(self.content, "{r:.3} {g:.3} {b:.3} RG {:.2} w", stroke.width);
        self.path(points);
        self.content.push_str(if closed { "h S\nQ\n" } else { "S\nQ\n" });
    }

    fn draw_text(&mut self, text: &TextItem) {
        if text.content.is_empty() {
            return;
        }
        // Baseline start in the text frame: same box as the raster glyphs,
        // with the baseline at the bottom of the box.
        let (dx, dy) = text.box_offset();
        let cap = super::font::cap_height(text.size);
        let start = text.to_page(dx, dy + cap);
        let (x, y) = self.flip(start);
        let (sin, cos) = text.angle.to_radians().sin_cos();
        let font = if text.bold { "F2" } else { "F1" };

        self.begin(text.color);
        let (r, g, b) = unit_rgb(text.color);
        let _ = writeln!(
            self.content,
            "BT /{font} {:.2} Tf {r:.3} {g:.3} {b:.3} rg {cos:.4} {sin:.4} {:.4} {cos:.4} {x:.2} {y:.2} Tm ({}) Tj ET\nQ",
            text.size,
            -sin,
            escape(&text.content)
        );
    }
}

/// Escape a string for a PDF literal; non-ASCII characters become '?'.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Write `scene` as a one-page PDF.
pub fn render_pdf(scene: &Scene, path: &Path) -> Result<(), ReportError> {
    let mut canvas = PdfCanvas::new(scene.width, scene.height);
    scene.paint(&mut canvas);
    std::fs::write(path, canvas.finish()).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
