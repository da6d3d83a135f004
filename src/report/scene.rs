use palette::Srgba;

use super::font;

pub type Color = Srgba<u8>;

// ---------------------------------------------------------------------------
// Scene primitives
// ---------------------------------------------------------------------------

/// A point in page space: points (1/72 in), origin top-left, y downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// A single line of text anchored at `pos`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub pos: Point,
    pub content: String,
    /// Font size in points.
    pub size: f64,
    /// Rotation in degrees, counter-clockwise as seen on the page.
    pub angle: f64,
    pub halign: HAlign,
    pub valign: VAlign,
    pub bold: bool,
    pub color: Color,
}

impl TextItem {
    pub fn new(pos: Point, content: impl Into<String>, size: f64) -> Self {
        Self {
            pos,
            content: content.into(),
            size,
            angle: 0.0,
            halign: HAlign::Left,
            valign: VAlign::Center,
            bold: false,
            color: crate::color::black(),
        }
    }

    pub fn rotated(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn width(&self) -> f64 {
        font::text_width(&self.content, self.size)
    }

    /// Offset from the anchor to the top-left corner of the text box, in the
    /// text's own (unrotated, y-down) frame.
    pub fn box_offset(&self) -> (f64, f64) {
        let w = self.width();
        let h = font::cap_height(self.size);
        let dx = match self.halign {
            HAlign::Left => 0.0,
            HAlign::Center => -w / 2.0,
            HAlign::Right => -w,
        };
        let dy = match self.valign {
            VAlign::Top => 0.0,
            VAlign::Center => -h / 2.0,
            VAlign::Bottom => -h,
        };
        (dx, dy)
    }

    /// Map a point of the text's own frame (y-down, relative to the anchor)
    /// onto the page.
    pub fn to_page(&self, lx: f64, ly: f64) -> Point {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        Point::new(
            self.pos.x + lx * cos + ly * sin,
            self.pos.y - lx * sin + ly * cos,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon {
        points: Vec<Point>,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    Text(TextItem),
}

// ---------------------------------------------------------------------------
// Scene – a backend-neutral drawing
// ---------------------------------------------------------------------------

/// A page of vector shapes, drawn in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub fn polygon(&mut self, points: Vec<Point>, fill: Option<Color>, stroke: Option<Stroke>) {
        self.shapes.push(Shape::Polygon {
            points,
            fill,
            stroke,
        });
    }

    pub fn polyline(&mut self, points: Vec<Point>, stroke: Stroke) {
        self.shapes.push(Shape::Polyline { points, stroke });
    }

    pub fn text(&mut self, item: TextItem) {
        self.shapes.push(Shape::Text(item));
    }

    /// All text items, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &TextItem> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Draw every shape onto `canvas`.
    pub fn paint(&self, canvas: &mut dyn Canvas) {
        for shape in &self.shapes {
            match shape {
                Shape::Polygon {
                    points,
                    fill,
                    stroke,
                } => {
                    if let Some(color) = fill {
                        canvas.fill_polygon(points, *color);
                    }
                    if let Some(stroke) = stroke {
                        canvas.stroke_path(points, true, *stroke);
                    }
                }
                Shape::Polyline { points, stroke } => canvas.stroke_path(points, false, *stroke),
                Shape::Text(item) => canvas.draw_text(item),
            }
        }
    }
}

/// A drawing surface a [`Scene`] can be painted onto.
pub trait Canvas {
    fn fill_polygon(&mut self, points: &[Point], color: Color);
    fn stroke_path(&mut self, points: &[Point], closed: bool, stroke: Stroke);
    fn draw_text(&mut self, text: &TextItem);
}
