//! Drawing element definitions.
//!
//! All element geometry is stored in world millimeters; scene-pixel values
//! only exist transiently inside the interaction layer.

mod ellipse;
mod line;
mod path;
mod rectangle;
mod text;

pub use ellipse::Ellipse;
pub use line::Line;
pub use path::Path;
pub use rectangle::Rectangle;
pub use text::{FontFamily, Text};

use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;
/// Identifier of the layer an element belongs to.
pub type LayerId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke dash style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Style properties shared by all element kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width in millimeters.
    pub stroke_width: f64,
    /// Fill color for closed shapes (None = no fill).
    pub fill_color: Option<SerializableColor>,
    /// Fill opacity (0.0 transparent, 1.0 opaque).
    #[serde(default = "default_opacity")]
    pub fill_opacity: f64,
    /// Stroke dash style.
    #[serde(default)]
    pub dash: DashStyle,
}

fn default_opacity() -> f64 {
    1.0
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
            fill_opacity: 1.0,
            dash: DashStyle::default(),
        }
    }
}

impl ElementStyle {
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| {
            let color: Color = c.into();
            let rgba = color.to_rgba8();
            let alpha = (rgba.a as f64 * self.fill_opacity) as u8;
            Color::from_rgba8(rgba.r, rgba.g, rgba.b, alpha)
        })
    }
}

/// Normalize a rotation in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees % 360.0;
    if r < 0.0 {
        r + 360.0
    } else {
        r
    }
}

/// Distance from a point to a line segment a→b.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    point.distance(proj)
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Rotate `point` around `pivot` by `degrees`.
pub fn rotate_about(point: Point, pivot: Point, degrees: f64) -> Point {
    let rad = degrees.to_radians();
    let (sin, cos) = rad.sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point::new(
        pivot.x + dx * cos - dy * sin,
        pivot.y + dx * sin + dy * cos,
    )
}

/// Element kinds, used by tools that gate on kind (eraser sub-modes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Line,
    Rectangle,
    Ellipse,
    Text,
    Path,
}

/// The drawing element union.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Element {
    Line(Line),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Text(Text),
    Path(Path),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Line(e) => e.id,
            Element::Rectangle(e) => e.id,
            Element::Ellipse(e) => e.id,
            Element::Text(e) => e.id,
            Element::Path(e) => e.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Line(_) => ElementKind::Line,
            Element::Rectangle(_) => ElementKind::Rectangle,
            Element::Ellipse(_) => ElementKind::Ellipse,
            Element::Text(_) => ElementKind::Text,
            Element::Path(_) => ElementKind::Path,
        }
    }

    pub fn layer(&self) -> LayerId {
        match self {
            Element::Line(e) => e.layer,
            Element::Rectangle(e) => e.layer,
            Element::Ellipse(e) => e.layer,
            Element::Text(e) => e.layer,
            Element::Path(e) => e.layer,
        }
    }

    pub fn set_layer(&mut self, layer: LayerId) {
        match self {
            Element::Line(e) => e.layer = layer,
            Element::Rectangle(e) => e.layer = layer,
            Element::Ellipse(e) => e.layer = layer,
            Element::Text(e) => e.layer = layer,
            Element::Path(e) => e.layer = layer,
        }
    }

    /// Z-order within the owning layer.
    pub fn order(&self) -> u64 {
        match self {
            Element::Line(e) => e.order,
            Element::Rectangle(e) => e.order,
            Element::Ellipse(e) => e.order,
            Element::Text(e) => e.order,
            Element::Path(e) => e.order,
        }
    }

    pub fn set_order(&mut self, order: u64) {
        match self {
            Element::Line(e) => e.order = order,
            Element::Rectangle(e) => e.order = order,
            Element::Ellipse(e) => e.order = order,
            Element::Text(e) => e.order = order,
            Element::Path(e) => e.order = order,
        }
    }

    /// Rotation in degrees, pivoting around the element's geometric center.
    /// Lines and paths carry their orientation in their points and report 0.
    pub fn rotation(&self) -> f64 {
        match self {
            Element::Rectangle(e) => e.rotation,
            Element::Ellipse(e) => e.rotation,
            Element::Text(e) => e.rotation,
            Element::Line(_) | Element::Path(_) => 0.0,
        }
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        let degrees = normalize_degrees(degrees);
        match self {
            Element::Rectangle(e) => e.rotation = degrees,
            Element::Ellipse(e) => e.rotation = degrees,
            Element::Text(e) => e.rotation = degrees,
            Element::Line(_) | Element::Path(_) => {}
        }
    }

    pub fn supports_rotation(&self) -> bool {
        matches!(
            self,
            Element::Rectangle(_) | Element::Ellipse(_) | Element::Text(_)
        )
    }

    /// Axis-aligned bounds of the unrotated geometry, in millimeters.
    pub fn bounds(&self) -> Rect {
        match self {
            Element::Line(e) => e.bounds(),
            Element::Rectangle(e) => e.bounds(),
            Element::Ellipse(e) => e.bounds(),
            Element::Text(e) => e.bounds(),
            Element::Path(e) => e.bounds(),
        }
    }

    /// The geometric center, which is also the rotation pivot.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Hit test against a world point with a world-unit tolerance.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Element::Line(e) => e.hit_test(point, tolerance),
            Element::Rectangle(e) => e.hit_test(point, tolerance),
            Element::Ellipse(e) => e.hit_test(point, tolerance),
            Element::Text(e) => e.hit_test(point, tolerance),
            Element::Path(e) => e.hit_test(point, tolerance),
        }
    }

    /// Shift every geometry field by the same world-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Element::Line(e) => e.translate(delta),
            Element::Rectangle(e) => e.translate(delta),
            Element::Ellipse(e) => e.translate(delta),
            Element::Text(e) => e.translate(delta),
            Element::Path(e) => e.translate(delta),
        }
    }

    pub fn style(&self) -> &ElementStyle {
        match self {
            Element::Line(e) => &e.style,
            Element::Rectangle(e) => &e.style,
            Element::Ellipse(e) => &e.style,
            Element::Text(e) => &e.style,
            Element::Path(e) => &e.style,
        }
    }

    pub fn style_mut(&mut self) -> &mut ElementStyle {
        match self {
            Element::Line(e) => &mut e.style,
            Element::Rectangle(e) => &mut e.style,
            Element::Ellipse(e) => &mut e.style,
            Element::Text(e) => &mut e.style,
            Element::Path(e) => &mut e.style,
        }
    }

    /// Key points other geometry can align against: endpoints, corners,
    /// edge midpoints and centers.
    pub fn alignment_points(&self) -> Vec<Point> {
        match self {
            Element::Line(e) => vec![e.start, e.end, e.midpoint()],
            Element::Rectangle(_) | Element::Ellipse(_) => {
                let b = self.bounds();
                vec![
                    Point::new(b.x0, b.y0),
                    Point::new(b.x1, b.y0),
                    Point::new(b.x1, b.y1),
                    Point::new(b.x0, b.y1),
                    Point::new(b.center().x, b.y0),
                    Point::new(b.x1, b.center().y),
                    Point::new(b.center().x, b.y1),
                    Point::new(b.x0, b.center().y),
                    b.center(),
                ]
            }
            // Text and freehand paths don't attract smart guides.
            Element::Text(_) | Element::Path(_) => Vec::new(),
        }
    }
}
