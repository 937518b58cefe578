//! Text annotation element.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{rotate_about, ElementId, ElementStyle, LayerId};

/// Average glyph width as a fraction of font size, used for approximate
/// bounds until a real text layout runs.
const GLYPH_WIDTH_FACTOR: f64 = 0.55;
const LINE_HEIGHT_FACTOR: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    SansSerif,
    Serif,
    Monospace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub id: ElementId,
    pub layer: LayerId,
    pub order: u64,
    /// Top-left anchor of the first line, in millimeters.
    pub anchor: Point,
    pub content: String,
    /// Font size in millimeters.
    pub font_size: f64,
    #[serde(default)]
    pub font_family: FontFamily,
    /// Rotation in degrees, normalized to `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    pub style: ElementStyle,
}

impl Text {
    pub fn new(layer: LayerId, anchor: Point, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            order: 0,
            anchor,
            content: content.into(),
            font_size: 16.0,
            font_family: FontFamily::default(),
            rotation: 0.0,
            style: ElementStyle::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Approximate bounds from the line structure of the content.
    pub fn bounds(&self) -> Rect {
        let mut max_chars = 0usize;
        let mut lines = 0usize;
        for line in self.content.lines() {
            max_chars = max_chars.max(line.chars().count());
            lines += 1;
        }
        let lines = lines.max(1);
        let width = (max_chars.max(1) as f64) * self.font_size * GLYPH_WIDTH_FACTOR;
        let height = (lines as f64) * self.font_size * LINE_HEIGHT_FACTOR;
        Rect::from_origin_size(self.anchor, (width, height))
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = rotate_about(point, self.bounds().center(), -self.rotation);
        self.bounds().inflate(tolerance, tolerance).contains(local)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
    }
}
