//! Straight line segment element.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{point_to_segment_dist, ElementId, ElementStyle, LayerId};

/// A straight wall or dimension line between two world points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub id: ElementId,
    pub layer: LayerId,
    pub order: u64,
    pub start: Point,
    pub end: Point,
    pub style: ElementStyle,
}

impl Line {
    pub fn new(layer: LayerId, start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            order: 0,
            start,
            end,
            style: ElementStyle::default(),
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let threshold = self.style.stroke_width / 2.0 + tolerance;
        point_to_segment_dist(point, self.start, self.end) <= threshold
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
