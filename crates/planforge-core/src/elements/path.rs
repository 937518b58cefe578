//! Polyline path element, produced by the pen tool.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{point_to_polyline_dist, ElementId, ElementStyle, LayerId};

/// An open polyline of at least two vertices, either sampled from a
/// freehand stroke or placed click by click.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    pub id: ElementId,
    pub layer: LayerId,
    pub order: u64,
    pub points: Vec<Point>,
    pub style: ElementStyle,
}

impl Path {
    /// Returns `None` when fewer than two points are supplied; a path with
    /// a single vertex has no geometry.
    pub fn new(layer: LayerId, points: Vec<Point>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            layer,
            order: 0,
            points,
            style: ElementStyle::default(),
        })
    }

    /// Total arc length of the polyline.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    pub fn bounds(&self) -> Rect {
        let first = self.points[0];
        let mut rect = Rect::from_points(first, first);
        for p in &self.points[1..] {
            rect = rect.union_pt(*p);
        }
        rect
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let threshold = self.style.stroke_width / 2.0 + tolerance;
        point_to_polyline_dist(point, &self.points) <= threshold
    }

    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }
}
