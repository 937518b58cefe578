//! Ellipse element, stored by center and radii.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{rotate_about, ElementId, ElementStyle, LayerId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipse {
    pub id: ElementId,
    pub layer: LayerId,
    pub order: u64,
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    /// Rotation in degrees, normalized to `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    pub style: ElementStyle,
}

impl Ellipse {
    pub fn new(layer: LayerId, center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            order: 0,
            center,
            radius_x,
            radius_y,
            rotation: 0.0,
            style: ElementStyle::default(),
        }
    }

    /// Build from a drag's two corner points, inscribing the ellipse in
    /// their bounding box.
    pub fn from_corners(layer: LayerId, a: Point, b: Point) -> Self {
        let rect = Rect::from_points(a, b);
        Self::new(layer, rect.center(), rect.width() / 2.0, rect.height() / 2.0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.center.x - self.radius_x,
            self.center.y - self.radius_y,
            self.center.x + self.radius_x,
            self.center.y + self.radius_y,
        )
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = rotate_about(point, self.center, -self.rotation);
        let rx = self.radius_x + tolerance;
        let ry = self.radius_y + tolerance;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let nx = (local.x - self.center.x) / rx;
        let ny = (local.y - self.center.y) / ry;
        nx * nx + ny * ny <= 1.0
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}
