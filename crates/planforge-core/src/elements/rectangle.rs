//! Axis-defined rectangle element with optional rotation.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{rotate_about, ElementId, ElementStyle, LayerId};

/// A rectangle described by its top-left origin plus width/height, all in
/// millimeters. Rotation pivots around the rectangle center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub id: ElementId,
    pub layer: LayerId,
    pub order: u64,
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, normalized to `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    pub style: ElementStyle,
}

impl Rectangle {
    pub fn new(layer: LayerId, origin: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            order: 0,
            origin,
            width,
            height,
            rotation: 0.0,
            style: ElementStyle::default(),
        }
    }

    /// Build from two drag corners, normalizing so width/height are positive.
    pub fn from_corners(layer: LayerId, a: Point, b: Point) -> Self {
        let rect = Rect::from_points(a, b);
        Self::new(layer, rect.origin(), rect.width(), rect.height())
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin, (self.width, self.height))
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        // Undo the rotation so the test runs in the axis-aligned frame.
        let local = rotate_about(point, self.center(), -self.rotation);
        self.bounds().inflate(tolerance, tolerance).contains(local)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let r = Rectangle::from_corners(
            Uuid::new_v4(),
            Point::new(50.0, 40.0),
            Point::new(10.0, 20.0),
        );
        assert_eq!(r.origin, Point::new(10.0, 20.0));
        assert!((r.width - 40.0).abs() < 1e-9);
        assert!((r.height - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_unrotated() {
        let r = Rectangle::new(Uuid::new_v4(), Point::ZERO, 100.0, 50.0);
        assert!(r.hit_test(Point::new(50.0, 25.0), 0.0));
        assert!(r.hit_test(Point::new(102.0, 25.0), 3.0));
        assert!(!r.hit_test(Point::new(110.0, 25.0), 3.0));
    }

    #[test]
    fn test_hit_test_rotated() {
        let mut r = Rectangle::new(Uuid::new_v4(), Point::ZERO, 100.0, 20.0);
        r.rotation = 90.0;
        // Center stays at (50, 10); the long axis now runs vertically.
        assert!(r.hit_test(Point::new(50.0, 55.0), 0.0));
        assert!(!r.hit_test(Point::new(95.0, 10.0), 0.0));
    }

    #[test]
    fn test_translate_keeps_size() {
        let mut r = Rectangle::new(Uuid::new_v4(), Point::ZERO, 100.0, 50.0);
        r.translate(Vec2::new(5.0, 5.0));
        assert_eq!(r.origin, Point::new(5.0, 5.0));
        assert!((r.width - 100.0).abs() < 1e-9);
    }
}
