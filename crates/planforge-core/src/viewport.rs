//! Viewport pan/zoom transforms between screen and scene space.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom level.
pub const MIN_ZOOM: f64 = 0.5;
/// Maximum allowed zoom level.
pub const MAX_ZOOM: f64 = 5.0;
/// Per-tick wheel zoom factor (out / in).
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
pub const WHEEL_ZOOM_IN: f64 = 1.1;
/// Fixed zoom step for keyboard/controls (+/- 20%).
pub const ZOOM_STEP: f64 = 0.2;
/// Fraction of the container allowed as overscroll beyond the canvas edges.
pub const OVERSCROLL_FRACTION: f64 = 0.3;
/// Zoom level a double-tap toggles to.
pub const DOUBLE_TAP_ZOOM: f64 = 2.0;

/// Viewport state: zoom level and pan offset over the scene.
///
/// Ephemeral per session; never part of a saved document. Screen coordinates
/// map to scene coordinates through the inverse of
/// `translate(pan) * scale(zoom)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Current zoom level, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub zoom: f64,
    /// Current pan offset in screen pixels.
    pub pan: Vec2,
    /// Size of the containing surface in screen pixels.
    pub container: Size,
    /// Size of the canvas in scene pixels at zoom 1.
    pub canvas: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            container: Size::new(800.0, 600.0),
            canvas: Size::new(800.0, 600.0),
        }
    }
}

impl Viewport {
    pub fn new(container: Size, canvas: Size) -> Self {
        Self {
            container,
            canvas,
            ..Self::default()
        }
    }

    /// Scene-to-screen transform used by the render layer.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Screen-to-scene inverse transform used for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    /// Resolve a raw client position into scene coordinates.
    pub fn screen_to_scene(&self, client: Point) -> Point {
        self.inverse_transform() * client
    }

    pub fn scene_to_screen(&self, scene: Point) -> Point {
        self.transform() * scene
    }

    /// Set the zoom, keeping the given screen point visually stationary.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let scene_point = self.screen_to_scene(screen_point);
        self.zoom = new_zoom;

        // Solve pan so scene_point lands back under screen_point.
        let new_screen = self.scene_to_screen(scene_point);
        self.pan += Vec2::new(
            screen_point.x - new_screen.x,
            screen_point.y - new_screen.y,
        );
        self.pan = self.limit_pan(self.pan);
    }

    /// One wheel tick at the cursor. Positive delta zooms in.
    pub fn wheel_zoom(&mut self, cursor: Point, delta: f64) {
        let factor = if delta > 0.0 {
            WHEEL_ZOOM_IN
        } else {
            WHEEL_ZOOM_OUT
        };
        self.zoom_at(cursor, factor);
    }

    /// Pinch update from the previous and current two-finger distance,
    /// anchored at the pinch midpoint.
    pub fn pinch_zoom(&mut self, midpoint: Point, prev_distance: f64, distance: f64) {
        if prev_distance <= f64::EPSILON {
            return;
        }
        self.zoom_at(midpoint, distance / prev_distance);
    }

    /// Fixed-step zoom for keyboard/on-screen controls, anchored at the
    /// container center.
    pub fn zoom_step(&mut self, zoom_in: bool) {
        let factor = if zoom_in {
            1.0 + ZOOM_STEP
        } else {
            1.0 - ZOOM_STEP
        };
        let center = Point::new(self.container.width / 2.0, self.container.height / 2.0);
        self.zoom_at(center, factor);
    }

    /// Double-tap toggles between 1.0 and 2.0, recentring when returning to 1.0.
    pub fn double_tap(&mut self, tap_point: Point) {
        if (self.zoom - 1.0).abs() > f64::EPSILON {
            self.zoom = 1.0;
            self.pan = Vec2::ZERO;
        } else {
            self.zoom_at(tap_point, DOUBLE_TAP_ZOOM);
        }
    }

    /// Pan by a screen-space delta, clamped to the soft bounds.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan = self.limit_pan(self.pan + delta);
    }

    /// Clamp a requested pan to the soft bounds: the canvas may overscroll
    /// past the container edges by at most 30% of the container size.
    pub fn limit_pan(&self, requested: Vec2) -> Vec2 {
        let max_x = ((self.canvas.width * self.zoom - self.container.width) / 2.0
            + self.container.width * OVERSCROLL_FRACTION)
            .max(0.0);
        let max_y = ((self.canvas.height * self.zoom - self.container.height) / 2.0
            + self.container.height * OVERSCROLL_FRACTION)
            .max(0.0);
        Vec2::new(
            requested.x.clamp(-max_x, max_x),
            requested.y.clamp(-max_y, max_y),
        )
    }

    /// Reset to the session default: zoom 1, pan (0,0).
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
    }

    pub fn set_container(&mut self, container: Size) {
        self.container = container;
        self.pan = self.limit_pan(self.pan);
    }

    pub fn set_canvas(&mut self, canvas: Size) {
        self.canvas = canvas;
        self.pan = self.limit_pan(self.pan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Size::new(1000.0, 800.0), Size::new(1000.0, 800.0))
    }

    #[test]
    fn test_screen_to_scene_identity() {
        let vp = viewport();
        let p = Point::new(123.0, 456.0);
        let scene = vp.screen_to_scene(p);
        assert!((scene.x - p.x).abs() < 1e-12);
        assert!((scene.y - p.y).abs() < 1e-12);
    }

    #[test]
    fn test_screen_to_scene_with_zoom_and_pan() {
        let mut vp = viewport();
        vp.zoom = 2.0;
        vp.pan = Vec2::new(100.0, 50.0);
        let scene = vp.screen_to_scene(Point::new(300.0, 250.0));
        assert!((scene.x - 100.0).abs() < 1e-12);
        assert!((scene.y - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut vp = viewport();
        vp.zoom_at(Point::ZERO, 0.0001);
        assert!((vp.zoom - MIN_ZOOM).abs() < f64::EPSILON);

        vp.zoom = 1.0;
        vp.zoom_at(Point::ZERO, 1000.0);
        assert!((vp.zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wheel_zoom_anchors_cursor() {
        let mut vp = viewport();
        vp.pan = Vec2::new(20.0, -10.0);
        let cursor = Point::new(400.0, 300.0);
        let before = vp.screen_to_scene(cursor);

        vp.wheel_zoom(cursor, 1.0);
        let after = vp.screen_to_scene(cursor);

        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_pinch_zoom_anchors_midpoint() {
        let mut vp = viewport();
        let midpoint = Point::new(250.0, 420.0);
        let before = vp.screen_to_scene(midpoint);

        vp.pinch_zoom(midpoint, 100.0, 150.0);
        assert!((vp.zoom - 1.5).abs() < 1e-9);

        let after = vp.screen_to_scene(midpoint);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_double_tap_toggle() {
        let mut vp = viewport();
        vp.double_tap(Point::new(100.0, 100.0));
        assert!((vp.zoom - 2.0).abs() < 1e-9);

        vp.double_tap(Point::new(100.0, 100.0));
        assert!((vp.zoom - 1.0).abs() < 1e-9);
        assert_eq!(vp.pan, Vec2::ZERO);
    }

    #[test]
    fn test_pan_bound_small_canvas() {
        // Canvas smaller than the container at zoom 1: pan magnitude must
        // never exceed 30% of the container in either direction.
        let vp = Viewport::new(Size::new(1000.0, 800.0), Size::new(400.0, 300.0));
        for requested in [
            Vec2::new(1e6, 1e6),
            Vec2::new(-1e6, -1e6),
            Vec2::new(500.0, -9000.0),
        ] {
            let limited = vp.limit_pan(requested);
            assert!(limited.x.abs() <= 1000.0 * OVERSCROLL_FRACTION + 1e-9);
            assert!(limited.y.abs() <= 800.0 * OVERSCROLL_FRACTION + 1e-9);
        }
    }

    #[test]
    fn test_pan_bound_zoomed_in() {
        let mut vp = viewport();
        vp.zoom = 4.0;
        // (1000*4 - 1000)/2 + 1000*0.3 = 1800
        let limited = vp.limit_pan(Vec2::new(5000.0, 0.0));
        assert!((limited.x - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_step() {
        let mut vp = viewport();
        vp.zoom_step(true);
        assert!((vp.zoom - 1.2).abs() < 1e-9);
        vp.zoom_step(false);
        assert!((vp.zoom - 0.96).abs() < 1e-9);
    }
}
