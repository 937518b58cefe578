//! Millimeter/pixel conversion and scale calibration.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Margin (scene pixels) kept around the canvas when computing the auto-fit scale.
pub const AUTO_FIT_MARGIN: f64 = 40.0;

/// Converts between world millimeters and scene pixels.
///
/// The effective scale (pixels per millimeter) is either a user calibration
/// or an auto-fit value derived from container and real-world canvas size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConverter {
    /// Scale derived from fitting the canvas into the container (px/mm).
    auto_fit_scale: f64,
    /// User calibration, overrides auto-fit when set (px/mm).
    calibrated_scale: Option<f64>,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self {
            auto_fit_scale: 1.0,
            calibrated_scale: None,
        }
    }
}

impl UnitConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the auto-fit scale from the container size (pixels) and the
    /// canvas's real-world dimensions (millimeters).
    pub fn fit_to_container(&mut self, container: Size, real_mm: Size) {
        if real_mm.width <= 0.0 || real_mm.height <= 0.0 {
            return;
        }
        let usable = Size::new(
            (container.width - AUTO_FIT_MARGIN * 2.0).max(1.0),
            (container.height - AUTO_FIT_MARGIN * 2.0).max(1.0),
        );
        self.auto_fit_scale = (usable.width / real_mm.width).min(usable.height / real_mm.height);
    }

    /// The scale currently used for all conversions (px/mm).
    pub fn effective_scale(&self) -> f64 {
        self.calibrated_scale.unwrap_or(self.auto_fit_scale)
    }

    /// The user calibration, if one is active.
    pub fn calibrated_scale(&self) -> Option<f64> {
        self.calibrated_scale
    }

    pub fn auto_fit_scale(&self) -> f64 {
        self.auto_fit_scale
    }

    /// Install a user calibration (px/mm). Ignores non-positive values.
    pub fn set_calibrated_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.calibrated_scale = Some(scale);
        }
    }

    /// Drop the calibration, reverting to the auto-fit scale.
    pub fn clear_calibration(&mut self) {
        self.calibrated_scale = None;
    }

    pub fn mm_to_px(&self, mm: f64) -> f64 {
        mm * self.effective_scale()
    }

    pub fn px_to_mm(&self, px: f64) -> f64 {
        px / self.effective_scale()
    }

    /// Convert a scene-pixel point to world millimeters.
    pub fn scene_to_world(&self, scene: kurbo::Point) -> kurbo::Point {
        let s = self.effective_scale();
        kurbo::Point::new(scene.x / s, scene.y / s)
    }

    /// Convert a world-millimeter point to scene pixels.
    pub fn world_to_scene(&self, world: kurbo::Point) -> kurbo::Point {
        let s = self.effective_scale();
        kurbo::Point::new(world.x * s, world.y * s)
    }
}

/// Derive a calibration scale from two clicked points and the declared
/// real-world distance between them. Returns px/mm.
pub fn calibration_scale(p1: kurbo::Point, p2: kurbo::Point, declared_mm: f64) -> Option<f64> {
    if !declared_mm.is_finite() || declared_mm <= 0.0 {
        return None;
    }
    let dist = p1.distance(p2);
    if dist <= f64::EPSILON {
        return None;
    }
    Some(dist / declared_mm)
}

/// A measurement taken on the canvas.
///
/// The raw pixel distance is what the user actually measured; the scale
/// reference is the px/mm scale that was active at measurement time and is
/// rewritten whenever a new calibration is applied, so displayed distances
/// stay consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub id: Uuid,
    /// Measured distance in scene pixels. Never changes after creation.
    pub raw_px: f64,
    /// Scale (px/mm) used to display this measurement.
    pub scale_ref: f64,
}

impl Measurement {
    pub fn new(raw_px: f64, scale_ref: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            raw_px,
            scale_ref,
        }
    }

    /// The distance shown to the user, in millimeters.
    pub fn display_mm(&self) -> f64 {
        self.raw_px / self.scale_ref
    }

    /// Point this measurement at a new scale. The raw pixel distance is kept.
    pub fn rescale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.scale_ref = scale;
        }
    }
}
