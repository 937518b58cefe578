//! Snapping for drawing and dragging: grid, orthogonal, angle increments
//! and alignment against existing geometry.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default grid cell size in millimeters.
pub const GRID_SIZE: f64 = 100.0;

/// Angle snap increment in degrees.
pub const ANGLE_SNAP_INCREMENT: f64 = 5.0;

/// Alignment snap threshold in scene pixels, applied per axis.
pub const ALIGNMENT_THRESHOLD: f64 = 8.0;

/// Guides closer than this (scene pixels) collapse into one.
pub const GUIDE_MERGE_DISTANCE: f64 = 1.0;

/// Which snap behaviors are active. Tools consult this each pointer move.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SnapSettings {
    pub grid_enabled: bool,
    /// Grid cell size in millimeters.
    pub grid_size: f64,
    /// Constrain lines to horizontal/vertical.
    pub ortho_enabled: bool,
    /// Snap line angles to increments.
    pub angle_enabled: bool,
    /// Smart guides against other elements.
    pub alignment_enabled: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            grid_enabled: false,
            grid_size: GRID_SIZE,
            ortho_enabled: true,
            angle_enabled: true,
            alignment_enabled: true,
        }
    }
}

/// Result of a point snap operation.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    pub point: Point,
    pub snapped_x: bool,
    pub snapped_y: bool,
}

impl SnapResult {
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    SnapResult {
        point: Point::new(
            (point.x / grid_size).round() * grid_size,
            (point.y / grid_size).round() * grid_size,
        ),
        snapped_x: true,
        snapped_y: true,
    }
}

/// Constrain an endpoint to the dominant axis relative to `start`.
///
/// The axis with the larger absolute delta wins; on a tie the horizontal
/// axis is kept.
pub fn ortho_snap(start: Point, end: Point) -> Point {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() >= dy.abs() {
        Point::new(end.x, start.y)
    } else {
        Point::new(start.x, end.y)
    }
}

/// Snap an angle in degrees to the nearest increment, normalized to `[0, 360)`.
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    let snapped = (angle_degrees / increment).round() * increment;
    snapped.rem_euclid(360.0)
}

/// Snap a line endpoint to the nearest angle increment from `start`,
/// preserving the segment length.
pub fn angle_snap_endpoint(start: Point, end: Point, increment: f64) -> Point {
    let delta = end - start;
    let distance = delta.hypot();
    if distance < f64::EPSILON {
        return end;
    }
    let angle = delta.y.atan2(delta.x).to_degrees();
    let snapped = snap_angle(angle, increment).to_radians();
    start + Vec2::new(distance * snapped.cos(), distance * snapped.sin())
}

/// A smart-guide line rendered while alignment snapping is active.
/// Positions are in scene pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnapGuide {
    /// Guide along `y = position`.
    Horizontal { position: f64 },
    /// Guide along `x = position`.
    Vertical { position: f64 },
}

impl SnapGuide {
    fn position(&self) -> f64 {
        match self {
            SnapGuide::Horizontal { position } | SnapGuide::Vertical { position } => *position,
        }
    }

    fn same_axis(&self, other: &SnapGuide) -> bool {
        matches!(
            (self, other),
            (SnapGuide::Horizontal { .. }, SnapGuide::Horizontal { .. })
                | (SnapGuide::Vertical { .. }, SnapGuide::Vertical { .. })
        )
    }
}

/// Outcome of an alignment snap: the adjusted point plus the guides to draw.
#[derive(Debug, Clone)]
pub struct AlignmentOutcome {
    pub point: Point,
    pub guides: Vec<SnapGuide>,
}

impl AlignmentOutcome {
    pub fn none(point: Point) -> Self {
        Self {
            point,
            guides: Vec::new(),
        }
    }
}

/// Snap a point independently on each axis against candidate alignment
/// targets, emitting one guide per snapped axis. All values are scene
/// pixels so the threshold stays constant regardless of zoom.
pub fn alignment_snap(point: Point, targets: &[Point], threshold: f64) -> AlignmentOutcome {
    let mut best_x: Option<(f64, f64)> = None;
    let mut best_y: Option<(f64, f64)> = None;

    for target in targets {
        let dx = (point.x - target.x).abs();
        if dx <= threshold && best_x.map_or(true, |(d, _)| dx < d) {
            best_x = Some((dx, target.x));
        }
        let dy = (point.y - target.y).abs();
        if dy <= threshold && best_y.map_or(true, |(d, _)| dy < d) {
            best_y = Some((dy, target.y));
        }
    }

    let mut snapped = point;
    let mut guides = Vec::new();
    if let Some((_, x)) = best_x {
        snapped.x = x;
        guides.push(SnapGuide::Vertical { position: x });
    }
    if let Some((_, y)) = best_y {
        snapped.y = y;
        guides.push(SnapGuide::Horizontal { position: y });
    }

    AlignmentOutcome {
        point: snapped,
        guides,
    }
}

/// Collapse guides on the same axis that sit within [`GUIDE_MERGE_DISTANCE`]
/// of each other, keeping the first occurrence.
pub fn merge_guides(guides: Vec<SnapGuide>) -> Vec<SnapGuide> {
    let mut merged: Vec<SnapGuide> = Vec::with_capacity(guides.len());
    for guide in guides {
        let duplicate = merged.iter().any(|kept| {
            kept.same_axis(&guide) && (kept.position() - guide.position()).abs() <= GUIDE_MERGE_DISTANCE
        });
        if !duplicate {
            merged.push(guide);
        }
    }
    merged
}
