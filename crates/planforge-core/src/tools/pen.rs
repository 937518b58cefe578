//! Pen tool: freehand strokes and click-placed polylines.

use kurbo::Point;

use crate::snap::{angle_snap_endpoint, SnapSettings, ANGLE_SNAP_INCREMENT};

/// Minimum spacing between sampled freehand points, in scene pixels.
/// Callers convert to world units for the current zoom before sampling.
pub const FREEHAND_MIN_SPACING: f64 = 3.0;

/// Minimum total freehand stroke length (scene pixels) to commit.
pub const FREEHAND_MIN_LENGTH: f64 = 10.0;

#[derive(Debug, Clone, Default)]
pub enum PenState {
    #[default]
    Idle,
    /// Sampling a dragged stroke.
    Freehand { points: Vec<Point> },
    /// Placing vertices click by click.
    Polyline { points: Vec<Point> },
}

#[derive(Debug, Clone, Default)]
pub struct PenTool {
    pub state: PenState,
}

impl PenTool {
    /// Start a freehand stroke at a world position.
    pub fn begin_stroke(&mut self, point: Point) {
        self.state = PenState::Freehand {
            points: vec![point],
        };
    }

    /// Sample the pointer during a freehand drag. Points closer than
    /// `min_spacing` (world units) to the previous sample are dropped.
    pub fn sample(&mut self, point: Point, min_spacing: f64) {
        if let PenState::Freehand { points } = &mut self.state {
            let far_enough = points
                .last()
                .map(|last| last.distance(point) >= min_spacing)
                .unwrap_or(true);
            if far_enough {
                points.push(point);
            }
        }
    }

    /// Finish a freehand stroke. Strokes shorter than `min_length` (world
    /// units) are discarded.
    pub fn finish_stroke(&mut self, min_length: f64) -> Option<Vec<Point>> {
        let points = match std::mem::take(&mut self.state) {
            PenState::Freehand { points } => points,
            other => {
                self.state = other;
                return None;
            }
        };
        let length: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
        if points.len() < 2 || length < min_length {
            log::debug!("discarding short stroke ({length:.1} units)");
            return None;
        }
        Some(points)
    }

    /// Add a vertex in click-to-place mode, angle-snapped against the
    /// previous vertex when enabled.
    pub fn add_vertex(&mut self, point: Point, settings: &SnapSettings) {
        match &mut self.state {
            PenState::Polyline { points } => {
                let snapped = match points.last() {
                    Some(prev) if settings.angle_enabled => {
                        angle_snap_endpoint(*prev, point, ANGLE_SNAP_INCREMENT)
                    }
                    _ => point,
                };
                points.push(snapped);
            }
            PenState::Idle => {
                self.state = PenState::Polyline {
                    points: vec![point],
                };
            }
            PenState::Freehand { .. } => {}
        }
    }

    /// Commit the click-placed polyline. Fewer than two vertices yields
    /// nothing.
    pub fn finish_polyline(&mut self) -> Option<Vec<Point>> {
        let points = match std::mem::take(&mut self.state) {
            PenState::Polyline { points } => points,
            other => {
                self.state = other;
                return None;
            }
        };
        if points.len() < 2 {
            return None;
        }
        Some(points)
    }

    /// Live preview of the next polyline segment: the snapped endpoint plus
    /// its length and angle in degrees, for the on-canvas readout.
    pub fn preview_segment(
        &self,
        pointer: Point,
        settings: &SnapSettings,
    ) -> Option<(Point, f64, f64)> {
        let PenState::Polyline { points } = &self.state else {
            return None;
        };
        let prev = *points.last()?;
        let end = if settings.angle_enabled {
            angle_snap_endpoint(prev, pointer, ANGLE_SNAP_INCREMENT)
        } else {
            pointer
        };
        let delta = end - prev;
        let angle = delta.y.atan2(delta.x).to_degrees().rem_euclid(360.0);
        Some((end, delta.hypot(), angle))
    }

    /// The in-progress points, for preview rendering.
    pub fn preview(&self) -> &[Point] {
        match &self.state {
            PenState::Idle => &[],
            PenState::Freehand { points } | PenState::Polyline { points } => points,
        }
    }

    pub fn cancel(&mut self) {
        self.state = PenState::Idle;
    }
}
