//! Scale calibration tool: place two reference points, then declare the
//! real-world distance between them.

use std::time::{Duration, Instant};

use kurbo::Point;

use crate::snap::ortho_snap;

/// The pointer must sit still this long before a hold starts counting.
pub const STILL_DURATION: Duration = Duration::from_millis(500);

/// Total press duration for a hold placement.
pub const HOLD_DURATION: Duration = Duration::from_millis(1000);

/// Pointer travel (scene pixels) that resets the stillness window.
const STILL_SLOP: f64 = 4.0;

/// Tracks a press-and-hold placement gesture. Timestamps are injected so
/// the timer is testable without real waiting.
#[derive(Debug, Clone)]
pub struct HoldTimer {
    pressed_at: Instant,
    still_since: Instant,
    position: Point,
}

impl HoldTimer {
    pub fn start(now: Instant, position: Point) -> Self {
        Self {
            pressed_at: now,
            still_since: now,
            position,
        }
    }

    /// Feed a pointer position; movement beyond the slop restarts the
    /// stillness window at the new position.
    pub fn update(&mut self, now: Instant, position: Point) {
        if self.position.distance(position) > STILL_SLOP {
            self.still_since = now;
            self.position = position;
        }
    }

    /// The hold completes once the press has lasted long enough and the
    /// pointer has been still long enough.
    pub fn is_complete(&self, now: Instant) -> bool {
        now.duration_since(self.pressed_at) >= HOLD_DURATION
            && now.duration_since(self.still_since) >= STILL_DURATION
    }

    /// Where the point lands if the hold completes.
    pub fn position(&self) -> Point {
        self.position
    }
}

#[derive(Debug, Clone, Default)]
pub enum CalibrateState {
    #[default]
    Idle,
    /// First reference point placed.
    PlacingSecond { first: Point },
    /// Both points placed; waiting for the declared distance.
    AwaitingLength { first: Point, second: Point },
}

#[derive(Debug, Clone, Default)]
pub struct CalibrateTool {
    pub state: CalibrateState,
}

impl CalibrateTool {
    /// Place a reference point (from a tap or a completed hold). The
    /// second point is always ortho-constrained against the first so the
    /// reference segment runs along a wall.
    pub fn place_point(&mut self, point: Point) {
        match self.state {
            CalibrateState::Idle => {
                self.state = CalibrateState::PlacingSecond { first: point };
            }
            CalibrateState::PlacingSecond { first } => {
                let second = ortho_snap(first, point);
                if (second - first).hypot() < f64::EPSILON {
                    return;
                }
                self.state = CalibrateState::AwaitingLength { first, second };
            }
            CalibrateState::AwaitingLength { .. } => {}
        }
    }

    /// Preview for the second point, ortho-snapped.
    pub fn preview(&self, pointer: Point) -> Option<(Point, Point)> {
        match self.state {
            CalibrateState::PlacingSecond { first } => Some((first, ortho_snap(first, pointer))),
            _ => None,
        }
    }

    /// Commit the declared real-world length in millimeters, yielding the
    /// reference segment. Non-finite or non-positive lengths are rejected
    /// and the tool stays in the awaiting state.
    pub fn commit_length(&mut self, declared_mm: f64) -> Option<(Point, Point, f64)> {
        let CalibrateState::AwaitingLength { first, second } = self.state else {
            return None;
        };
        if !declared_mm.is_finite() || declared_mm <= 0.0 {
            log::warn!("rejecting calibration length {declared_mm}");
            return None;
        }
        self.state = CalibrateState::Idle;
        Some((first, second, declared_mm))
    }

    pub fn cancel(&mut self) {
        self.state = CalibrateState::Idle;
    }
}
