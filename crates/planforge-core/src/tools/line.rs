//! Line tool: click to set the start, click again to commit.

use kurbo::Point;

use crate::snap::{angle_snap_endpoint, ortho_snap, SnapSettings, ANGLE_SNAP_INCREMENT};

#[derive(Debug, Clone, Default)]
pub enum LineState {
    #[default]
    Idle,
    /// First point placed; the preview endpoint follows the pointer.
    Drawing { start: Point },
}

#[derive(Debug, Clone, Default)]
pub struct LineTool {
    pub state: LineState,
    /// When set, committing a segment immediately starts the next one from
    /// the committed endpoint.
    pub continuous: bool,
    /// Continuous mode forced by a held modifier key. The editor refreshes
    /// this on every click, so it lasts exactly as long as the key is held.
    pub forced_continuous: bool,
}

impl LineTool {
    /// Handle a click at a world position. Returns a committed segment when
    /// this click completes one.
    pub fn click(&mut self, point: Point, settings: &SnapSettings) -> Option<(Point, Point)> {
        match self.state {
            LineState::Idle => {
                self.state = LineState::Drawing { start: point };
                None
            }
            LineState::Drawing { start } => {
                let end = self.constrain(start, point, settings);
                if (end - start).hypot() < f64::EPSILON {
                    return None;
                }
                self.state = if self.continuous || self.forced_continuous {
                    LineState::Drawing { start: end }
                } else {
                    LineState::Idle
                };
                Some((start, end))
            }
        }
    }

    /// Preview segment for the current pointer position, snapped.
    pub fn preview(&self, pointer: Point, settings: &SnapSettings) -> Option<(Point, Point)> {
        match self.state {
            LineState::Idle => None,
            LineState::Drawing { start } => Some((start, self.constrain(start, pointer, settings))),
        }
    }

    fn constrain(&self, start: Point, end: Point, settings: &SnapSettings) -> Point {
        if settings.ortho_enabled {
            ortho_snap(start, end)
        } else if settings.angle_enabled {
            angle_snap_endpoint(start, end, ANGLE_SNAP_INCREMENT)
        } else {
            end
        }
    }

    pub fn cancel(&mut self) {
        self.state = LineState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_settings() -> SnapSettings {
        SnapSettings {
            ortho_enabled: false,
            angle_enabled: false,
            ..SnapSettings::default()
        }
    }

    #[test]
    fn test_click_click_commits_segment() {
        let mut tool = LineTool::default();
        let settings = free_settings();
        assert!(tool.click(Point::ZERO, &settings).is_none());
        let segment = tool.click(Point::new(100.0, 40.0), &settings).unwrap();
        assert_eq!(segment, (Point::ZERO, Point::new(100.0, 40.0)));
        assert!(matches!(tool.state, LineState::Idle));
    }

    #[test]
    fn test_continuous_mode_chains_segments() {
        let mut tool = LineTool {
            continuous: true,
            ..LineTool::default()
        };
        let settings = free_settings();
        tool.click(Point::ZERO, &settings);
        let first = tool.click(Point::new(100.0, 0.0), &settings).unwrap();
        // The next segment starts where the previous ended.
        let second = tool.click(Point::new(100.0, 50.0), &settings).unwrap();
        assert_eq!(second.0, first.1);
    }

    #[test]
    fn test_modifier_forces_continuous_for_the_chord() {
        let mut tool = LineTool::default();
        let settings = free_settings();
        tool.forced_continuous = true;
        tool.click(Point::ZERO, &settings);
        let first = tool.click(Point::new(100.0, 0.0), &settings).unwrap();
        let second = tool.click(Point::new(100.0, 50.0), &settings).unwrap();
        assert_eq!(second.0, first.1);
        // Modifier released: the next commit ends the chord.
        tool.forced_continuous = false;
        tool.click(Point::new(200.0, 50.0), &settings).unwrap();
        assert!(matches!(tool.state, LineState::Idle));
    }

    #[test]
    fn test_ortho_snap_applied_on_commit() {
        let mut tool = LineTool::default();
        let settings = SnapSettings::default();
        tool.click(Point::ZERO, &settings);
        let (_, end) = tool.click(Point::new(100.0, 7.0), &settings).unwrap();
        assert_eq!(end, Point::new(100.0, 0.0));
    }

    #[test]
    fn test_angle_snap_when_ortho_disabled() {
        let mut tool = LineTool::default();
        let settings = SnapSettings {
            ortho_enabled: false,
            ..SnapSettings::default()
        };
        tool.click(Point::ZERO, &settings);
        let (_, end) = tool.click(Point::new(100.0, 4.0), &settings).unwrap();
        // ~2.3° snaps to 0° with length preserved.
        assert!(end.y.abs() < 1e-9);
        assert!((end.x - (100.0_f64.powi(2) + 16.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_zero_length_click_ignored() {
        let mut tool = LineTool::default();
        let settings = free_settings();
        tool.click(Point::ZERO, &settings);
        assert!(tool.click(Point::ZERO, &settings).is_none());
        assert!(matches!(tool.state, LineState::Drawing { .. }));
    }

    #[test]
    fn test_cancel_discards_start() {
        let mut tool = LineTool::default();
        tool.click(Point::ZERO, &free_settings());
        tool.cancel();
        assert!(matches!(tool.state, LineState::Idle));
    }
}
