//! Rectangle and ellipse tools: drag from one corner to the opposite one.

use kurbo::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
}

#[derive(Debug, Clone, Default)]
pub enum ShapeState {
    #[default]
    Idle,
    Dragging { start: Point },
}

#[derive(Debug, Clone)]
pub struct ShapeTool {
    pub kind: ShapeKind,
    pub state: ShapeState,
}

impl ShapeTool {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            state: ShapeState::Idle,
        }
    }

    pub fn begin(&mut self, point: Point) {
        self.state = ShapeState::Dragging { start: point };
    }

    /// Preview bounds for the current pointer position.
    pub fn preview(&self, pointer: Point) -> Option<Rect> {
        match self.state {
            ShapeState::Idle => None,
            ShapeState::Dragging { start } => Some(Rect::from_points(start, pointer)),
        }
    }

    /// Finish the drag. Returns the normalized bounds, or None when either
    /// dimension falls below `min_size` (world mm) and the shape is
    /// discarded.
    pub fn finish(&mut self, pointer: Point, min_size: f64) -> Option<Rect> {
        let ShapeState::Dragging { start } = self.state else {
            return None;
        };
        self.state = ShapeState::Idle;
        let rect = Rect::from_points(start, pointer);
        if rect.width() < min_size || rect.height() < min_size {
            log::debug!("discarding degenerate shape drag ({:.1}x{:.1})", rect.width(), rect.height());
            return None;
        }
        Some(rect)
    }

    pub fn cancel(&mut self) {
        self.state = ShapeState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_commits_normalized_bounds() {
        let mut tool = ShapeTool::new(ShapeKind::Rectangle);
        tool.begin(Point::new(100.0, 80.0));
        let rect = tool.finish(Point::new(20.0, 30.0), 5.0).unwrap();
        assert_eq!(rect, Rect::new(20.0, 30.0, 100.0, 80.0));
        assert!(matches!(tool.state, ShapeState::Idle));
    }

    #[test]
    fn test_tiny_drag_discarded() {
        let mut tool = ShapeTool::new(ShapeKind::Ellipse);
        tool.begin(Point::ZERO);
        assert!(tool.finish(Point::new(4.0, 4.0), 5.0).is_none());

        tool.begin(Point::ZERO);
        assert!(tool.finish(Point::new(6.0, 6.0), 5.0).is_some());
    }

    #[test]
    fn test_thin_drag_discarded() {
        let mut tool = ShapeTool::new(ShapeKind::Rectangle);
        tool.begin(Point::ZERO);
        // Wide but flat: still degenerate.
        assert!(tool.finish(Point::new(100.0, 2.0), 5.0).is_none());
    }

    #[test]
    fn test_preview_follows_pointer() {
        let mut tool = ShapeTool::new(ShapeKind::Rectangle);
        assert!(tool.preview(Point::ZERO).is_none());
        tool.begin(Point::ZERO);
        let rect = tool.preview(Point::new(50.0, 20.0)).unwrap();
        assert_eq!(rect, Rect::new(0.0, 0.0, 50.0, 20.0));
    }

    #[test]
    fn test_cancel_discards_drag() {
        let mut tool = ShapeTool::new(ShapeKind::Rectangle);
        tool.begin(Point::ZERO);
        tool.cancel();
        assert!(tool.finish(Point::new(100.0, 100.0), 5.0).is_none());
    }
}
