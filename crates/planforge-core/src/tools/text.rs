//! Text tool: click to place an anchor, then commit or cancel the entry.

use kurbo::Point;

#[derive(Debug, Clone, Default)]
pub enum TextState {
    #[default]
    Idle,
    /// Anchor placed, waiting for the text entry to finish.
    Pending { anchor: Point },
}

#[derive(Debug, Clone, Default)]
pub struct TextTool {
    pub state: TextState,
}

impl TextTool {
    /// Place the anchor for a new annotation. A second click before the
    /// entry commits moves the anchor.
    pub fn place(&mut self, point: Point) {
        self.state = TextState::Pending { anchor: point };
    }

    /// Commit the entered content. Whitespace-only content cancels the
    /// placement instead of creating an empty element.
    pub fn commit(&mut self, content: &str) -> Option<(Point, String)> {
        let TextState::Pending { anchor } = self.state else {
            return None;
        };
        self.state = TextState::Idle;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some((anchor, trimmed.to_owned()))
    }

    pub fn cancel(&mut self) {
        self.state = TextState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_then_commit() {
        let mut tool = TextTool::default();
        tool.place(Point::new(10.0, 20.0));
        let (anchor, content) = tool.commit("  Dining table ").unwrap();
        assert_eq!(anchor, Point::new(10.0, 20.0));
        assert_eq!(content, "Dining table");
        assert!(matches!(tool.state, TextState::Idle));
    }

    #[test]
    fn test_empty_commit_creates_nothing() {
        let mut tool = TextTool::default();
        tool.place(Point::ZERO);
        assert!(tool.commit("   ").is_none());
        assert!(matches!(tool.state, TextState::Idle));
    }

    #[test]
    fn test_commit_without_anchor() {
        let mut tool = TextTool::default();
        assert!(tool.commit("hello").is_none());
    }

    #[test]
    fn test_second_click_moves_anchor() {
        let mut tool = TextTool::default();
        tool.place(Point::ZERO);
        tool.place(Point::new(5.0, 5.0));
        let (anchor, _) = tool.commit("x").unwrap();
        assert_eq!(anchor, Point::new(5.0, 5.0));
    }
}
