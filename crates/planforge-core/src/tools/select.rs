//! Select tool: click selection, multi-select toggling, drag moves and
//! handle resizing.

use kurbo::{Point, Vec2};

use crate::elements::ElementId;
use crate::transform::ResizeHandle;

/// The set of selected element ids, in selection order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn select_only(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Add or remove an id, for modifier-click multi-select.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.ids.iter().position(|&i| i == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub enum SelectState {
    #[default]
    Idle,
    /// Moving the selection; `last` is the previous pointer position so
    /// moves apply as deltas and the grab point never jumps.
    Dragging { last: Point, moved: bool },
    /// Dragging a resize handle of one element.
    Resizing { id: ElementId, handle: ResizeHandle },
}

#[derive(Debug, Clone, Default)]
pub struct SelectTool {
    pub state: SelectState,
    pub selection: Selection,
}

impl SelectTool {
    /// Handle a press at a world position. `hit` is the topmost element
    /// under the pointer, if any.
    pub fn press(&mut self, point: Point, hit: Option<ElementId>, toggle: bool) {
        match hit {
            Some(id) => {
                if toggle {
                    self.selection.toggle(id);
                } else if !self.selection.contains(id) {
                    self.selection.select_only(id);
                }
                if self.selection.contains(id) {
                    self.state = SelectState::Dragging {
                        last: point,
                        moved: false,
                    };
                }
            }
            None => {
                if !toggle {
                    self.selection.clear();
                }
                self.state = SelectState::Idle;
            }
        }
    }

    /// Start a resize session on a handle.
    pub fn begin_resize(&mut self, id: ElementId, handle: ResizeHandle) {
        self.state = SelectState::Resizing { id, handle };
    }

    /// Pointer moved while dragging; returns the world delta to apply to
    /// every selected element.
    pub fn drag(&mut self, point: Point) -> Option<Vec2> {
        if let SelectState::Dragging { last, moved } = &mut self.state {
            let delta = point - *last;
            *last = point;
            *moved = true;
            Some(delta)
        } else {
            None
        }
    }

    /// The in-flight resize session, if any.
    pub fn resizing(&self) -> Option<(ElementId, ResizeHandle)> {
        match self.state {
            SelectState::Resizing { id, handle } => Some((id, handle)),
            _ => None,
        }
    }

    /// Finish the interaction. Returns true when the gesture changed
    /// geometry (a move or resize happened, not a plain click).
    pub fn release(&mut self) -> bool {
        let changed = match self.state {
            SelectState::Dragging { moved, .. } => moved,
            SelectState::Resizing { .. } => true,
            SelectState::Idle => false,
        };
        self.state = SelectState::Idle;
        changed
    }

    pub fn cancel(&mut self) {
        self.state = SelectState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_click_selects_only() {
        let mut tool = SelectTool::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        tool.press(Point::ZERO, Some(a), false);
        tool.release();
        tool.press(Point::ZERO, Some(b), false);
        assert!(tool.selection.contains(b));
        assert!(!tool.selection.contains(a));
        assert_eq!(tool.selection.len(), 1);
    }

    #[test]
    fn test_modifier_click_toggles() {
        let mut tool = SelectTool::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        tool.press(Point::ZERO, Some(a), false);
        tool.release();
        tool.press(Point::ZERO, Some(b), true);
        assert_eq!(tool.selection.len(), 2);
        tool.release();
        tool.press(Point::ZERO, Some(a), true);
        assert!(!tool.selection.contains(a));
        assert!(tool.selection.contains(b));
    }

    #[test]
    fn test_empty_click_clears_selection() {
        let mut tool = SelectTool::default();
        tool.press(Point::ZERO, Some(Uuid::new_v4()), false);
        tool.release();
        tool.press(Point::ZERO, None, false);
        assert!(tool.selection.is_empty());
    }

    #[test]
    fn test_drag_yields_deltas() {
        let mut tool = SelectTool::default();
        tool.press(Point::ZERO, Some(Uuid::new_v4()), false);
        let d1 = tool.drag(Point::new(10.0, 5.0)).unwrap();
        assert_eq!(d1, Vec2::new(10.0, 5.0));
        let d2 = tool.drag(Point::new(15.0, 5.0)).unwrap();
        assert_eq!(d2, Vec2::new(5.0, 0.0));
        assert!(tool.release());
    }

    #[test]
    fn test_plain_click_reports_no_change() {
        let mut tool = SelectTool::default();
        tool.press(Point::ZERO, Some(Uuid::new_v4()), false);
        assert!(!tool.release());
    }

    #[test]
    fn test_resize_session() {
        let mut tool = SelectTool::default();
        let id = Uuid::new_v4();
        tool.begin_resize(id, ResizeHandle::SouthEast);
        assert_eq!(tool.resizing(), Some((id, ResizeHandle::SouthEast)));
        assert!(tool.drag(Point::ZERO).is_none());
        assert!(tool.release());
        assert!(tool.resizing().is_none());
    }
}
