//! Interaction tools.
//!
//! Every tool carries an explicit state enum; the editor routes pointer and
//! key events to the active tool and applies the edits it emits.

mod calibrate;
mod eraser;
mod line;
mod pen;
mod select;
mod shape;
mod text;

pub use calibrate::{CalibrateState, CalibrateTool, HoldTimer, HOLD_DURATION, STILL_DURATION};
pub use eraser::{EraserMode, EraserTool};
pub use line::{LineState, LineTool};
pub use pen::{PenState, PenTool, FREEHAND_MIN_LENGTH, FREEHAND_MIN_SPACING};
pub use select::{SelectState, SelectTool, Selection};
pub use shape::{ShapeKind, ShapeState, ShapeTool};
pub use text::{TextState, TextTool};

use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Select,
    Line,
    Rectangle,
    Ellipse,
    Text,
    Pen,
    Eraser,
    Calibrate,
}

/// The active tool with its in-progress state.
#[derive(Debug, Clone)]
pub enum ActiveTool {
    Select(SelectTool),
    Line(LineTool),
    Shape(ShapeTool),
    Text(TextTool),
    Pen(PenTool),
    Eraser(EraserTool),
    Calibrate(CalibrateTool),
}

impl ActiveTool {
    pub fn new(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Select => ActiveTool::Select(SelectTool::default()),
            ToolKind::Line => ActiveTool::Line(LineTool::default()),
            ToolKind::Rectangle => ActiveTool::Shape(ShapeTool::new(ShapeKind::Rectangle)),
            ToolKind::Ellipse => ActiveTool::Shape(ShapeTool::new(ShapeKind::Ellipse)),
            ToolKind::Text => ActiveTool::Text(TextTool::default()),
            ToolKind::Pen => ActiveTool::Pen(PenTool::default()),
            ToolKind::Eraser => ActiveTool::Eraser(EraserTool::default()),
            ToolKind::Calibrate => ActiveTool::Calibrate(CalibrateTool::default()),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ActiveTool::Select(_) => ToolKind::Select,
            ActiveTool::Line(_) => ToolKind::Line,
            ActiveTool::Shape(t) => match t.kind {
                ShapeKind::Rectangle => ToolKind::Rectangle,
                ShapeKind::Ellipse => ToolKind::Ellipse,
            },
            ActiveTool::Text(_) => ToolKind::Text,
            ActiveTool::Pen(_) => ToolKind::Pen,
            ActiveTool::Eraser(_) => ToolKind::Eraser,
            ActiveTool::Calibrate(_) => ToolKind::Calibrate,
        }
    }

    /// Abort any in-progress interaction, returning the tool to idle.
    pub fn cancel(&mut self) {
        match self {
            ActiveTool::Select(t) => t.cancel(),
            ActiveTool::Line(t) => t.cancel(),
            ActiveTool::Shape(t) => t.cancel(),
            ActiveTool::Text(t) => t.cancel(),
            ActiveTool::Pen(t) => t.cancel(),
            ActiveTool::Eraser(_) => {}
            ActiveTool::Calibrate(t) => t.cancel(),
        }
    }

    /// Whether an interaction is mid-flight (affects pan fall-through).
    pub fn is_active(&self) -> bool {
        match self {
            ActiveTool::Select(t) => !matches!(t.state, SelectState::Idle),
            ActiveTool::Line(t) => !matches!(t.state, LineState::Idle),
            ActiveTool::Shape(t) => !matches!(t.state, ShapeState::Idle),
            ActiveTool::Text(t) => !matches!(t.state, TextState::Idle),
            ActiveTool::Pen(t) => !matches!(t.state, PenState::Idle),
            ActiveTool::Eraser(_) => false,
            ActiveTool::Calibrate(t) => !matches!(t.state, CalibrateState::Idle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_kind_round_trip() {
        for kind in [
            ToolKind::Select,
            ToolKind::Line,
            ToolKind::Rectangle,
            ToolKind::Ellipse,
            ToolKind::Text,
            ToolKind::Pen,
            ToolKind::Eraser,
            ToolKind::Calibrate,
        ] {
            assert_eq!(ActiveTool::new(kind).kind(), kind);
        }
    }

    #[test]
    fn test_new_tool_is_idle() {
        assert!(!ActiveTool::new(ToolKind::Line).is_active());
        assert!(!ActiveTool::new(ToolKind::Select).is_active());
    }
}
