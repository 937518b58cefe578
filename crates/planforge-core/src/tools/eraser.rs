//! Eraser tool with kind-gated sub-modes.

use serde::{Deserialize, Serialize};

use crate::elements::ElementKind;

/// What the eraser is allowed to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EraserMode {
    /// Deletes any element kind.
    #[default]
    Universal,
    /// Deletes drawn geometry but leaves text annotations alone.
    Shape,
    /// Reserved for placed furniture items; deletes none of the drawn
    /// element kinds.
    Furniture,
}

#[derive(Debug, Clone, Default)]
pub struct EraserTool {
    pub mode: EraserMode,
}

impl EraserTool {
    /// Whether the current mode deletes elements of `kind`.
    pub fn erases(&self, kind: ElementKind) -> bool {
        match self.mode {
            EraserMode::Universal => true,
            EraserMode::Shape => !matches!(kind, ElementKind::Text),
            EraserMode::Furniture => false,
        }
    }
}
