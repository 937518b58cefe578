//! PlanForge Core Library
//!
//! Platform-agnostic canvas interaction and geometry engine for the
//! PlanForge floor-plan editor: unit conversion between millimeters and
//! pixels, viewport pan/zoom, snapping, per-tool interaction state
//! machines, and rotation-aware resize transforms.

pub mod editor;
pub mod elements;
pub mod input;
pub mod snap;
pub mod store;
pub mod tools;
pub mod transform;
pub mod units;
pub mod viewport;

pub use editor::Editor;
pub use elements::{Element, ElementId, ElementKind, ElementStyle, LayerId, SerializableColor};
pub use input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent, TouchEvent};
pub use snap::{SnapGuide, SnapResult, SnapSettings, snap_to_grid, GRID_SIZE};
pub use store::{EditError, ElementStore, LayerInfo, PersistHook, PersistPayload};
pub use tools::{ActiveTool, ToolKind};
pub use transform::ResizeHandle;
pub use units::{Measurement, UnitConverter};
pub use viewport::Viewport;
