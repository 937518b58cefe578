//! Element storage: layers, z-ordering and debounced persistence.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::elements::{Element, ElementId, LayerId};

/// Errors surfaced by store edits.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("element {0} not found")]
    MissingElement(ElementId),
    #[error("layer {0} not found")]
    MissingLayer(LayerId),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// Metadata for one drawing layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerInfo {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    /// Overall layer opacity, passed through to renderers.
    #[serde(default = "default_layer_opacity")]
    pub opacity: f64,
    /// Stacking position among layers; lower draws first.
    pub order: u64,
}

fn default_layer_opacity() -> f64 {
    1.0
}

impl LayerInfo {
    pub fn new(name: impl Into<String>, order: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            visible: true,
            opacity: 1.0,
            order,
        }
    }
}

/// Snapshot handed to the persistence hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistPayload {
    pub elements: Vec<Element>,
    pub layers: Vec<LayerInfo>,
    /// Canvas dimensions in millimeters.
    pub canvas_width_mm: f64,
    pub canvas_height_mm: f64,
}

impl PersistPayload {
    /// Serialize for a host that persists documents as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Receives document snapshots when edits settle.
pub trait PersistHook {
    fn persist(&mut self, payload: &PersistPayload);
}

/// In-memory hook used by tests.
#[derive(Debug, Default)]
pub struct MemoryPersist {
    pub snapshots: Vec<PersistPayload>,
}

impl PersistHook for MemoryPersist {
    fn persist(&mut self, payload: &PersistPayload) {
        self.snapshots.push(payload.clone());
    }
}

/// Delay between the last edit and a persist call.
pub const PERSIST_DEBOUNCE: Duration = Duration::from_millis(100);

/// Debounces persistence so rapid edits coalesce into one snapshot.
#[derive(Debug, Default)]
pub struct AutoPersist {
    dirty_since: Option<Instant>,
}

impl AutoPersist {
    /// Record that the document changed at `now`.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty_since = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// True once the debounce window since the last edit has elapsed.
    pub fn should_persist(&self, now: Instant) -> bool {
        self.dirty_since
            .map(|since| now.duration_since(since) >= PERSIST_DEBOUNCE)
            .unwrap_or(false)
    }

    /// Flush through `hook` if the window elapsed; clears the dirty mark.
    pub fn tick(
        &mut self,
        now: Instant,
        payload: impl FnOnce() -> PersistPayload,
        hook: &mut dyn PersistHook,
    ) -> bool {
        if !self.should_persist(now) {
            return false;
        }
        hook.persist(&payload());
        self.dirty_since = None;
        true
    }
}

/// The element store: owns every element plus layer metadata.
///
/// Z-order within a layer is a monotonically increasing counter assigned on
/// insert, so newer elements always draw above older ones.
#[derive(Debug)]
pub struct ElementStore {
    elements: HashMap<ElementId, Element>,
    layers: Vec<LayerInfo>,
    next_order: u64,
    /// Canvas dimensions in millimeters.
    pub canvas_size: Size,
}

impl ElementStore {
    pub fn new(canvas_size: Size) -> Result<Self, EditError> {
        if canvas_size.width <= 0.0 {
            return Err(EditError::NonPositive {
                field: "canvas width",
                value: canvas_size.width,
            });
        }
        if canvas_size.height <= 0.0 {
            return Err(EditError::NonPositive {
                field: "canvas height",
                value: canvas_size.height,
            });
        }
        let default_layer = LayerInfo::new("Default", 0);
        Ok(Self {
            elements: HashMap::new(),
            layers: vec![default_layer],
            next_order: 0,
            canvas_size,
        })
    }

    pub fn default_layer(&self) -> LayerId {
        self.layers[0].id
    }

    pub fn layers(&self) -> &[LayerInfo] {
        &self.layers
    }

    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let order = self.layers.iter().map(|l| l.order + 1).max().unwrap_or(0);
        let layer = LayerInfo::new(name, order);
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    pub fn layer(&self, id: LayerId) -> Option<&LayerInfo> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut LayerInfo> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> Result<(), EditError> {
        let layer = self.layer_mut(id).ok_or(EditError::MissingLayer(id))?;
        layer.visible = visible;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Insert an element, assigning it the next z-order slot.
    pub fn insert(&mut self, mut element: Element) -> ElementId {
        element.set_order(self.next_order);
        self.next_order += 1;
        let id = element.id();
        log::debug!("insert element {id} ({:?})", element.kind());
        self.elements.insert(id, element);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn remove(&mut self, id: ElementId) -> Result<Element, EditError> {
        self.elements
            .remove(&id)
            .ok_or(EditError::MissingElement(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Move an element above everything else on its layer.
    pub fn bring_to_front(&mut self, id: ElementId) -> Result<(), EditError> {
        let order = self.next_order;
        let element = self
            .elements
            .get_mut(&id)
            .ok_or(EditError::MissingElement(id))?;
        element.set_order(order);
        self.next_order += 1;
        Ok(())
    }

    /// Move an element below everything else on its layer.
    pub fn send_to_back(&mut self, id: ElementId) -> Result<(), EditError> {
        let layer = self
            .elements
            .get(&id)
            .ok_or(EditError::MissingElement(id))?
            .layer();
        let min_order = self
            .elements
            .values()
            .filter(|e| e.layer() == layer && e.id() != id)
            .map(|e| e.order())
            .min();
        let Some(min) = min_order else {
            return Ok(());
        };
        if min == 0 {
            // No room below; shift the rest of the layer up instead.
            for e in self.elements.values_mut() {
                if e.layer() == layer && e.id() != id {
                    e.set_order(e.order() + 1);
                }
            }
            self.next_order += 1;
            if let Some(element) = self.elements.get_mut(&id) {
                element.set_order(0);
            }
        } else if let Some(element) = self.elements.get_mut(&id) {
            element.set_order(min - 1);
        }
        Ok(())
    }

    /// Elements on visible layers, back to front: layer order first, then
    /// insertion order within a layer.
    pub fn list_visible(&self) -> Vec<&Element> {
        let layer_orders: HashMap<LayerId, u64> = self
            .layers
            .iter()
            .filter(|l| l.visible)
            .map(|l| (l.id, l.order))
            .collect();
        let mut visible: Vec<&Element> = self
            .elements
            .values()
            .filter(|e| layer_orders.contains_key(&e.layer()))
            .collect();
        visible.sort_by_key(|e| (layer_orders[&e.layer()], e.order()));
        visible
    }

    /// Topmost visible element hit at `point` (world mm), or None.
    pub fn element_at(&self, point: Point, tolerance: f64) -> Option<&Element> {
        self.list_visible()
            .into_iter()
            .rev()
            .find(|e| e.hit_test(point, tolerance))
    }

    /// Snapshot the full document. Every element is included regardless
    /// of layer visibility; hiding a layer must not drop its contents
    /// from saves.
    pub fn payload(&self) -> PersistPayload {
        let layer_orders: HashMap<LayerId, u64> =
            self.layers.iter().map(|l| (l.id, l.order)).collect();
        let mut elements: Vec<Element> = self.elements.values().cloned().collect();
        elements.sort_by_key(|e| {
            (
                layer_orders.get(&e.layer()).copied().unwrap_or(u64::MAX),
                e.order(),
            )
        });
        PersistPayload {
            elements,
            layers: self.layers.clone(),
            canvas_width_mm: self.canvas_size.width,
            canvas_height_mm: self.canvas_size.height,
        }
    }
}
