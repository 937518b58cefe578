//! The editor: a single-writer container that owns the document, the
//! viewport and the active tool, and routes input events between them.

use std::time::Instant;

use kurbo::{Point, Size, Vec2};

use crate::elements::{Ellipse, Element, Line, Path, Rectangle, Text};
use crate::input::{InputState, KeyEvent, MouseButton, PointerEvent, TouchEvent};
use crate::snap::{
    alignment_snap, merge_guides, snap_to_grid, SnapGuide, SnapSettings, ALIGNMENT_THRESHOLD,
};
use crate::store::{AutoPersist, EditError, ElementStore, PersistHook};
use crate::tools::{
    ActiveTool, CalibrateState, HoldTimer, PenState, ShapeKind, ShapeState, ToolKind,
    FREEHAND_MIN_LENGTH, FREEHAND_MIN_SPACING,
};
use crate::transform::{handle_point, handles_for, resize_element};
use crate::units::{calibration_scale, Measurement, UnitConverter};
use crate::viewport::Viewport;

/// Hit tolerance for element picking, in scene pixels.
pub const HIT_TOLERANCE: f64 = 6.0;

/// Hit radius for resize handles, in scene pixels.
pub const HANDLE_HIT_RADIUS: f64 = 8.0;

/// Minimum dimension (scene pixels) below which a dragged shape is
/// discarded instead of committed.
pub const MIN_ELEMENT_SIZE: f64 = 5.0;

/// Owns all mutable canvas state. All edits flow through this type, one
/// event at a time; nothing else writes to the store or viewport.
pub struct Editor {
    pub store: ElementStore,
    pub viewport: Viewport,
    pub input: InputState,
    pub units: UnitConverter,
    pub snap: SnapSettings,
    pub tool: ActiveTool,
    pub measurements: Vec<Measurement>,
    /// Guides produced by the last alignment snap, for rendering.
    pub guides: Vec<SnapGuide>,
    /// Non-fatal message for the user (rejected input, discarded shape).
    pub advisory: Option<String>,
    autosave: AutoPersist,
    hold_timer: Option<HoldTimer>,
    /// Set when a double-tap consumed the press, so the matching release
    /// does not reach the tool.
    suppress_up: bool,
    /// Last pointer position seen, for per-event pan deltas.
    last_pointer: Option<Point>,
}

impl Editor {
    /// Create an editor for a canvas of `canvas_mm` real-world size shown
    /// in a `container_px` surface. The unit scale auto-fits until a
    /// calibration overrides it.
    pub fn new(canvas_mm: Size, container_px: Size) -> Result<Self, EditError> {
        let store = ElementStore::new(canvas_mm)?;
        let mut units = UnitConverter::new();
        units.fit_to_container(container_px, canvas_mm);
        let scale = units.effective_scale();
        let canvas_px = Size::new(canvas_mm.width * scale, canvas_mm.height * scale);
        Ok(Self {
            store,
            viewport: Viewport::new(container_px, canvas_px),
            input: InputState::new(),
            units,
            snap: SnapSettings::default(),
            tool: ActiveTool::new(ToolKind::default()),
            measurements: Vec::new(),
            guides: Vec::new(),
            advisory: None,
            autosave: AutoPersist::default(),
            hold_timer: None,
            suppress_up: false,
            last_pointer: None,
        })
    }

    /// Resolve a raw client position into world millimeters.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.units.scene_to_world(self.viewport.screen_to_scene(screen))
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        self.viewport.scene_to_screen(self.units.world_to_scene(world))
    }

    /// Switch tools, aborting any in-progress interaction first.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.tool.kind() == kind {
            return;
        }
        self.tool.cancel();
        self.hold_timer = None;
        self.guides.clear();
        self.tool = ActiveTool::new(kind);
        log::debug!("tool changed to {kind:?}");
    }

    /// Scene-pixel threshold expressed in world millimeters at the
    /// current scale.
    fn scene_px_to_world(&self, px: f64) -> f64 {
        self.units.px_to_mm(px)
    }

    /// Snap a scene point against grid and alignment targets, recording
    /// guides for rendering. Used when placing new geometry.
    fn snap_scene_point(&mut self, scene: Point) -> Point {
        let mut point = scene;
        let mut guides = Vec::new();
        if self.snap.alignment_enabled {
            let targets: Vec<Point> = self
                .store
                .list_visible()
                .iter()
                .flat_map(|e| e.alignment_points())
                .map(|w| self.units.world_to_scene(w))
                .collect();
            let outcome = alignment_snap(point, &targets, ALIGNMENT_THRESHOLD);
            point = outcome.point;
            guides = outcome.guides;
        }
        if self.snap.grid_enabled {
            let world = self.units.scene_to_world(point);
            let snapped = snap_to_grid(world, self.snap.grid_size);
            point = self.units.world_to_scene(snapped.point);
        }
        self.guides = merge_guides(guides);
        point
    }

    fn mark_dirty(&mut self) {
        self.autosave.mark_dirty(Instant::now());
    }

    pub fn is_dirty(&self) -> bool {
        self.autosave.is_dirty()
    }

    /// Per-frame tick. Fires the calibration hold when its timer
    /// completes so the point is fixed while the pointer is still down.
    pub fn tick(&mut self, now: Instant) {
        self.fire_completed_hold(now);
    }

    fn fire_completed_hold(&mut self, now: Instant) {
        let Some(timer) = &self.hold_timer else {
            return;
        };
        if !timer.is_complete(now) {
            return;
        }
        let position = timer.position();
        self.hold_timer = None;
        if let ActiveTool::Calibrate(tool) = &mut self.tool {
            tool.place_point(position);
        }
    }

    /// Flush a pending snapshot through `hook` once the debounce window
    /// has elapsed.
    pub fn tick_persist(&mut self, now: Instant, hook: &mut dyn PersistHook) -> bool {
        let store = &self.store;
        self.autosave.tick(now, || store.payload(), hook)
    }

    /// Route a pointer event. Call `begin_frame` on the input state once
    /// per frame before feeding that frame's events.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        self.input.handle_pointer_event(event.clone());
        match event {
            PointerEvent::Down { position, button } => {
                self.last_pointer = Some(position);
                if button != MouseButton::Left {
                    return;
                }
                if self.input.is_double_tap() && !self.tool.is_active() {
                    self.viewport.double_tap(position);
                    self.suppress_up = true;
                    return;
                }
                self.pointer_down(position);
            }
            PointerEvent::Up { position, button } => {
                if button == MouseButton::Left {
                    if self.suppress_up {
                        self.suppress_up = false;
                    } else {
                        self.pointer_up(position);
                    }
                }
                if !self.input.is_button_pressed(MouseButton::Left)
                    && !self.input.is_button_pressed(MouseButton::Middle)
                {
                    self.last_pointer = None;
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_move(position);
            }
            PointerEvent::Scroll { position, delta } => {
                // Horizontal trackpad/wheel deltas pan; vertical deltas
                // zoom at the cursor.
                if delta.x.abs() > delta.y.abs() {
                    self.viewport.pan_by(Vec2::new(-delta.x, 0.0));
                } else {
                    self.viewport.wheel_zoom(position, -delta.y);
                }
            }
        }
    }

    /// Route a touch event; two-finger moves drive pinch zoom.
    pub fn handle_touch_event(&mut self, event: TouchEvent) {
        if let Some(pinch) = self.input.handle_touch_event(event) {
            self.viewport
                .pinch_zoom(pinch.midpoint, pinch.prev_distance, pinch.distance);
        }
    }

    fn pointer_down(&mut self, position: Point) {
        let world = self.screen_to_world(position);
        let scene = self.viewport.screen_to_scene(position);
        let tolerance = self.scene_px_to_world(HIT_TOLERANCE);
        // Shape drags start from a snapped corner.
        let draw_world = match self.tool {
            ActiveTool::Shape(_) => {
                let snapped = self.snap_scene_point(scene);
                self.units.scene_to_world(snapped)
            }
            _ => world,
        };
        match &mut self.tool {
            ActiveTool::Select(tool) => {
                // Handles take priority over element bodies.
                let mut resize_hit = None;
                'handles: for &id in tool.selection.ids() {
                    let Some(element) = self.store.get(id) else {
                        continue;
                    };
                    for &handle in handles_for(element) {
                        let hp = self
                            .units
                            .world_to_scene(handle_point(element.bounds(), element.rotation(), handle));
                        if hp.distance(scene) <= HANDLE_HIT_RADIUS {
                            resize_hit = Some((id, handle));
                            break 'handles;
                        }
                    }
                }
                if let Some((id, handle)) = resize_hit {
                    tool.begin_resize(id, handle);
                    return;
                }
                let hit = self.store.element_at(world, tolerance).map(|e| e.id());
                let toggle = self.input.modifiers.shift || self.input.modifiers.ctrl;
                tool.press(world, hit, toggle);
            }
            ActiveTool::Shape(tool) => {
                tool.begin(draw_world);
            }
            ActiveTool::Pen(tool) => {
                // Click-to-place mode is gated on the held modifier; those
                // clicks are handled on release.
                let modifier_held = self.input.modifiers.ctrl;
                if !modifier_held && !matches!(tool.state, PenState::Polyline { .. }) {
                    tool.begin_stroke(world);
                }
            }
            ActiveTool::Eraser(tool) => {
                let hit = self
                    .store
                    .element_at(world, tolerance)
                    .map(|e| (e.id(), e.kind()));
                if let Some((id, kind)) = hit {
                    if tool.erases(kind) && self.store.remove(id).is_ok() {
                        self.autosave.mark_dirty(Instant::now());
                    }
                }
            }
            ActiveTool::Calibrate(_) => {
                self.hold_timer = Some(HoldTimer::start(Instant::now(), scene));
            }
            // Line and text act on the click release.
            ActiveTool::Line(_) | ActiveTool::Text(_) => {}
        }
    }

    /// True while the pointer is positioning new geometry, which is when
    /// smart guides should follow it. Drags and resizes skip alignment.
    fn placing_geometry(&self) -> bool {
        match &self.tool {
            ActiveTool::Line(_) => true,
            ActiveTool::Shape(tool) => matches!(tool.state, ShapeState::Idle),
            _ => false,
        }
    }

    fn pointer_move(&mut self, position: Point) {
        let delta = self
            .last_pointer
            .map(|prev| position - prev)
            .unwrap_or(Vec2::ZERO);
        self.last_pointer = Some(position);
        let scene = self.viewport.screen_to_scene(position);
        if let Some(timer) = &mut self.hold_timer {
            timer.update(Instant::now(), scene);
        }
        self.fire_completed_hold(Instant::now());

        // Middle-button drags always pan.
        if self.input.is_button_pressed(MouseButton::Middle)
            && !self.input.is_button_pressed(MouseButton::Left)
        {
            self.viewport.pan_by(delta);
            return;
        }

        if self.placing_geometry() {
            self.snap_scene_point(scene);
        } else if self.tool.is_active() {
            self.guides.clear();
        }

        if self.tool.is_active() {
            let world = self.screen_to_world(position);
            match &mut self.tool {
                ActiveTool::Select(tool) => {
                    if let Some((id, handle)) = tool.resizing() {
                        let min = self.units.px_to_mm(MIN_ELEMENT_SIZE);
                        if let Some(element) = self.store.get_mut(id) {
                            resize_element(element, handle, world, min);
                        }
                    } else if let Some(delta) = tool.drag(world) {
                        for &id in tool.selection.ids() {
                            if let Some(element) = self.store.get_mut(id) {
                                element.translate(delta);
                            }
                        }
                    }
                }
                ActiveTool::Pen(tool) => {
                    let spacing = self.units.px_to_mm(FREEHAND_MIN_SPACING);
                    tool.sample(world, spacing);
                }
                _ => {}
            }
            return;
        }

        // Nothing captured the press: a held drag pans the viewport once
        // the debounce interval rules out a click.
        if self.input.is_button_pressed(MouseButton::Left) && self.input.pan_gesture_ready() {
            self.viewport.pan_by(delta);
        }
    }

    fn pointer_up(&mut self, position: Point) {
        let scene = self.viewport.screen_to_scene(position);
        let min_size = self.units.px_to_mm(MIN_ELEMENT_SIZE);
        let was_tap = self.input.was_tap();
        let modifier_held = self.input.modifiers.ctrl;
        let hold_timer = self.hold_timer.take();
        let mut dirty = false;

        // New geometry snaps against the grid and smart guides.
        let draw_world = match self.tool {
            ActiveTool::Line(_) | ActiveTool::Shape(_) => {
                let snapped = self.snap_scene_point(scene);
                self.units.scene_to_world(snapped)
            }
            _ => self.units.scene_to_world(scene),
        };

        match &mut self.tool {
            ActiveTool::Select(tool) => {
                dirty = tool.release();
            }
            ActiveTool::Line(tool) => {
                tool.forced_continuous = modifier_held;
                if was_tap {
                    if let Some((start, end)) = tool.click(draw_world, &self.snap) {
                        let layer = self.store.default_layer();
                        self.store.insert(Element::Line(Line::new(layer, start, end)));
                        dirty = true;
                    }
                }
            }
            ActiveTool::Shape(tool) => {
                let kind = tool.kind;
                if let Some(bounds) = tool.finish(draw_world, min_size) {
                    let layer = self.store.default_layer();
                    let corner_a = bounds.origin();
                    let corner_b = Point::new(bounds.x1, bounds.y1);
                    let element = match kind {
                        ShapeKind::Rectangle => {
                            Element::Rectangle(Rectangle::from_corners(layer, corner_a, corner_b))
                        }
                        ShapeKind::Ellipse => {
                            Element::Ellipse(Ellipse::from_corners(layer, corner_a, corner_b))
                        }
                    };
                    self.store.insert(element);
                    dirty = true;
                } else if !was_tap {
                    self.advisory = Some("Shape too small, not added".to_owned());
                }
            }
            ActiveTool::Pen(tool) => match tool.state {
                PenState::Polyline { .. } => {
                    if was_tap {
                        tool.add_vertex(draw_world, &self.snap);
                    }
                }
                PenState::Freehand { .. } => {
                    let min_length = self.units.px_to_mm(FREEHAND_MIN_LENGTH);
                    if let Some(points) = tool.finish_stroke(min_length) {
                        let layer = self.store.default_layer();
                        if let Some(path) = Path::new(layer, points) {
                            self.store.insert(Element::Path(path));
                            dirty = true;
                        }
                    }
                }
                // The press was swallowed by the held modifier: this click
                // starts a polyline.
                PenState::Idle => {
                    if modifier_held && was_tap {
                        tool.add_vertex(draw_world, &self.snap);
                    }
                }
            },
            ActiveTool::Text(tool) => {
                if was_tap {
                    tool.place(draw_world);
                }
            }
            ActiveTool::Calibrate(tool) => {
                let held = hold_timer
                    .map(|t| t.is_complete(Instant::now()))
                    .unwrap_or(false);
                if was_tap || held {
                    tool.place_point(scene);
                }
            }
            ActiveTool::Eraser(_) => {}
        }

        if dirty {
            self.mark_dirty();
        }
        self.guides.clear();
    }

    /// Route a keyboard event. Escape aborts any interaction; Enter
    /// commits multi-step input.
    pub fn handle_key_event(&mut self, event: KeyEvent) {
        self.input.handle_key_event(event.clone());
        match event {
            KeyEvent::Pressed(key) => match key.as_str() {
                "Escape" => self.escape(),
                "Enter" => self.commit_pending(),
                _ => {}
            },
            // Releasing the modifier that gates click-to-place commits the
            // polyline in progress.
            KeyEvent::Released(key) if key == "Control" => self.commit_pending(),
            _ => {}
        }
    }

    /// Universal abort: return the active tool to idle and drop any
    /// pending advisory.
    pub fn escape(&mut self) {
        self.tool.cancel();
        self.hold_timer = None;
        self.guides.clear();
        self.advisory = None;
    }

    /// Commit in-progress multi-step input (pen polyline).
    pub fn commit_pending(&mut self) {
        if let ActiveTool::Pen(tool) = &mut self.tool {
            if let Some(points) = tool.finish_polyline() {
                let layer = self.store.default_layer();
                if let Some(path) = Path::new(layer, points) {
                    self.store.insert(Element::Path(path));
                    self.mark_dirty();
                }
            }
        }
    }

    /// Commit the text entry for a pending text placement.
    pub fn commit_text(&mut self, content: &str) {
        if let ActiveTool::Text(tool) = &mut self.tool {
            if let Some((anchor, content)) = tool.commit(content) {
                let layer = self.store.default_layer();
                self.store.insert(Element::Text(Text::new(layer, anchor, content)));
                self.mark_dirty();
            }
        }
    }

    /// Commit the declared length for a placed calibration segment and
    /// apply the new scale. Existing measurements are re-expressed under
    /// the new scale; stored element geometry is untouched.
    pub fn commit_calibration(&mut self, declared_mm: f64) -> bool {
        let ActiveTool::Calibrate(tool) = &mut self.tool else {
            return false;
        };
        let Some((first, second, mm)) = tool.commit_length(declared_mm) else {
            if matches!(tool.state, CalibrateState::AwaitingLength { .. }) {
                self.advisory = Some("Enter a distance greater than zero".to_owned());
            }
            return false;
        };
        let Some(scale) = calibration_scale(first, second, mm) else {
            return false;
        };
        self.units.set_calibrated_scale(scale);
        for measurement in &mut self.measurements {
            measurement.rescale(scale);
        }
        log::info!("calibrated scale to {scale:.4} px/mm");
        self.mark_dirty();
        true
    }

    /// Drop the calibrated scale and revert to the auto-fit scale for the
    /// current container. Measurements are re-expressed under the
    /// reverted scale; stored element geometry is untouched.
    pub fn clear_calibration(&mut self) {
        self.units.clear_calibration();
        self.units
            .fit_to_container(self.viewport.container, self.store.canvas_size);
        let scale = self.units.effective_scale();
        self.viewport.set_canvas(Size::new(
            self.store.canvas_size.width * scale,
            self.store.canvas_size.height * scale,
        ));
        for measurement in &mut self.measurements {
            measurement.rescale(scale);
        }
        log::info!("calibration cleared, auto-fit scale {scale:.4} px/mm");
        self.mark_dirty();
    }

    /// Record a measurement between two scene points at the current scale.
    pub fn add_measurement(&mut self, a: Point, b: Point) -> f64 {
        let measurement = Measurement::new(a.distance(b), self.units.effective_scale());
        let mm = measurement.display_mm();
        self.measurements.push(measurement);
        mm
    }

    /// The container surface was resized.
    pub fn set_container(&mut self, container_px: Size) {
        self.viewport.set_container(container_px);
        if self.units.calibrated_scale().is_none() {
            self.units.fit_to_container(container_px, self.store.canvas_size);
            let scale = self.units.effective_scale();
            self.viewport.set_canvas(Size::new(
                self.store.canvas_size.width * scale,
                self.store.canvas_size.height * scale,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::store::MemoryPersist;
    use crate::tools::{EraserMode, SelectState};
    use std::time::Duration;

    fn with_ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Modifiers::default()
        }
    }

    fn editor() -> Editor {
        // 1000x800mm canvas in a 1080x880px container: 1 px per mm after
        // the auto-fit margin, so screen and world line up at zoom 1.
        Editor::new(Size::new(1000.0, 800.0), Size::new(1080.0, 880.0)).unwrap()
    }

    fn tap(editor: &mut Editor, position: Point) {
        editor.handle_pointer_event(PointerEvent::Down {
            position,
            button: MouseButton::Left,
        });
        editor.handle_pointer_event(PointerEvent::Up {
            position,
            button: MouseButton::Left,
        });
        editor.input.begin_frame();
    }

    fn drag(editor: &mut Editor, from: Point, to: Point) {
        editor.handle_pointer_event(PointerEvent::Down {
            position: from,
            button: MouseButton::Left,
        });
        editor.handle_pointer_event(PointerEvent::Move { position: to });
        std::thread::sleep(Duration::from_millis(210));
        editor.handle_pointer_event(PointerEvent::Up {
            position: to,
            button: MouseButton::Left,
        });
        editor.input.begin_frame();
    }

    #[test]
    fn test_unit_scale_auto_fits() {
        let e = editor();
        assert!((e.units.effective_scale() - 1.0).abs() < 1e-9);
        assert_eq!(e.screen_to_world(Point::new(100.0, 50.0)), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_line_tool_click_click() {
        let mut e = editor();
        e.set_tool(ToolKind::Line);
        e.snap.ortho_enabled = false;
        e.snap.angle_enabled = false;
        e.snap.alignment_enabled = false;
        tap(&mut e, Point::new(100.0, 100.0));
        assert_eq!(e.store.len(), 0);
        tap(&mut e, Point::new(300.0, 100.0));
        assert_eq!(e.store.len(), 1);
        assert!(e.is_dirty());
    }

    #[test]
    fn test_shape_drag_commits_rectangle() {
        let mut e = editor();
        e.set_tool(ToolKind::Rectangle);
        e.snap.alignment_enabled = false;
        drag(&mut e, Point::new(100.0, 100.0), Point::new(300.0, 250.0));
        assert_eq!(e.store.len(), 1);
        let element = e.store.iter().next().unwrap();
        let bounds = element.bounds();
        assert!((bounds.width() - 200.0).abs() < 1e-6);
        assert!((bounds.height() - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_tiny_shape_drag_discarded() {
        let mut e = editor();
        e.set_tool(ToolKind::Ellipse);
        e.snap.alignment_enabled = false;
        drag(&mut e, Point::new(100.0, 100.0), Point::new(104.0, 104.0));
        assert_eq!(e.store.len(), 0);
        assert!(e.advisory.is_some());
    }

    #[test]
    fn test_eraser_modes_gate_deletion() {
        let mut e = editor();
        let layer = e.store.default_layer();
        e.store.insert(Element::Text(Text::new(layer, Point::new(200.0, 200.0), "note")));
        e.set_tool(ToolKind::Eraser);
        if let ActiveTool::Eraser(tool) = &mut e.tool {
            tool.mode = EraserMode::Shape;
        }
        let target = e.store.iter().next().unwrap().bounds().center();
        tap(&mut e, target);
        // Shape mode spares text.
        assert_eq!(e.store.len(), 1);
        if let ActiveTool::Eraser(tool) = &mut e.tool {
            tool.mode = EraserMode::Universal;
        }
        // Offset far enough that this does not read as a double-tap.
        tap(&mut e, target + kurbo::Vec2::new(10.0, 0.0));
        assert_eq!(e.store.len(), 0);
    }

    #[test]
    fn test_select_drag_moves_element() {
        let mut e = editor();
        let layer = e.store.default_layer();
        let id = e.store.insert(Element::Rectangle(Rectangle::new(
            layer,
            Point::new(100.0, 100.0),
            200.0,
            100.0,
        )));
        drag(&mut e, Point::new(200.0, 150.0), Point::new(250.0, 180.0));
        let moved = e.store.get(id).unwrap().bounds();
        assert!((moved.x0 - 150.0).abs() < 1e-6);
        assert!((moved.y0 - 130.0).abs() < 1e-6);
        assert!(e.is_dirty());
    }

    #[test]
    fn test_empty_click_clears_selection() {
        let mut e = editor();
        let layer = e.store.default_layer();
        e.store.insert(Element::Rectangle(Rectangle::new(
            layer,
            Point::new(100.0, 100.0),
            100.0,
            100.0,
        )));
        tap(&mut e, Point::new(150.0, 150.0));
        if let ActiveTool::Select(tool) = &e.tool {
            assert_eq!(tool.selection.len(), 1);
        }
        tap(&mut e, Point::new(600.0, 600.0));
        if let ActiveTool::Select(tool) = &e.tool {
            assert!(tool.selection.is_empty());
        }
    }

    #[test]
    fn test_pan_fall_through_after_debounce() {
        let mut e = editor();
        // Zoom in so panning has headroom.
        e.viewport.zoom_at(Point::new(500.0, 400.0), 2.0);
        let pan_before = e.viewport.pan;
        e.handle_pointer_event(PointerEvent::Down {
            position: Point::new(600.0, 600.0),
            button: MouseButton::Left,
        });
        // Click on empty space selects nothing, so the held drag pans.
        std::thread::sleep(Duration::from_millis(120));
        e.input.begin_frame();
        e.handle_pointer_event(PointerEvent::Move {
            position: Point::new(560.0, 580.0),
        });
        assert!((e.viewport.pan - pan_before).hypot() > 1.0);
    }

    #[test]
    fn test_smart_guides_follow_hover() {
        let mut e = editor();
        let layer = e.store.default_layer();
        e.store.insert(Element::Rectangle(Rectangle::new(
            layer,
            Point::new(100.0, 100.0),
            200.0,
            100.0,
        )));
        e.set_tool(ToolKind::Line);
        // Hovering near the rectangle's left edge emits a vertical guide
        // before any click.
        e.handle_pointer_event(PointerEvent::Move {
            position: Point::new(105.0, 400.0),
        });
        assert!(e
            .guides
            .iter()
            .any(|g| matches!(g, SnapGuide::Vertical { position } if (position - 100.0).abs() < 1e-6)));
        // Far from any target the guides disappear.
        e.handle_pointer_event(PointerEvent::Move {
            position: Point::new(600.0, 600.0),
        });
        assert!(e.guides.is_empty());
    }

    #[test]
    fn test_pan_applies_per_event_deltas() {
        let mut e = editor();
        e.viewport.zoom_at(Point::new(500.0, 400.0), 2.0);
        let before = e.viewport.pan;
        e.handle_pointer_event(PointerEvent::Down {
            position: Point::new(600.0, 600.0),
            button: MouseButton::Left,
        });
        std::thread::sleep(Duration::from_millis(120));
        e.input.begin_frame();
        e.handle_pointer_event(PointerEvent::Move {
            position: Point::new(580.0, 600.0),
        });
        e.handle_pointer_event(PointerEvent::Move {
            position: Point::new(560.0, 600.0),
        });
        // Two moves totaling 40px pan exactly 40px, however the frames fall.
        let applied = e.viewport.pan - before;
        assert!((applied.x + 40.0).abs() < 1e-6);
        assert!(applied.y.abs() < 1e-6);
    }

    #[test]
    fn test_middle_button_drag_pans() {
        let mut e = editor();
        e.viewport.zoom_at(Point::new(500.0, 400.0), 2.0);
        let before = e.viewport.pan;
        e.handle_pointer_event(PointerEvent::Down {
            position: Point::new(600.0, 600.0),
            button: MouseButton::Middle,
        });
        e.handle_pointer_event(PointerEvent::Move {
            position: Point::new(570.0, 590.0),
        });
        let applied = e.viewport.pan - before;
        assert!((applied.x + 30.0).abs() < 1e-6);
        assert!((applied.y + 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_scroll_pans_instead_of_zooming() {
        let mut e = editor();
        e.viewport.zoom_at(Point::new(500.0, 400.0), 2.0);
        let before = e.viewport.pan;
        let zoom = e.viewport.zoom;
        e.handle_pointer_event(PointerEvent::Scroll {
            position: Point::new(500.0, 400.0),
            delta: kurbo::Vec2::new(30.0, 0.0),
        });
        assert!((e.viewport.zoom - zoom).abs() < 1e-9);
        assert!(((e.viewport.pan - before).x + 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_pen_click_to_add_requires_modifier() {
        let mut e = editor();
        e.set_tool(ToolKind::Pen);
        e.snap.alignment_enabled = false;
        // Without the modifier a quick tap is a degenerate stroke.
        tap(&mut e, Point::new(100.0, 100.0));
        if let ActiveTool::Pen(tool) = &e.tool {
            assert!(matches!(tool.state, PenState::Idle));
        }
        assert_eq!(e.store.len(), 0);

        e.input.set_modifiers(with_ctrl());
        tap(&mut e, Point::new(300.0, 100.0));
        tap(&mut e, Point::new(420.0, 100.0));
        if let ActiveTool::Pen(tool) = &e.tool {
            assert!(matches!(tool.state, PenState::Polyline { .. }));
        }
        e.handle_key_event(KeyEvent::Released("Control".into()));
        assert_eq!(e.store.len(), 1);
    }

    #[test]
    fn test_line_modifier_chains_segments() {
        let mut e = editor();
        e.set_tool(ToolKind::Line);
        e.snap.alignment_enabled = false;
        e.input.set_modifiers(with_ctrl());
        tap(&mut e, Point::new(100.0, 100.0));
        tap(&mut e, Point::new(300.0, 100.0));
        tap(&mut e, Point::new(300.0, 250.0));
        assert_eq!(e.store.len(), 2);
        // Releasing the modifier ends the chord on the next commit.
        e.input.set_modifiers(Modifiers::default());
        tap(&mut e, Point::new(500.0, 250.0));
        assert_eq!(e.store.len(), 3);
        assert!(!e.tool.is_active());
    }

    #[test]
    fn test_calibration_hold_places_while_pressed() {
        let mut e = editor();
        e.set_tool(ToolKind::Calibrate);
        e.handle_pointer_event(PointerEvent::Down {
            position: Point::new(200.0, 200.0),
            button: MouseButton::Left,
        });
        e.tick(Instant::now() + Duration::from_millis(1600));
        let ActiveTool::Calibrate(tool) = &e.tool else {
            panic!("calibrate tool expected");
        };
        assert!(matches!(tool.state, CalibrateState::PlacingSecond { .. }));
    }

    #[test]
    fn test_clear_calibration_reverts_to_auto_fit() {
        let mut e = editor();
        let _ = e.add_measurement(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        e.set_tool(ToolKind::Calibrate);
        if let ActiveTool::Calibrate(tool) = &mut e.tool {
            tool.place_point(Point::new(0.0, 0.0));
            tool.place_point(Point::new(200.0, 0.0));
        }
        assert!(e.commit_calibration(1000.0));
        assert!((e.units.effective_scale() - 0.2).abs() < 1e-9);
        e.clear_calibration();
        assert!((e.units.effective_scale() - 1.0).abs() < 1e-9);
        assert!((e.measurements[0].display_mm() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_escape_aborts_interaction() {
        let mut e = editor();
        e.set_tool(ToolKind::Line);
        tap(&mut e, Point::new(100.0, 100.0));
        assert!(e.tool.is_active());
        e.escape();
        assert!(!e.tool.is_active());
        assert!(e.advisory.is_none());
    }

    #[test]
    fn test_calibration_rescales_measurements() {
        let mut e = editor();
        let mm = e.add_measurement(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!((mm - 100.0).abs() < 1e-9);

        e.set_tool(ToolKind::Calibrate);
        if let ActiveTool::Calibrate(tool) = &mut e.tool {
            tool.place_point(Point::new(0.0, 0.0));
            tool.place_point(Point::new(200.0, 0.0));
        }
        // 200 px declared to span 1000mm: scale becomes 0.2 px/mm.
        assert!(e.commit_calibration(1000.0));
        assert!((e.units.effective_scale() - 0.2).abs() < 1e-9);
        assert!((e.measurements[0].display_mm() - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_commit_text_creates_element() {
        let mut e = editor();
        e.set_tool(ToolKind::Text);
        tap(&mut e, Point::new(300.0, 300.0));
        e.commit_text("Sofa");
        assert_eq!(e.store.len(), 1);
        e.commit_text("ignored, no pending anchor");
        assert_eq!(e.store.len(), 1);
    }

    #[test]
    fn test_persist_debounce_flushes_once() {
        let mut e = editor();
        let mut hook = MemoryPersist::default();
        e.set_tool(ToolKind::Line);
        e.snap.alignment_enabled = false;
        tap(&mut e, Point::new(100.0, 100.0));
        tap(&mut e, Point::new(400.0, 100.0));
        let now = Instant::now();
        assert!(!e.tick_persist(now, &mut hook));
        assert!(e.tick_persist(now + Duration::from_millis(150), &mut hook));
        assert!(!e.tick_persist(now + Duration::from_millis(300), &mut hook));
        assert_eq!(hook.snapshots.len(), 1);
        assert_eq!(hook.snapshots[0].elements.len(), 1);
    }

    #[test]
    fn test_resize_via_handle() {
        let mut e = editor();
        let layer = e.store.default_layer();
        let id = e.store.insert(Element::Rectangle(Rectangle::new(
            layer,
            Point::new(100.0, 100.0),
            200.0,
            100.0,
        )));
        // Select it first.
        tap(&mut e, Point::new(200.0, 150.0));
        // Press exactly on the south-east handle and drag outward.
        e.handle_pointer_event(PointerEvent::Down {
            position: Point::new(300.0, 200.0),
            button: MouseButton::Left,
        });
        if let ActiveTool::Select(tool) = &e.tool {
            assert!(matches!(tool.state, SelectState::Resizing { .. }));
        }
        e.handle_pointer_event(PointerEvent::Move {
            position: Point::new(400.0, 300.0),
        });
        e.handle_pointer_event(PointerEvent::Up {
            position: Point::new(400.0, 300.0),
            button: MouseButton::Left,
        });
        let bounds = e.store.get(id).unwrap().bounds();
        assert!((bounds.width() - 300.0).abs() < 1e-6);
        assert!((bounds.height() - 200.0).abs() < 1e-6);
        // The opposite corner stayed put.
        assert!((bounds.x0 - 100.0).abs() < 1e-6);
        assert!((bounds.y0 - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_double_tap_zoom_toggle() {
        let mut e = editor();
        let p = Point::new(500.0, 400.0);
        tap(&mut e, p);
        tap(&mut e, p);
        assert!((e.viewport.zoom - 2.0).abs() < 1e-9);
    }
}
