//! Input state tracking for pointer, touch and keyboard events.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Pointer event in raw screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
    Scroll { position: Point, delta: Vec2 },
}

/// Touch event phase for multi-touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// A single touch point update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchEvent {
    pub id: u64,
    pub phase: TouchPhase,
    pub position: Point,
}

/// Keyboard event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Time/distance window for double-tap detection.
const DOUBLE_TAP_TIME_MS: u128 = 500;
const DOUBLE_TAP_DISTANCE: f64 = 5.0;
/// A press shorter than this counts as a discrete tap, not a drag.
pub const TAP_MAX_MS: u128 = 200;
/// A press must be held this long before a drag is treated as panning.
pub const PAN_DEBOUNCE_MS: u128 = 100;

/// Result of a two-finger gesture update.
#[derive(Debug, Clone, Copy)]
pub struct PinchUpdate {
    pub midpoint: Point,
    pub prev_distance: f64,
    pub distance: f64,
}

/// Tracks pointer, touch and keyboard state across frames.
///
/// Move events are coalesced: callers read `pointer_position` once per frame
/// and `begin_frame` resets the per-frame deltas, so anything arriving faster
/// than the frame rate collapses to the latest value.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Latest pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Pointer position at the previous frame boundary.
    pub previous_pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
    just_pressed_buttons: HashSet<MouseButton>,
    just_released_buttons: HashSet<MouseButton>,
    pub modifiers: Modifiers,
    /// Accumulated scroll delta since the last frame.
    pub scroll_delta: Vec2,
    pressed_keys: HashSet<String>,
    just_pressed_keys: HashSet<String>,
    /// Start position of the current primary-button press.
    pub press_start: Option<Point>,
    press_started_at: Option<Instant>,
    /// Duration of the most recently finished press.
    last_press_duration: Option<Duration>,
    last_tap_time: Option<Instant>,
    last_tap_position: Option<Point>,
    double_tap_detected: bool,
    /// Active touch points by id.
    touches: HashMap<u64, Point>,
    /// Two-finger distance at the previous pinch update.
    pinch_distance: Option<f64>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer_position: Point::ZERO,
            previous_pointer_position: Point::ZERO,
            pressed_buttons: HashSet::new(),
            just_pressed_buttons: HashSet::new(),
            just_released_buttons: HashSet::new(),
            modifiers: Modifiers::default(),
            scroll_delta: Vec2::ZERO,
            pressed_keys: HashSet::new(),
            just_pressed_keys: HashSet::new(),
            press_start: None,
            press_started_at: None,
            last_press_duration: None,
            last_tap_time: None,
            last_tap_position: None,
            double_tap_detected: false,
            touches: HashMap::new(),
            pinch_distance: None,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.just_pressed_buttons.clear();
        self.just_released_buttons.clear();
        self.just_pressed_keys.clear();
        self.scroll_delta = Vec2::ZERO;
        self.previous_pointer_position = self.pointer_position;
        self.double_tap_detected = false;
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                if self.pressed_buttons.insert(button) {
                    self.just_pressed_buttons.insert(button);
                }
                if button == MouseButton::Left {
                    self.detect_double_tap(position);
                    self.press_start = Some(position);
                    self.press_started_at = Some(Instant::now());
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                if self.pressed_buttons.remove(&button) {
                    self.just_released_buttons.insert(button);
                }
                if button == MouseButton::Left {
                    self.last_press_duration = self.press_started_at.map(|t| t.elapsed());
                    self.press_start = None;
                    self.press_started_at = None;
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
            }
            PointerEvent::Scroll { position, delta } => {
                self.pointer_position = position;
                self.scroll_delta += delta;
            }
        }
    }

    fn detect_double_tap(&mut self, position: Point) {
        let now = Instant::now();
        if let (Some(last_time), Some(last_pos)) = (self.last_tap_time, self.last_tap_position) {
            let elapsed = now.duration_since(last_time).as_millis();
            let distance = position.distance(last_pos);
            if elapsed < DOUBLE_TAP_TIME_MS && distance < DOUBLE_TAP_DISTANCE {
                self.double_tap_detected = true;
                // Avoid a triple-tap reading as another double.
                self.last_tap_time = None;
                self.last_tap_position = None;
                return;
            }
        }
        self.last_tap_time = Some(now);
        self.last_tap_position = Some(position);
    }

    /// Process a touch event and, for two-finger moves, report a pinch update.
    pub fn handle_touch_event(&mut self, event: TouchEvent) -> Option<PinchUpdate> {
        match event.phase {
            TouchPhase::Started => {
                self.touches.insert(event.id, event.position);
                self.pinch_distance = self.two_finger_distance();
                None
            }
            TouchPhase::Moved => {
                self.touches.insert(event.id, event.position);
                let distance = self.two_finger_distance()?;
                let prev = self.pinch_distance.replace(distance)?;
                Some(PinchUpdate {
                    midpoint: self.two_finger_midpoint()?,
                    prev_distance: prev,
                    distance,
                })
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&event.id);
                self.pinch_distance = self.two_finger_distance();
                None
            }
        }
    }

    fn two_finger_distance(&self) -> Option<f64> {
        if self.touches.len() != 2 {
            return None;
        }
        let mut it = self.touches.values();
        let a = *it.next()?;
        let b = *it.next()?;
        Some(a.distance(b))
    }

    fn two_finger_midpoint(&self) -> Option<Point> {
        if self.touches.len() != 2 {
            return None;
        }
        let mut it = self.touches.values();
        let a = *it.next()?;
        let b = *it.next()?;
        Some(Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0))
    }

    pub fn active_touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Process a key event.
    pub fn handle_key_event(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Pressed(key) => {
                if self.pressed_keys.insert(key.clone()) {
                    self.just_pressed_keys.insert(key);
                }
            }
            KeyEvent::Released(key) => {
                self.pressed_keys.remove(&key);
            }
        }
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn is_button_just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed_buttons.contains(&button)
    }

    pub fn is_button_just_released(&self, button: MouseButton) -> bool {
        self.just_released_buttons.contains(&button)
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    pub fn is_key_just_pressed(&self, key: &str) -> bool {
        self.just_pressed_keys.contains(key)
    }

    pub fn is_double_tap(&self) -> bool {
        self.double_tap_detected
    }

    /// How long the current primary-button press has been held.
    pub fn press_duration(&self) -> Option<Duration> {
        self.press_started_at.map(|t| t.elapsed())
    }

    /// Duration of the most recently completed press, for tap classification.
    pub fn last_press_duration(&self) -> Option<Duration> {
        self.last_press_duration
    }

    /// Whether the most recent press ended quickly enough to count as a tap.
    pub fn was_tap(&self) -> bool {
        self.last_press_duration
            .map(|d| d.as_millis() < TAP_MAX_MS)
            .unwrap_or(false)
    }

    /// A held press qualifies as a pan drag only after the debounce interval,
    /// which disambiguates a click from a drag-pan.
    pub fn pan_gesture_ready(&self) -> bool {
        self.press_duration()
            .map(|d| d.as_millis() > PAN_DEBOUNCE_MS)
            .unwrap_or(false)
    }

    /// Pointer movement since the last frame boundary.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }

    /// Offset from the press start, if a press is active.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.press_start.map(|start| self.pointer_position - start)
    }
}
