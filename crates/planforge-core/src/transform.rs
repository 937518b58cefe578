//! Resize transforms for selected elements.
//!
//! Resizing a rotated element works in the element's local frame: the
//! pointer is inverse-rotated around the current center, the new extents are
//! measured against the handle opposite the one being dragged, and the
//! center is re-solved so that opposite handle stays fixed in world space.

use kurbo::{Point, Rect, Vec2};

use crate::elements::{rotate_about, Element};

/// A draggable resize handle.
///
/// Compass handles apply to rectangles and ellipses; `Start`/`End` move
/// line endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    Start,
    End,
}

impl ResizeHandle {
    /// All handles applicable to a box-shaped element.
    pub const BOX_HANDLES: [ResizeHandle; 8] = [
        ResizeHandle::NorthWest,
        ResizeHandle::North,
        ResizeHandle::NorthEast,
        ResizeHandle::East,
        ResizeHandle::SouthEast,
        ResizeHandle::South,
        ResizeHandle::SouthWest,
        ResizeHandle::West,
    ];

    /// Direction signs of the handle in the element's local frame.
    /// Zero on an axis means that axis is not affected.
    fn signs(self) -> Option<(f64, f64)> {
        match self {
            ResizeHandle::NorthWest => Some((-1.0, -1.0)),
            ResizeHandle::North => Some((0.0, -1.0)),
            ResizeHandle::NorthEast => Some((1.0, -1.0)),
            ResizeHandle::East => Some((1.0, 0.0)),
            ResizeHandle::SouthEast => Some((1.0, 1.0)),
            ResizeHandle::South => Some((0.0, 1.0)),
            ResizeHandle::SouthWest => Some((-1.0, 1.0)),
            ResizeHandle::West => Some((-1.0, 0.0)),
            ResizeHandle::Start | ResizeHandle::End => None,
        }
    }
}

/// World position of a handle for the given unrotated bounds and rotation.
pub fn handle_point(bounds: Rect, rotation: f64, handle: ResizeHandle) -> Point {
    let center = bounds.center();
    let local = match handle {
        ResizeHandle::NorthWest => Point::new(bounds.x0, bounds.y0),
        ResizeHandle::North => Point::new(center.x, bounds.y0),
        ResizeHandle::NorthEast => Point::new(bounds.x1, bounds.y0),
        ResizeHandle::East => Point::new(bounds.x1, center.y),
        ResizeHandle::SouthEast => Point::new(bounds.x1, bounds.y1),
        ResizeHandle::South => Point::new(center.x, bounds.y1),
        ResizeHandle::SouthWest => Point::new(bounds.x0, bounds.y1),
        ResizeHandle::West => Point::new(bounds.x0, center.y),
        ResizeHandle::Start | ResizeHandle::End => center,
    };
    rotate_about(local, center, rotation)
}

/// New unrotated bounds after dragging `handle` to `pointer` (world mm).
///
/// The handle opposite the dragged one stays fixed in world space. Extents
/// clamp at `min_size` instead of mirroring past the anchor.
pub fn resize_bounds(
    bounds: Rect,
    rotation: f64,
    handle: ResizeHandle,
    pointer: Point,
    min_size: f64,
) -> Option<Rect> {
    let (sx, sy) = handle.signs()?;
    let center = bounds.center();
    let (w0, h0) = (bounds.width(), bounds.height());

    // Pointer and anchor expressed relative to the center, in local frame.
    let local = rotate_about(pointer, center, -rotation);
    let p = Vec2::new(local.x - center.x, local.y - center.y);
    let anchor = Vec2::new(-sx * w0 / 2.0, -sy * h0 / 2.0);

    let width = if sx != 0.0 {
        (sx * (p.x - anchor.x)).max(min_size)
    } else {
        w0
    };
    let height = if sy != 0.0 {
        (sy * (p.y - anchor.y)).max(min_size)
    } else {
        h0
    };

    // Solve the new center so the anchor keeps its world position.
    let anchor_world = center + rotate_vec(anchor, rotation);
    let offset = Vec2::new(sx * width / 2.0, sy * height / 2.0);
    let new_center = anchor_world + rotate_vec(offset, rotation);

    Some(Rect::new(
        new_center.x - width / 2.0,
        new_center.y - height / 2.0,
        new_center.x + width / 2.0,
        new_center.y + height / 2.0,
    ))
}

fn rotate_vec(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Apply a resize to an element in place. Returns false for elements the
/// handle does not apply to.
pub fn resize_element(
    element: &mut Element,
    handle: ResizeHandle,
    pointer: Point,
    min_size: f64,
) -> bool {
    match (element, handle) {
        (Element::Line(line), ResizeHandle::Start) => {
            line.start = pointer;
            true
        }
        (Element::Line(line), ResizeHandle::End) => {
            line.end = pointer;
            true
        }
        (Element::Rectangle(rect), handle) => {
            let Some(bounds) = resize_bounds(rect.bounds(), rect.rotation, handle, pointer, min_size)
            else {
                return false;
            };
            rect.origin = bounds.origin();
            rect.width = bounds.width();
            rect.height = bounds.height();
            true
        }
        (Element::Ellipse(ellipse), handle) => {
            let Some(bounds) =
                resize_bounds(ellipse.bounds(), ellipse.rotation, handle, pointer, min_size)
            else {
                return false;
            };
            ellipse.center = bounds.center();
            ellipse.radius_x = bounds.width() / 2.0;
            ellipse.radius_y = bounds.height() / 2.0;
            true
        }
        // Text moves and rotates but does not resize; path geometry is fixed.
        _ => false,
    }
}

/// Handles available for an element, for handle hit-testing in the select
/// tool.
pub fn handles_for(element: &Element) -> &'static [ResizeHandle] {
    match element {
        Element::Line(_) => &[ResizeHandle::Start, ResizeHandle::End],
        Element::Rectangle(_) | Element::Ellipse(_) => &ResizeHandle::BOX_HANDLES,
        Element::Text(_) | Element::Path(_) => &[],
    }
}
