//! Drag, resize and rotate math shared by booths and the layout grid.
//!
//! Every function here works purely in the normalized space; callers convert
//! screen points through the camera first.

use crate::geometry::{
    Corner, NormalizedRect, angle_between, clamp_to_canvas, normalize_degrees, rotate_point,
};
use kurbo::{Point, Vec2};

/// Offset from a rectangle's top-left corner to the pointer that grabbed it.
pub fn grab_offset(rect: NormalizedRect, pointer: Point) -> Vec2 {
    pointer - rect.origin()
}

/// Move a rectangle so the grabbed point follows the pointer, clamped into
/// the canvas.
pub fn drag_rect(rect: NormalizedRect, pointer: Point, offset: Vec2) -> NormalizedRect {
    rect.with_origin(pointer - offset).clamp_to_canvas()
}

/// Resize a (possibly rotated) rectangle by dragging `corner` to `pointer`.
///
/// The pointer is mapped into the rectangle's local frame, the new size is
/// measured from the opposite corner and floored at `min_size`, and for a
/// rotated rectangle the result is shifted so the opposite corner keeps its
/// world position. The result is clamped into the canvas.
pub fn resize_from_corner(
    rect: NormalizedRect,
    rotation: f64,
    corner: Corner,
    pointer: Point,
    min_size: f64,
) -> NormalizedRect {
    let pointer = clamp_to_canvas(pointer);
    let center = rect.center();
    let local = rotate_point(pointer, center, -rotation);
    let anchor_corner = corner.opposite();
    let anchor = rect.corner(anchor_corner);

    let width = if corner.is_left() {
        anchor.x - local.x
    } else {
        local.x - anchor.x
    }
    .max(min_size);
    let height = if corner.is_top() {
        anchor.y - local.y
    } else {
        local.y - anchor.y
    }
    .max(min_size);

    let x = if corner.is_left() { anchor.x - width } else { anchor.x };
    let y = if corner.is_top() { anchor.y - height } else { anchor.y };
    let mut resized = NormalizedRect::new(x, y, width, height);

    if rotation != 0.0 {
        // The center moved, so the anchor rotated to a new place; undo that.
        let anchor_world = rotate_point(anchor, center, rotation);
        let drifted = resized.rotated_corner(anchor_corner, rotation);
        resized = resized.translated(anchor_world - drifted);
    }

    resized.clamp_to_canvas()
}

/// Rotation after the pointer moved around `center` during a rotate gesture.
pub fn rotation_for_pointer(
    center: Point,
    pointer: Point,
    start_angle: f64,
    start_rotation: f64,
) -> f64 {
    normalize_degrees(start_rotation + angle_between(center, pointer) - start_angle)
}
