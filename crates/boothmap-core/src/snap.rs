//! Snap functionality for aligning a dragged booth with its neighbors.

use crate::booth::BoothPosition;
use crate::geometry::NormalizedRect;
use kurbo::Point;

/// Distance threshold for neighbor snapping (in percent of the canvas).
pub const SNAP_THRESHOLD: f64 = 1.5;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    /// The snapped top-left corner.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap the candidate rectangle of booth `id` against every other position.
///
/// Each axis is adjusted independently when an edge of the candidate is
/// within `threshold` of a neighbor edge, either aligned with the same edge
/// or abutting the opposite one. Neighbors are visited in iteration order
/// and a later match overrides an earlier one on the same axis, so the
/// last matching neighbor wins. All comparisons use the unsnapped
/// candidate. Width and height are never changed.
pub fn snap_to_neighbors<'a>(
    id: &str,
    candidate: NormalizedRect,
    positions: impl IntoIterator<Item = &'a BoothPosition>,
    threshold: f64,
) -> SnapResult {
    let near = |a: f64, b: f64| (a - b).abs() < threshold;
    let (x, y) = (candidate.x, candidate.y);
    let (right, bottom) = (candidate.right(), candidate.bottom());
    let mut result = SnapResult::none(candidate.origin());

    for neighbor in positions {
        if neighbor.id == id {
            continue;
        }
        let other = neighbor.rect();

        // Same-edge alignment
        if near(y, other.y) {
            result.point.y = other.y;
            result.snapped_y = true;
        }
        if near(bottom, other.bottom()) {
            result.point.y = other.bottom() - candidate.height;
            result.snapped_y = true;
        }
        if near(x, other.x) {
            result.point.x = other.x;
            result.snapped_x = true;
        }
        if near(right, other.right()) {
            result.point.x = other.right() - candidate.width;
            result.snapped_x = true;
        }

        // Edge-to-edge abutment
        if near(x, other.right()) {
            result.point.x = other.right();
            result.snapped_x = true;
        }
        if near(right, other.x) {
            result.point.x = other.x - candidate.width;
            result.snapped_x = true;
        }
        if near(y, other.bottom()) {
            result.point.y = other.bottom();
            result.snapped_y = true;
        }
        if near(bottom, other.y) {
            result.point.y = other.y - candidate.height;
            result.snapped_y = true;
        }
    }

    result
}
