//! What the render layer draws, and what lies under the pointer.

use crate::booth::{Booth, BoothPosition};
use crate::config::EditorConfig;
use crate::floor_plan::FloorPlan;
use crate::geometry::{Corner, NormalizedRect, rotate_point};
use crate::gesture::HitTarget;
use crate::grid::GridLayout;
use kurbo::Point;

/// The kind of handle - determines what manipulation it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Corner resize handle.
    Corner(Corner),
    /// Rotation handle above the top edge.
    Rotate,
}

/// A manipulation handle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: Point,
}

impl Handle {
    /// Create a new handle.
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// Check if a point (in world coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= radius * radius
    }
}

/// Corner handles at the rotated corners plus a rotation handle
/// `rotate_offset` above the top edge, rotated with the rectangle.
pub fn rect_handles(rect: NormalizedRect, rotation: f64, rotate_offset: f64) -> Vec<Handle> {
    let center = rect.center();
    let mut handles: Vec<Handle> = Corner::ALL
        .iter()
        .map(|&corner| Handle::new(HandleKind::Corner(corner), rect.rotated_corner(corner, rotation)))
        .collect();
    let knob = Point::new(center.x, rect.y - rotate_offset);
    handles.push(Handle::new(HandleKind::Rotate, rotate_point(knob, center, rotation)));
    handles
}

/// Handles of a booth.
pub fn booth_handles(position: &BoothPosition, config: &EditorConfig) -> Vec<Handle> {
    rect_handles(position.rect(), position.rotation, config.rotate_handle_offset)
}

/// Handles of the layout grid.
pub fn grid_handles(grid: &GridLayout, config: &EditorConfig) -> Vec<Handle> {
    rect_handles(grid.rect, grid.rotation, config.grid_rotate_handle_offset)
}

/// One booth to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem<'a> {
    pub booth: &'a Booth,
    pub position: &'a BoothPosition,
    /// The booth is the subject of the gesture in progress.
    pub active: bool,
    /// The booth is selected for the info panel.
    pub selected: bool,
}

/// Booths to draw, back to front. Positions without a booth and booths
/// without a position are skipped.
pub fn render_items<'a>(
    plan: &'a FloorPlan,
    active: Option<&str>,
    selected: Option<&str>,
) -> Vec<RenderItem<'a>> {
    plan.positions()
        .filter_map(|position| {
            let booth = plan.booth(&position.id)?;
            Some(RenderItem {
                booth,
                position,
                active: active == Some(position.id.as_str()),
                selected: selected == Some(position.id.as_str()),
            })
        })
        .collect()
}

/// Find what lies under a world point.
///
/// Booth handles come first (edit mode only), then booth bodies front to
/// back, then the grid's handles, cells and body.
pub fn hit_test(
    plan: &FloorPlan,
    grid: Option<&GridLayout>,
    point: Point,
    edit_mode: bool,
    config: &EditorConfig,
) -> HitTarget {
    let items = render_items(plan, None, None);

    if edit_mode {
        for item in items.iter().rev() {
            let hit = booth_handles(item.position, config)
                .into_iter()
                .find(|h| h.hit_test(point, config.handle_radius));
            match hit.map(|h| h.kind) {
                Some(HandleKind::Corner(corner)) => {
                    return HitTarget::ResizeHandle(item.position.id.clone(), corner);
                }
                Some(HandleKind::Rotate) => return HitTarget::RotateHandle(item.position.id.clone()),
                None => {}
            }
        }
    }

    if let Some(item) = items
        .iter()
        .rev()
        .find(|item| item.position.rect().contains_rotated(point, item.position.rotation))
    {
        return HitTarget::Booth(item.position.id.clone());
    }

    if let Some(grid) = grid {
        let hit = grid_handles(grid, config)
            .into_iter()
            .find(|h| h.hit_test(point, config.grid_handle_radius));
        match hit.map(|h| h.kind) {
            Some(HandleKind::Corner(corner)) => return HitTarget::GridResizeHandle(corner),
            Some(HandleKind::Rotate) => return HitTarget::GridRotateHandle,
            None => {}
        }
        if let Some(index) = grid.cell_at(point) {
            return HitTarget::GridCell(index);
        }
        if grid.rect.contains_rotated(point, grid.rotation) {
            return HitTarget::Grid;
        }
    }

    HitTarget::Canvas
}
