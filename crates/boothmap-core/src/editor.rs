//! Interactive floor plan editor.
//!
//! [`Editor`] owns the floor plan, the camera and the gesture in progress,
//! and turns pointer events from the render surface into plan updates.

use crate::booth::{Booth, BoothPosition, BoothStats, BoothStatus};
use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::floor_plan::FloorPlan;
use crate::geometry::{NormalizedRect, angle_between};
use crate::gesture::{Gesture, HitTarget, Subject};
use crate::grid::GridLayout;
use crate::input::{PointerEvent, PointerState};
use crate::manipulation::{drag_rect, grab_offset, resize_from_corner, rotation_for_pointer};
use crate::overlay::{self, RenderItem};
use crate::snap::snap_to_neighbors;
use kurbo::Point;

fn is_finite_point(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

/// The editor state machine.
#[derive(Debug, Clone)]
pub struct Editor {
    plan: FloorPlan,
    camera: Camera,
    config: EditorConfig,
    gesture: Gesture,
    pointer: PointerState,
    edit_mode: bool,
    grid: Option<GridLayout>,
    selected: Option<String>,
    /// Whether the current booth gesture already pushed its undo snapshot.
    snapshot_taken: bool,
}

impl Editor {
    /// Create an editor over a plan. Starts in view mode.
    pub fn new(plan: FloorPlan, config: EditorConfig) -> Self {
        Self {
            plan,
            camera: Camera::from_config(&config),
            config,
            gesture: Gesture::Idle,
            pointer: PointerState::new(),
            edit_mode: false,
            grid: None,
            selected: None,
            snapshot_taken: false,
        }
    }

    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    /// Consume the editor, returning its plan.
    pub fn into_plan(self) -> FloorPlan {
        self.plan
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Switch between view and edit mode. Any gesture in progress is cancelled.
    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        if self.edit_mode == edit_mode {
            return;
        }
        self.cancel_gesture();
        self.edit_mode = edit_mode;
        log::debug!("Edit mode {}", if edit_mode { "on" } else { "off" });
    }

    pub fn snap_enabled(&self) -> bool {
        self.config.snap_enabled
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.config.snap_enabled = enabled;
    }

    /// Booth chosen by a click in view mode.
    pub fn selected(&self) -> Option<&Booth> {
        self.selected.as_deref().and_then(|id| self.plan.booth(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Booths to draw, back to front.
    pub fn render_items(&self) -> Vec<RenderItem<'_>> {
        overlay::render_items(&self.plan, self.gesture.active_booth(), self.selected.as_deref())
    }

    /// Find what lies under a screen point.
    pub fn hit_test(&self, screen_point: Point) -> HitTarget {
        let world = self.camera.screen_to_world(screen_point);
        overlay::hit_test(&self.plan, self.grid.as_ref(), world, self.edit_mode, &self.config)
    }

    /// Dispatch a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, target } => self.pointer_down(target, position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
            PointerEvent::Wheel { position, delta_y } => {
                self.wheel(position, delta_y);
            }
        }
    }

    /// Start a gesture on `target` at a screen point. Non-finite points are
    /// ignored.
    pub fn pointer_down(&mut self, target: HitTarget, screen_point: Point) {
        if !is_finite_point(screen_point) {
            log::warn!("Ignoring pointer down at non-finite point {:?}", screen_point);
            return;
        }
        if !self.gesture.is_idle() {
            self.cancel_gesture();
        }
        self.pointer.press(screen_point, target.clone());
        let world = self.camera.screen_to_world(screen_point);

        let gesture = match target {
            HitTarget::Booth(id) if self.edit_mode => self.plan.position(&id).map(|pos| {
                Gesture::Dragging {
                    offset: grab_offset(pos.rect(), world),
                    subject: Subject::Booth(id),
                }
            }),
            HitTarget::ResizeHandle(id, corner) if self.edit_mode => {
                self.plan.position(&id).map(|_| Gesture::Resizing {
                    subject: Subject::Booth(id),
                    corner,
                })
            }
            HitTarget::RotateHandle(id) if self.edit_mode => {
                self.plan.position(&id).map(|pos| Gesture::Rotating {
                    start_angle: angle_between(pos.center(), world),
                    start_rotation: pos.rotation,
                    subject: Subject::Booth(id),
                })
            }
            HitTarget::Canvas | HitTarget::Booth(_) if !self.edit_mode => Some(Gesture::Panning {
                last: screen_point,
            }),
            HitTarget::Grid | HitTarget::GridCell(_) => {
                self.grid.as_ref().map(|grid| Gesture::Dragging {
                    subject: Subject::Grid,
                    offset: grab_offset(grid.rect, world),
                })
            }
            HitTarget::GridResizeHandle(corner) => self.grid.as_ref().map(|_| Gesture::Resizing {
                subject: Subject::Grid,
                corner,
            }),
            HitTarget::GridRotateHandle => self.grid.as_ref().map(|grid| Gesture::Rotating {
                subject: Subject::Grid,
                start_angle: angle_between(grid.rect.center(), world),
                start_rotation: grid.rotation,
            }),
            _ => None,
        };

        if let Some(gesture) = gesture {
            log::debug!("Started {} gesture on {:?}", gesture.name(), gesture.subject());
            self.gesture = gesture;
            self.snapshot_taken = false;
        }
    }

    /// Advance the gesture in progress to a new screen point.
    pub fn pointer_move(&mut self, screen_point: Point) {
        if !is_finite_point(screen_point) {
            return;
        }
        self.pointer.moved(screen_point);
        let world = self.camera.screen_to_world(screen_point);

        match self.gesture.clone() {
            Gesture::Idle => {}
            Gesture::Panning { last } => {
                self.camera.pan(screen_point - last);
                self.gesture = Gesture::Panning { last: screen_point };
            }
            Gesture::Dragging { subject, offset } => match subject {
                Subject::Booth(id) => {
                    let Some(pos) = self.plan.position(&id) else { return };
                    let mut candidate = drag_rect(pos.rect(), world, offset);
                    if self.config.snap_enabled {
                        // Positions left behind by a booth sync are not neighbors.
                        let neighbors =
                            self.plan.positions().filter(|p| self.plan.contains_booth(&p.id));
                        let snap = snap_to_neighbors(
                            &id,
                            candidate,
                            neighbors,
                            self.config.snap_threshold,
                        );
                        candidate = candidate.with_origin(snap.point).clamp_to_canvas();
                    }
                    let rotation = pos.rotation;
                    self.update_booth_geometry(&id, candidate, rotation);
                }
                Subject::Grid => {
                    if let Some(grid) = self.grid.as_mut() {
                        grid.rect = drag_rect(grid.rect, world, offset);
                    }
                }
            },
            Gesture::Resizing { subject, corner } => match subject {
                Subject::Booth(id) => {
                    let Some(pos) = self.plan.position(&id) else { return };
                    let rotation = pos.rotation;
                    let resized = resize_from_corner(
                        pos.rect(),
                        rotation,
                        corner,
                        world,
                        self.config.min_booth_size,
                    );
                    self.update_booth_geometry(&id, resized, rotation);
                }
                Subject::Grid => {
                    let min_size = self.config.min_booth_size;
                    if let Some(grid) = self.grid.as_mut() {
                        grid.rect =
                            resize_from_corner(grid.rect, grid.rotation, corner, world, min_size);
                    }
                }
            },
            Gesture::Rotating {
                subject,
                start_angle,
                start_rotation,
            } => match subject {
                Subject::Booth(id) => {
                    let Some(pos) = self.plan.position(&id) else { return };
                    let rect = pos.rect();
                    let rotation =
                        rotation_for_pointer(rect.center(), world, start_angle, start_rotation);
                    self.update_booth_geometry(&id, rect, rotation);
                }
                Subject::Grid => {
                    if let Some(grid) = self.grid.as_mut() {
                        grid.rotation = rotation_for_pointer(
                            grid.rect.center(),
                            world,
                            start_angle,
                            start_rotation,
                        );
                    }
                }
            },
        }
    }

    /// End the gesture in progress. A press that barely moved counts as a
    /// click: it selects a booth in view mode, clears the selection when it
    /// lands on the canvas, or toggles a grid cell.
    pub fn pointer_up(&mut self, screen_point: Point) {
        let screen_point = if is_finite_point(screen_point) {
            screen_point
        } else {
            self.pointer.position
        };
        let clicked = self.pointer.release(screen_point, self.config.click_tolerance);
        if !self.gesture.is_idle() {
            log::debug!("Ended {} gesture", self.gesture.name());
        }
        self.gesture = Gesture::Idle;
        self.snapshot_taken = false;

        match clicked {
            Some(HitTarget::Booth(id)) if !self.edit_mode => {
                if self.plan.contains_booth(&id) {
                    self.selected = Some(id);
                }
            }
            Some(HitTarget::Canvas) if !self.edit_mode => self.clear_selection(),
            Some(HitTarget::GridCell(index)) => self.toggle_grid_cell(index),
            _ => {}
        }
    }

    /// Zoom one wheel notch about a screen point.
    pub fn wheel(&mut self, screen_point: Point, delta_y: f64) -> bool {
        if !is_finite_point(screen_point) || !delta_y.is_finite() {
            return false;
        }
        self.camera.wheel(screen_point, delta_y, self.config.zoom_step)
    }

    /// Drop the gesture in progress without further changes.
    pub fn cancel_gesture(&mut self) {
        if !self.gesture.is_idle() {
            log::debug!("Cancelled {} gesture", self.gesture.name());
        }
        self.gesture = Gesture::Idle;
        self.pointer.reset();
        self.snapshot_taken = false;
    }

    fn update_booth_geometry(&mut self, id: &str, rect: NormalizedRect, rotation: f64) {
        let unchanged = self
            .plan
            .position(id)
            .is_some_and(|pos| pos.rect() == rect && pos.rotation == rotation);
        if unchanged {
            return;
        }
        if !self.snapshot_taken {
            self.plan.push_undo();
            self.snapshot_taken = true;
        }
        self.plan.set_geometry(id, rect, rotation);
    }

    /// The layout grid, while grid mode is active.
    pub fn grid(&self) -> Option<&GridLayout> {
        self.grid.as_ref()
    }

    /// Enter grid mode with the default grid. Does nothing if already active.
    pub fn enter_grid_mode(&mut self) {
        if self.grid.is_none() {
            self.grid = Some(GridLayout::default());
            log::debug!("Entered grid mode");
        }
    }

    /// Change the grid's row count.
    pub fn set_grid_rows(&mut self, rows: usize) {
        if let Some(grid) = self.grid.as_mut() {
            grid.set_rows(rows);
        }
    }

    /// Change the grid's column count.
    pub fn set_grid_cols(&mut self, cols: usize) {
        if let Some(grid) = self.grid.as_mut() {
            grid.set_cols(cols);
        }
    }

    /// Assign or clear a grid cell.
    pub fn toggle_grid_cell(&mut self, index: usize) {
        let Some(grid) = self.grid.as_mut() else { return };
        let existing = self.plan.booths().iter().map(|b| b.id.as_str());
        if let Some(id) = grid.toggle_cell(index, existing) {
            log::debug!("Assigned {} to grid cell {}", id, index);
        }
    }

    /// Turn every assigned cell into a booth and leave grid mode.
    /// Returns the ids of the booths added.
    pub fn apply_grid(&mut self) -> Vec<String> {
        let Some(grid) = self.grid.take() else {
            return Vec::new();
        };
        if matches!(self.gesture.subject(), Some(Subject::Grid)) {
            self.cancel_gesture();
        }

        let generated = grid.generate(self.plan.booths().iter().map(|b| b.id.as_str()));
        if generated.is_empty() {
            return Vec::new();
        }
        self.plan.push_undo();
        let ids: Vec<String> = generated.iter().map(|(booth, _)| booth.id.clone()).collect();
        for (booth, position) in generated {
            self.plan.add_booth(booth, position);
        }
        log::info!("Added {} booths from grid", ids.len());
        ids
    }

    /// Leave grid mode, discarding the grid.
    pub fn cancel_grid(&mut self) {
        if self.grid.take().is_some() {
            if matches!(self.gesture.subject(), Some(Subject::Grid)) {
                self.cancel_gesture();
            }
            log::debug!("Cancelled grid mode");
        }
    }

    /// Add a booth with its position.
    pub fn add_booth(&mut self, booth: Booth, position: BoothPosition) {
        self.plan.push_undo();
        self.plan.add_booth(booth, position);
    }

    /// Update a booth's status and metadata.
    pub fn update_booth(&mut self, booth: Booth) -> bool {
        if !self.plan.contains_booth(&booth.id) {
            return false;
        }
        self.plan.push_undo();
        self.plan.update_booth(booth)
    }

    /// Change the status of a booth.
    pub fn set_booth_status(&mut self, id: &str, status: BoothStatus) -> bool {
        if self.plan.booth(id).is_none_or(|booth| booth.status == status) {
            return false;
        }
        self.plan.push_undo();
        self.plan.set_status(id, status)
    }

    /// Remove a booth and its position.
    pub fn remove_booth(&mut self, id: &str) -> Option<Booth> {
        if !self.plan.contains_booth(id) {
            return None;
        }
        if self.gesture.active_booth() == Some(id) {
            self.cancel_gesture();
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.plan.push_undo();
        self.plan.remove_booth(id)
    }

    /// Replace the booth list from an external sync. Positions, including
    /// the one being dragged, are left alone.
    pub fn replace_booths(&mut self, booths: Vec<Booth>) {
        self.plan.replace_booths(booths);
        if self.selected().is_none() {
            self.selected = None;
        }
    }

    /// Move every booth back to the default layout.
    pub fn reset_positions(&mut self) {
        self.cancel_gesture();
        self.plan.push_undo();
        self.plan.reset_positions();
    }

    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        self.plan.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        self.plan.redo()
    }

    pub fn stats(&self) -> BoothStats {
        self.plan.stats()
    }
}
