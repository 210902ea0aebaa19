//! An editing session over one stored floor plan.
//!
//! Commands are replayed as pointer gestures against the editor, the same
//! way a render surface would drive it, so snapping, clamping and the size
//! floor all apply.

use boothmap_core::geometry::{Corner, NormalizedRect, rotate_point};
use boothmap_core::overlay::booth_handles;
use boothmap_core::storage::{Storage, StorageError, layout_key};
use boothmap_core::{Editor, EditorConfig, FloorPlan, HandleKind, HitTarget, PointerEvent};
use kurbo::{Point, Vec2};

/// Session errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("unknown booth `{0}`")]
    UnknownBooth(String),
    #[error("{name} must be a finite number, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("grid cell {index} is outside a {rows}x{cols} grid")]
    InvalidCell { index: usize, rows: usize, cols: usize },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn require_finite(name: &'static str, value: f64) -> Result<(), SessionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SessionError::NonFinite { name, value })
    }
}

/// A floor plan loaded from storage, edited and saved back.
pub struct Session<S: Storage> {
    storage: S,
    key: String,
    editor: Editor,
}

impl<S: Storage> Session<S> {
    /// Load the layout for `event_id`, or the default layout if none is stored.
    pub fn open(storage: S, user: Option<&str>, event_id: &str, config: EditorConfig) -> Self {
        let key = layout_key(user, event_id);
        let plan = FloorPlan::load_or_default(&storage, &key, event_id, config.min_booth_size);
        let mut editor = Editor::new(plan, config);
        editor.set_edit_mode(true);
        Self {
            storage,
            key,
            editor,
        }
    }

    /// Storage key of this session's layout.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Persist the current plan.
    pub fn save(&self) -> Result<(), SessionError> {
        self.editor.plan().save(&self.storage, &self.key)?;
        Ok(())
    }

    fn to_screen(&self, world: Point) -> Point {
        self.editor.camera().world_to_screen(world)
    }

    /// Press on `target` at world point `from`, move to `to` and release.
    fn gesture(&mut self, target: HitTarget, from: Point, to: Point) {
        let (from, to) = (self.to_screen(from), self.to_screen(to));
        self.editor.handle_pointer_event(PointerEvent::Down { position: from, target });
        self.editor.handle_pointer_event(PointerEvent::Move { position: to });
        self.editor.handle_pointer_event(PointerEvent::Up { position: to });
    }

    /// Press and release on `target` without moving.
    fn click(&mut self, target: HitTarget, at: Point) {
        let at = self.to_screen(at);
        self.editor.handle_pointer_event(PointerEvent::Down { position: at, target });
        self.editor.handle_pointer_event(PointerEvent::Up { position: at });
    }

    fn handle_position(&self, id: &str, kind: HandleKind) -> Result<Point, SessionError> {
        let position = self
            .editor
            .plan()
            .position(id)
            .ok_or_else(|| SessionError::UnknownBooth(id.to_string()))?;
        booth_handles(position, self.editor.config())
            .into_iter()
            .find(|h| h.kind == kind)
            .map(|h| h.position)
            .ok_or_else(|| SessionError::UnknownBooth(id.to_string()))
    }

    /// Drag a booth by `delta` normalized units.
    pub fn move_booth(&mut self, id: &str, delta: Vec2) -> Result<(), SessionError> {
        require_finite("dx", delta.x)?;
        require_finite("dy", delta.y)?;
        let center = self
            .editor
            .plan()
            .position(id)
            .map(|p| p.center())
            .ok_or_else(|| SessionError::UnknownBooth(id.to_string()))?;
        self.gesture(HitTarget::Booth(id.to_string()), center, center + delta);
        Ok(())
    }

    /// Drag one corner handle of a booth by `delta` normalized units.
    pub fn resize_booth(&mut self, id: &str, corner: Corner, delta: Vec2) -> Result<(), SessionError> {
        require_finite("dx", delta.x)?;
        require_finite("dy", delta.y)?;
        let handle = self.handle_position(id, HandleKind::Corner(corner))?;
        self.gesture(HitTarget::ResizeHandle(id.to_string(), corner), handle, handle + delta);
        Ok(())
    }

    /// Turn a booth's rotation handle by `degrees` about the booth center.
    pub fn rotate_booth(&mut self, id: &str, degrees: f64) -> Result<(), SessionError> {
        require_finite("degrees", degrees)?;
        let knob = self.handle_position(id, HandleKind::Rotate)?;
        let center = self
            .editor
            .plan()
            .position(id)
            .map(|p| p.center())
            .ok_or_else(|| SessionError::UnknownBooth(id.to_string()))?;
        let target = rotate_point(knob, center, degrees);
        self.gesture(HitTarget::RotateHandle(id.to_string()), knob, target);
        Ok(())
    }

    /// Lay out a grid over `rect`, assign `cells` and apply it.
    /// Returns the ids of the booths created.
    pub fn generate_grid(
        &mut self,
        rect: NormalizedRect,
        rows: usize,
        cols: usize,
        cells: &[usize],
    ) -> Result<Vec<String>, SessionError> {
        require_finite("x", rect.x)?;
        require_finite("y", rect.y)?;
        require_finite("width", rect.width)?;
        require_finite("height", rect.height)?;
        self.editor.enter_grid_mode();
        self.editor.set_grid_rows(rows);
        self.editor.set_grid_cols(cols);

        // Move the grid's top-left corner onto the target, then stretch it
        if let Some(grid) = self.editor.grid().cloned() {
            let grab = grid.rect.center();
            self.gesture(HitTarget::Grid, grab, grab + (rect.origin() - grid.rect.origin()));
        }
        if let Some(grid) = self.editor.grid().cloned() {
            let corner = grid.rect.corner(Corner::BottomRight);
            let target = rect.corner(Corner::BottomRight);
            self.gesture(HitTarget::GridResizeHandle(Corner::BottomRight), corner, target);
        }

        for &index in cells {
            let Some(grid) = self.editor.grid().cloned() else { break };
            let Some(cell) = grid.cell_rect(index) else {
                let (rows, cols) = (grid.rows(), grid.cols());
                self.editor.cancel_grid();
                return Err(SessionError::InvalidCell { index, rows, cols });
            };
            // Skip cells a duplicate index already assigned
            if grid.assignment(index).is_none() {
                self.click(HitTarget::GridCell(index), cell.center());
            }
        }

        Ok(self.editor.apply_grid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boothmap_core::MemoryStorage;

    const EPS: f64 = 1e-6;

    fn session() -> Session<MemoryStorage> {
        let config = EditorConfig {
            snap_enabled: false,
            ..EditorConfig::default()
        };
        Session::open(MemoryStorage::new(), None, "1", config)
    }

    #[test]
    fn test_move_and_save() {
        let mut session = session();
        session.move_booth("A1", Vec2::new(5.0, 0.0)).unwrap();
        session.save().unwrap();

        let stored = session.storage.load("booth_app_1").unwrap();
        let a1 = stored.booth_positions.iter().find(|p| p.id == "A1").unwrap();
        assert!((a1.x - 24.0).abs() < EPS);
        assert!((a1.y - 18.0).abs() < EPS);
    }

    #[test]
    fn test_unknown_booth() {
        let mut session = session();
        let result = session.move_booth("Z9", Vec2::new(1.0, 0.0));
        assert!(matches!(result, Err(SessionError::UnknownBooth(_))));
    }

    #[test]
    fn test_non_finite_arguments_are_rejected() {
        let mut session = session();
        let result = session.move_booth("A1", Vec2::new(f64::NAN, 0.0));
        assert!(matches!(result, Err(SessionError::NonFinite { name: "dx", .. })));
        let result = session.resize_booth("A1", Corner::TopLeft, Vec2::new(0.0, f64::INFINITY));
        assert!(matches!(result, Err(SessionError::NonFinite { name: "dy", .. })));
        let result = session.rotate_booth("A1", f64::NAN);
        assert!(matches!(result, Err(SessionError::NonFinite { name: "degrees", .. })));
        let result =
            session.generate_grid(NormalizedRect::new(10.0, 60.0, f64::NAN, 20.0), 2, 2, &[0]);
        assert!(matches!(result, Err(SessionError::NonFinite { name: "width", .. })));
        assert!(session.editor().grid().is_none());

        // Nothing changed, and the layout still saves and reloads
        assert!(!session.editor().plan().can_undo());
        session.save().unwrap();
        let stored = session.storage.load("booth_app_1").unwrap();
        assert_eq!(stored.booth_positions.len(), 15);
        let a1 = stored.booth_positions.iter().find(|p| p.id == "A1").unwrap();
        assert!((a1.x - 19.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_and_resize() {
        let mut session = session();
        session.rotate_booth("B1", 45.0).unwrap();
        let b1 = session.editor().plan().position("B1").unwrap();
        assert!((b1.rotation - 45.0).abs() < EPS);

        session.resize_booth("A3", Corner::BottomRight, Vec2::new(1.0, 2.0)).unwrap();
        let a3 = session.editor().plan().position("A3").unwrap();
        assert!((a3.width - 6.0).abs() < EPS);
        assert!((a3.height - 12.5).abs() < EPS);
    }

    #[test]
    fn test_generate_grid() {
        let mut session = session();
        let ids = session
            .generate_grid(NormalizedRect::new(10.0, 60.0, 40.0, 20.0), 2, 2, &[3, 0])
            .unwrap();
        // Cell 3 was clicked first; booths come out in cell order
        assert_eq!(ids, vec!["S14".to_string(), "S13".to_string()]);

        let s13 = session.editor().plan().position("S13").unwrap();
        assert!((s13.x - 30.0).abs() < EPS);
        assert!((s13.y - 70.0).abs() < EPS);
        assert!((s13.width - 20.0).abs() < EPS);
        assert!((s13.height - 10.0).abs() < EPS);
    }

    #[test]
    fn test_generate_grid_rejects_bad_cell() {
        let mut session = session();
        let result = session.generate_grid(NormalizedRect::new(10.0, 60.0, 40.0, 20.0), 1, 2, &[5]);
        assert!(matches!(result, Err(SessionError::InvalidCell { index: 5, .. })));
        assert!(session.editor().grid().is_none());
    }
}
