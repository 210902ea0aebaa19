//! Layout grid for generating booths in bulk.
//!
//! The grid is a rectangle that can be moved, resized and rotated like a
//! booth, subdivided into `rows` x `cols` cells. Cells the user clicks are
//! assigned fresh booth ids; applying the grid turns every assigned cell
//! into a booth with its own position.

use crate::booth::{Booth, BoothPosition};
use crate::geometry::{NormalizedRect, rotate_point};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Prefix for booth ids created from grid cells.
pub const GRID_ID_PREFIX: &str = "S";

/// One cell of the grid, for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell<'a> {
    /// Row-major index: `row * cols + col`.
    pub index: usize,
    pub row: usize,
    pub col: usize,
    /// Unrotated cell rectangle; the grid rotation applies about its own center.
    pub rect: NormalizedRect,
    /// Booth id assigned to the cell.
    pub assigned: Option<&'a str>,
}

/// The layout grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub rect: NormalizedRect,
    /// Rotation in degrees about the grid's center.
    pub rotation: f64,
    rows: usize,
    cols: usize,
    /// Cell index to new booth id.
    cell_assignments: BTreeMap<usize, String>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(NormalizedRect::new(20.0, 20.0, 40.0, 20.0), 2, 4)
    }
}

/// Numeric suffix of an id such as `A12`.
fn numeric_suffix(id: &str) -> Option<u64> {
    let stem = id.trim_end_matches(|c: char| c.is_ascii_digit());
    id[stem.len()..].parse().ok()
}

impl GridLayout {
    /// Create a grid. Rows and columns are raised to at least 1.
    pub fn new(rect: NormalizedRect, rows: usize, cols: usize) -> Self {
        Self {
            rect,
            rotation: 0.0,
            rows: rows.max(1),
            cols: cols.max(1),
            cell_assignments: BTreeMap::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Change the number of rows, dropping assignments that fall outside.
    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows.max(1);
        self.prune_assignments();
    }

    /// Change the number of columns, dropping assignments that fall outside.
    pub fn set_cols(&mut self, cols: usize) {
        self.cols = cols.max(1);
        self.prune_assignments();
    }

    fn prune_assignments(&mut self) {
        let count = self.cell_count();
        self.cell_assignments.retain(|&index, _| index < count);
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Width and height of one cell.
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.rect.width / self.cols as f64,
            self.rect.height / self.rows as f64,
        )
    }

    /// Rectangle of a cell, or `None` when the index is out of range.
    pub fn cell_rect(&self, index: usize) -> Option<NormalizedRect> {
        if index >= self.cell_count() {
            return None;
        }
        let (row, col) = (index / self.cols, index % self.cols);
        let (cw, ch) = self.cell_size();
        Some(NormalizedRect::new(
            self.rect.x + col as f64 * cw,
            self.rect.y + row as f64 * ch,
            cw,
            ch,
        ))
    }

    /// Booth id assigned to a cell.
    pub fn assignment(&self, index: usize) -> Option<&str> {
        self.cell_assignments.get(&index).map(String::as_str)
    }

    /// Number of assigned cells.
    pub fn assigned_count(&self) -> usize {
        self.cell_assignments.len()
    }

    /// All cells in index order.
    pub fn cells(&self) -> Vec<GridCell<'_>> {
        (0..self.cell_count())
            .filter_map(|index| {
                let rect = self.cell_rect(index)?;
                Some(GridCell {
                    index,
                    row: index / self.cols,
                    col: index % self.cols,
                    rect,
                    assigned: self.assignment(index),
                })
            })
            .collect()
    }

    /// Index of the cell under a point, accounting for the grid rotation.
    pub fn cell_at(&self, point: Point) -> Option<usize> {
        if !self.rect.contains_rotated(point, self.rotation) {
            return None;
        }
        let local = rotate_point(point, self.rect.center(), -self.rotation);
        let (cw, ch) = self.cell_size();
        let col = (((local.x - self.rect.x) / cw).floor().max(0.0) as usize).min(self.cols - 1);
        let row = (((local.y - self.rect.y) / ch).floor().max(0.0) as usize).min(self.rows - 1);
        Some(row * self.cols + col)
    }

    /// Id for the next assigned cell: one past the highest numeric suffix
    /// among existing booths, offset by the cells already assigned.
    pub fn next_booth_id<'a>(&self, existing_ids: impl IntoIterator<Item = &'a str>) -> String {
        let existing: HashSet<&str> = existing_ids.into_iter().collect();
        let max_suffix = existing.iter().filter_map(|id| numeric_suffix(id)).max().unwrap_or(0);
        // Widened so a suffix near u64::MAX cannot overflow.
        let mut number = u128::from(max_suffix) + 1 + self.cell_assignments.len() as u128;
        loop {
            let id = format!("{GRID_ID_PREFIX}{number}");
            let taken = existing.contains(id.as_str())
                || self.cell_assignments.values().any(|assigned| *assigned == id);
            if !taken {
                return id;
            }
            number += 1;
        }
    }

    /// Assign a fresh booth id to an unassigned cell, or clear an assigned
    /// one. Returns the newly assigned id; `None` when the cell was cleared
    /// or the index is out of range.
    pub fn toggle_cell<'a>(
        &mut self,
        index: usize,
        existing_ids: impl IntoIterator<Item = &'a str>,
    ) -> Option<String> {
        if index >= self.cell_count() {
            return None;
        }
        if self.cell_assignments.remove(&index).is_some() {
            return None;
        }
        let id = self.next_booth_id(existing_ids);
        self.cell_assignments.insert(index, id.clone());
        Some(id)
    }

    /// Booths and positions for every assigned cell, in index order.
    /// Cells whose id already exists are skipped.
    pub fn generate<'a>(
        &self,
        existing_ids: impl IntoIterator<Item = &'a str>,
    ) -> Vec<(Booth, BoothPosition)> {
        let existing: HashSet<&str> = existing_ids.into_iter().collect();
        self.cell_assignments
            .iter()
            .filter(|(_, id)| !existing.contains(id.as_str()))
            .filter_map(|(&index, id)| {
                let rect = self.cell_rect(index)?;
                Some((
                    Booth::available(id.clone()),
                    BoothPosition::new(id.clone(), rect).with_rotation(self.rotation),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booth::BoothStatus;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_default_grid() {
        let grid = GridLayout::default();
        assert_eq!((grid.rows(), grid.cols()), (2, 4));
        assert_eq!(grid.rect, NormalizedRect::new(20.0, 20.0, 40.0, 20.0));
        assert_eq!(grid.cells().len(), 8);
    }

    #[test]
    fn test_apply_emits_cell_geometry() {
        let mut grid = GridLayout::new(NormalizedRect::new(10.0, 10.0, 40.0, 20.0), 2, 2);
        grid.toggle_cell(3, ["A1", "A2"]);

        let generated = grid.generate(["A1", "A2"]);
        assert_eq!(generated.len(), 1);
        let (booth, position) = &generated[0];
        assert_eq!(booth.status, BoothStatus::Available);
        assert_eq!(booth.id, position.id);
        assert!((position.x - 30.0).abs() < EPS);
        assert!((position.y - 20.0).abs() < EPS);
        assert!((position.width - 20.0).abs() < EPS);
        assert!((position.height - 10.0).abs() < EPS);
    }

    #[test]
    fn test_toggle_assigns_sequential_ids() {
        let mut grid = GridLayout::default();
        let existing = ["A1", "A12", "B3"];

        assert_eq!(grid.toggle_cell(0, existing).as_deref(), Some("S13"));
        assert_eq!(grid.toggle_cell(5, existing).as_deref(), Some("S14"));
        // Toggling again clears the cell
        assert_eq!(grid.toggle_cell(0, existing), None);
        assert_eq!(grid.assignment(0), None);
        // Next id skips the one still assigned
        assert_eq!(grid.toggle_cell(1, existing).as_deref(), Some("S15"));
        assert_eq!(grid.toggle_cell(99, existing), None);
    }

    #[test]
    fn test_next_id_skips_collisions() {
        let grid = GridLayout::default();
        assert_eq!(grid.next_booth_id(["S3", "S4", "X2"]), "S5");
        assert_eq!(grid.next_booth_id(["Hall", "Lobby"]), "S1");
    }

    #[test]
    fn test_next_id_past_u64_suffix() {
        let mut grid = GridLayout::default();
        let existing = ["A18446744073709551615"];
        assert_eq!(grid.next_booth_id(existing), "S18446744073709551616");
        assert_eq!(grid.toggle_cell(0, existing).as_deref(), Some("S18446744073709551616"));
        assert_eq!(grid.toggle_cell(1, existing).as_deref(), Some("S18446744073709551617"));
    }

    #[test]
    fn test_generate_skips_existing_ids() {
        let mut grid = GridLayout::default();
        grid.toggle_cell(0, []);
        grid.toggle_cell(1, []);
        let generated = grid.generate(["S1"]);
        assert_eq!(generated.len(), 1);
        assert_eq!(generated[0].0.id, "S2");
    }

    #[test]
    fn test_shrinking_drops_assignments() {
        let mut grid = GridLayout::default();
        grid.toggle_cell(7, []);
        grid.toggle_cell(2, []);
        grid.set_cols(2);
        assert_eq!(grid.assigned_count(), 1);
        assert!(grid.assignment(2).is_some());
        grid.set_rows(0);
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.assigned_count(), 0);
    }

    #[test]
    fn test_cell_at_rotated() {
        let mut grid = GridLayout::new(NormalizedRect::new(40.0, 40.0, 20.0, 10.0), 1, 2);
        assert_eq!(grid.cell_at(Point::new(45.0, 45.0)), Some(0));
        assert_eq!(grid.cell_at(Point::new(55.0, 45.0)), Some(1));
        assert_eq!(grid.cell_at(Point::new(10.0, 10.0)), None);

        grid.rotation = 90.0;
        // The right half now hangs below the center
        assert_eq!(grid.cell_at(Point::new(50.0, 53.0)), Some(1));
        assert_eq!(grid.cell_at(Point::new(50.0, 42.0)), Some(0));
    }
}
