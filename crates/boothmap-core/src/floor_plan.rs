//! Floor plan: the booths of one event and their positions.

use crate::booth::{Booth, BoothPosition, BoothStats, BoothStatus};
use crate::geometry::{MIN_BOOTH_SIZE, NormalizedRect};
use crate::storage::{LayoutDocument, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Default booth row geometry: (id prefix, count, first x, step, y, width, height).
const DEFAULT_ROWS: [(&str, usize, f64, f64, f64, f64, f64); 2] = [
    ("A", 12, 19.0, 5.15, 18.0, 5.0, 10.5),
    ("B", 3, 43.0, 4.8, 50.5, 4.5, 10.5),
];

/// The booths shipped with a fresh event.
pub fn default_booths() -> Vec<Booth> {
    let mut booths: Vec<Booth> = DEFAULT_ROWS
        .iter()
        .flat_map(|&(prefix, count, ..)| (1..=count).map(move |n| Booth::available(format!("{prefix}{n}"))))
        .collect();
    let booked = [
        ("A2", "ТехноПром", "Иванов И.И.", "50 000 ₽", "3x3 м"),
        ("A5", "ИнноВейт", "Петрова А.С.", "50 000 ₽", "3x3 м"),
        ("A10", "МегаСтрой", "Сидоров П.П.", "50 000 ₽", "3x3 м"),
        ("B3", "ЭкоЛайн", "Морозова Е.В.", "75 000 ₽", "4x4 м"),
    ];
    for (id, company, contact, price, size) in booked {
        if let Some(booth) = booths.iter_mut().find(|b| b.id == id) {
            *booth = Booth::available(id).booked_by(company, contact, price, size);
        }
    }
    booths
}

/// Positions of the default booths on the venue map.
pub fn default_positions() -> Vec<BoothPosition> {
    DEFAULT_ROWS
        .iter()
        .flat_map(|&(prefix, count, x0, step, y, width, height)| {
            (0..count).map(move |i| {
                // Round to avoid accumulating float noise in stored layouts
                let x = ((x0 + step * i as f64) * 100.0).round() / 100.0;
                BoothPosition::new(format!("{prefix}{}", i + 1), NormalizedRect::new(x, y, width, height))
            })
        })
        .collect()
}

/// A snapshot of plan state for undo/redo.
#[derive(Debug, Clone)]
struct PlanSnapshot {
    booths: Vec<Booth>,
    positions: HashMap<String, BoothPosition>,
    z_order: Vec<String>,
    deleted_booth_ids: Vec<String>,
}

/// The booths of one event and their positions on the venue map.
///
/// Booths and positions share ids but live in separate collections: a sync
/// replaces the booth list wholesale while positions belong to the editor.
/// Every mutator keeps the two id-synchronized; readers skip ids present in
/// only one of them.
#[derive(Debug, Clone)]
pub struct FloorPlan {
    /// Event (venue) this plan belongs to.
    pub event_id: String,
    /// Spreadsheet the booth list is synchronized from.
    pub sheet_url: String,
    /// Booths in display order.
    booths: Vec<Booth>,
    /// Positions keyed by booth id.
    positions: HashMap<String, BoothPosition>,
    /// Draw order of positions (back to front).
    z_order: Vec<String>,
    /// Ids removed by the user.
    deleted_booth_ids: Vec<String>,
    undo_stack: Vec<PlanSnapshot>,
    redo_stack: Vec<PlanSnapshot>,
}

impl FloorPlan {
    /// Create an empty plan.
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            sheet_url: String::new(),
            booths: Vec::new(),
            positions: HashMap::new(),
            z_order: Vec::new(),
            deleted_booth_ids: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Create a plan holding the default booths and layout.
    pub fn with_default_layout(event_id: impl Into<String>) -> Self {
        let mut plan = Self::new(event_id);
        plan.booths = default_booths();
        for position in default_positions() {
            plan.insert_position(position);
        }
        plan
    }

    fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            booths: self.booths.clone(),
            positions: self.positions.clone(),
            z_order: self.z_order.clone(),
            deleted_booth_ids: self.deleted_booth_ids.clone(),
        }
    }

    fn restore(&mut self, snapshot: PlanSnapshot) {
        self.booths = snapshot.booths;
        self.positions = snapshot.positions;
        self.z_order = snapshot.z_order;
        self.deleted_booth_ids = snapshot.deleted_booth_ids;
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                let current = self.snapshot();
                self.redo_stack.push(current);
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                let current = self.snapshot();
                self.undo_stack.push(current);
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Booths in display order.
    pub fn booths(&self) -> &[Booth] {
        &self.booths
    }

    /// Get a booth by id.
    pub fn booth(&self, id: &str) -> Option<&Booth> {
        self.booths.iter().find(|b| b.id == id)
    }

    /// Check whether a booth exists.
    pub fn contains_booth(&self, id: &str) -> bool {
        self.booth(id).is_some()
    }

    /// Get a position by booth id.
    pub fn position(&self, id: &str) -> Option<&BoothPosition> {
        self.positions.get(id)
    }

    /// Positions in draw order (back to front).
    pub fn positions(&self) -> impl Iterator<Item = &BoothPosition> {
        self.z_order.iter().filter_map(|id| self.positions.get(id))
    }

    /// Ids the user deleted.
    pub fn deleted_booth_ids(&self) -> &[String] {
        &self.deleted_booth_ids
    }

    /// Number of booths.
    pub fn len(&self) -> usize {
        self.booths.len()
    }

    /// Check if the plan has no booths.
    pub fn is_empty(&self) -> bool {
        self.booths.is_empty()
    }

    fn insert_position(&mut self, mut position: BoothPosition) {
        let rect = position.rect();
        if rect.is_finite() {
            position.set_rect(rect.clamp_to_canvas());
        } else {
            position.set_rect(rect.sanitized(MIN_BOOTH_SIZE));
        }
        if !position.rotation.is_finite() {
            position.rotation = 0.0;
        }
        if !self.positions.contains_key(&position.id) {
            self.z_order.push(position.id.clone());
        }
        self.positions.insert(position.id.clone(), position);
    }

    /// Add a booth with its position, replacing any booth with the same id.
    pub fn add_booth(&mut self, booth: Booth, mut position: BoothPosition) {
        position.id.clone_from(&booth.id);
        self.deleted_booth_ids.retain(|id| *id != booth.id);
        match self.booths.iter_mut().find(|b| b.id == booth.id) {
            Some(existing) => *existing = booth,
            None => self.booths.push(booth),
        }
        self.insert_position(position);
    }

    /// Update a booth's status and metadata. Returns false for unknown ids.
    pub fn update_booth(&mut self, booth: Booth) -> bool {
        match self.booths.iter_mut().find(|b| b.id == booth.id) {
            Some(existing) => {
                *existing = booth;
                true
            }
            None => false,
        }
    }

    /// Change only the status of a booth.
    pub fn set_status(&mut self, id: &str, status: BoothStatus) -> bool {
        match self.booths.iter_mut().find(|b| b.id == id) {
            Some(booth) => {
                booth.status = status;
                true
            }
            None => false,
        }
    }

    /// Remove a booth and its position, remembering the id as deleted.
    pub fn remove_booth(&mut self, id: &str) -> Option<Booth> {
        let index = self.booths.iter().position(|b| b.id == id)?;
        let booth = self.booths.remove(index);
        self.positions.remove(id);
        self.z_order.retain(|z| z != id);
        if !self.deleted_booth_ids.iter().any(|d| d == id) {
            self.deleted_booth_ids.push(id.to_string());
        }
        Some(booth)
    }

    /// Replace the booth list from an external sync.
    ///
    /// Deleted ids are dropped. Positions are left untouched, so a sync can
    /// never move a booth, even one that is being dragged.
    pub fn replace_booths(&mut self, booths: Vec<Booth>) {
        self.booths = booths
            .into_iter()
            .filter(|b| !self.deleted_booth_ids.contains(&b.id))
            .collect();
    }

    /// Replace the rectangle and rotation of an existing position.
    /// The rectangle is clamped into the canvas. Returns false for unknown ids.
    /// Non-finite geometry is rejected and leaves the position unchanged.
    pub fn set_geometry(&mut self, id: &str, rect: NormalizedRect, rotation: f64) -> bool {
        if !rect.is_finite() || !rotation.is_finite() {
            log::warn!("Ignoring non-finite geometry for booth {}", id);
            return false;
        }
        match self.positions.get_mut(id) {
            Some(position) => {
                position.set_rect(rect.clamp_to_canvas());
                position.rotation = rotation;
                true
            }
            None => false,
        }
    }

    /// Restore the default layout positions.
    pub fn reset_positions(&mut self) {
        self.positions.clear();
        self.z_order.clear();
        for position in default_positions() {
            self.insert_position(position);
        }
    }

    /// Occupancy figures.
    pub fn stats(&self) -> BoothStats {
        BoothStats::from_booths(&self.booths)
    }

    /// Build the persisted form.
    pub fn to_document(&self) -> LayoutDocument {
        LayoutDocument {
            booth_positions: self.positions().cloned().collect(),
            booths: self.booths.clone(),
            sheet_url: self.sheet_url.clone(),
            deleted_booth_ids: self.deleted_booth_ids.clone(),
            saved_at: None,
        }
    }

    /// Rebuild a plan from its persisted form.
    ///
    /// Degenerate geometry is repaired with `min_size` as the size floor. A
    /// document without booths gets the default booths. Positions whose
    /// booth is missing or deleted are dropped.
    pub fn from_document(event_id: impl Into<String>, document: LayoutDocument, min_size: f64) -> Self {
        let mut plan = Self::new(event_id);
        plan.sheet_url = document.sheet_url;
        plan.deleted_booth_ids = document.deleted_booth_ids;
        plan.booths = if document.booths.is_empty() {
            default_booths()
        } else {
            document.booths
        };
        plan.booths.retain(|b| !plan.deleted_booth_ids.contains(&b.id));

        let mut repaired = 0;
        let mut orphaned = 0;
        for mut position in document.booth_positions {
            if !plan.contains_booth(&position.id) {
                orphaned += 1;
                continue;
            }
            let rect = position.rect();
            let sanitized = rect.sanitized(min_size);
            if sanitized != rect || !position.rotation.is_finite() {
                repaired += 1;
            }
            position.set_rect(sanitized);
            if !position.rotation.is_finite() {
                position.rotation = 0.0;
            }
            plan.insert_position(position);
        }
        if repaired > 0 {
            log::warn!("Repaired {} degenerate booth positions in event {}", repaired, plan.event_id);
        }
        if orphaned > 0 {
            log::warn!("Dropped {} positions without a booth in event {}", orphaned, plan.event_id);
        }
        plan
    }

    /// Load a plan from storage, falling back to the default layout when the
    /// stored layout is missing, unreadable or has no positions.
    pub fn load_or_default(storage: &dyn Storage, key: &str, event_id: &str, min_size: f64) -> Self {
        match storage.load(key) {
            Ok(document) if !document.booth_positions.is_empty() => {
                log::info!("Loaded layout {} ({} positions)", key, document.booth_positions.len());
                Self::from_document(event_id, document, min_size)
            }
            Ok(_) => {
                log::info!("Layout {} has no positions, using default layout", key);
                Self::with_default_layout(event_id)
            }
            Err(StorageError::NotFound(_)) => {
                log::info!("No stored layout {}, using default layout", key);
                Self::with_default_layout(event_id)
            }
            Err(e) => {
                log::warn!("Failed to load layout {}: {}; using default layout", key, e);
                Self::with_default_layout(event_id)
            }
        }
    }

    /// Save the plan under `key`.
    pub fn save(&self, storage: &dyn Storage, key: &str) -> StorageResult<()> {
        let mut document = self.to_document();
        document.saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs());
        storage.save(key, &document)?;
        log::info!("Saved layout {} ({} positions)", key, document.booth_positions.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_default_layout() {
        let plan = FloorPlan::with_default_layout("1");
        assert_eq!(plan.len(), 15);
        assert_eq!(plan.positions().count(), 15);

        let a1 = plan.position("A1").unwrap();
        assert_eq!(a1.rect(), NormalizedRect::new(19.0, 18.0, 5.0, 10.5));
        let a12 = plan.position("A12").unwrap();
        assert!((a12.x - 75.65).abs() < 1e-9);
        let b3 = plan.position("B3").unwrap();
        assert!((b3.x - 52.6).abs() < 1e-9);

        let stats = plan.stats();
        assert_eq!(stats.booked, 4);
        assert_eq!(stats.available, 11);
    }

    #[test]
    fn test_remove_booth_removes_position() {
        let mut plan = FloorPlan::with_default_layout("1");
        assert!(plan.remove_booth("A3").is_some());
        assert!(plan.position("A3").is_none());
        assert!(plan.positions().all(|p| p.id != "A3"));
        assert_eq!(plan.deleted_booth_ids(), ["A3".to_string()]);
        assert!(plan.remove_booth("A3").is_none());
    }

    #[test]
    fn test_replace_booths_keeps_positions_and_deletions() {
        let mut plan = FloorPlan::with_default_layout("1");
        plan.remove_booth("A1");
        let before: Vec<BoothPosition> = plan.positions().cloned().collect();

        plan.replace_booths(vec![
            Booth::available("A1"),
            Booth::new("A2", BoothStatus::Unavailable),
        ]);

        assert!(!plan.contains_booth("A1"));
        assert_eq!(plan.booth("A2").unwrap().status, BoothStatus::Unavailable);
        let after: Vec<BoothPosition> = plan.positions().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_add_booth_clamps_and_undeletes() {
        let mut plan = FloorPlan::new("1");
        plan.add_booth(Booth::available("X"), BoothPosition::new("X", NormalizedRect::new(5.0, 5.0, 2.0, 2.0)));
        plan.remove_booth("X");
        plan.add_booth(
            Booth::available("X"),
            BoothPosition::new("ignored", NormalizedRect::new(99.0, -4.0, 2.0, 2.0)),
        );
        let pos = plan.position("X").unwrap();
        assert_eq!(pos.rect(), NormalizedRect::new(98.0, 0.0, 2.0, 2.0));
        assert!(plan.deleted_booth_ids().is_empty());
    }

    #[test]
    fn test_undo_redo() {
        let mut plan = FloorPlan::with_default_layout("1");
        plan.push_undo();
        plan.set_geometry("A1", NormalizedRect::new(50.0, 50.0, 5.0, 5.0), 30.0);

        assert!(plan.undo());
        assert!((plan.position("A1").unwrap().x - 19.0).abs() < f64::EPSILON);
        assert!(plan.can_redo());
        assert!(plan.redo());
        assert!((plan.position("A1").unwrap().rotation - 30.0).abs() < f64::EPSILON);
        assert!(!plan.redo());
    }

    #[test]
    fn test_from_document_repairs_geometry() {
        let doc = LayoutDocument {
            booth_positions: vec![
                BoothPosition::new("A1", NormalizedRect::new(10.0, 10.0, -4.0, 0.0)),
                BoothPosition::new("A2", NormalizedRect::new(98.0, 50.0, 5.0, 5.0))
                    .with_rotation(f64::NAN),
            ],
            ..LayoutDocument::default()
        };
        let plan = FloorPlan::from_document("1", doc, MIN_BOOTH_SIZE);

        let a1 = plan.position("A1").unwrap();
        assert!((a1.width - MIN_BOOTH_SIZE).abs() < f64::EPSILON);
        assert!((a1.height - MIN_BOOTH_SIZE).abs() < f64::EPSILON);
        let a2 = plan.position("A2").unwrap();
        assert!((a2.x - 95.0).abs() < f64::EPSILON);
        assert!(a2.rotation.abs() < f64::EPSILON);
        // No booths stored: defaults are used
        assert_eq!(plan.len(), 15);
    }

    #[test]
    fn test_from_document_drops_positions_without_booths() {
        let doc = LayoutDocument {
            booth_positions: vec![
                BoothPosition::new("A1", NormalizedRect::new(10.0, 10.0, 5.0, 5.0)),
                BoothPosition::new("A2", NormalizedRect::new(20.0, 10.0, 5.0, 5.0)),
                BoothPosition::new("Z9", NormalizedRect::new(30.0, 10.0, 5.0, 5.0)),
            ],
            booths: vec![Booth::available("A1"), Booth::available("A2")],
            deleted_booth_ids: vec!["A2".into()],
            ..LayoutDocument::default()
        };
        let plan = FloorPlan::from_document("1", doc, MIN_BOOTH_SIZE);

        assert!(plan.position("A1").is_some());
        assert!(plan.position("A2").is_none());
        assert!(plan.position("Z9").is_none());
        assert_eq!(plan.positions().count(), 1);
        assert_eq!(plan.to_document().booth_positions.len(), 1);
    }

    #[test]
    fn test_set_geometry_rejects_non_finite() {
        let mut plan = FloorPlan::with_default_layout("1");
        let before = plan.position("A1").unwrap().clone();

        assert!(!plan.set_geometry("A1", NormalizedRect::new(f64::NAN, 10.0, 5.0, 5.0), 0.0));
        assert!(!plan.set_geometry("A1", NormalizedRect::new(10.0, 10.0, f64::INFINITY, 5.0), 0.0));
        assert!(!plan.set_geometry("A1", NormalizedRect::new(10.0, 10.0, 5.0, 5.0), f64::NAN));
        assert_eq!(plan.position("A1").unwrap(), &before);

        plan.add_booth(
            Booth::available("X"),
            BoothPosition::new("X", NormalizedRect::new(f64::NAN, 5.0, 2.0, 2.0)).with_rotation(f64::INFINITY),
        );
        let x = plan.position("X").unwrap();
        assert_eq!(x.rect(), NormalizedRect::new(0.0, 5.0, 2.0, 2.0));
        assert!(x.rotation.abs() < f64::EPSILON);

        let json = plan.to_document().to_json().unwrap();
        let reloaded = LayoutDocument::from_json(&json).unwrap();
        assert_eq!(reloaded.booth_positions.len(), 16);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let storage = MemoryStorage::new();
        let mut plan = FloorPlan::with_default_layout("7");
        plan.set_geometry("B1", NormalizedRect::new(10.0, 70.0, 6.0, 8.0), 15.0);
        plan.remove_booth("A12");
        plan.save(&storage, "booth_app_7").unwrap();

        let loaded = FloorPlan::load_or_default(&storage, "booth_app_7", "7", MIN_BOOTH_SIZE);
        let b1 = loaded.position("B1").unwrap();
        assert_eq!(b1.rect(), NormalizedRect::new(10.0, 70.0, 6.0, 8.0));
        assert!((b1.rotation - 15.0).abs() < f64::EPSILON);
        assert!(!loaded.contains_booth("A12"));
        assert!(storage.load("booth_app_7").unwrap().saved_at.is_some());
    }

    #[test]
    fn test_load_missing_falls_back_to_default() {
        let storage = MemoryStorage::new();
        let plan = FloorPlan::load_or_default(&storage, "nope", "3", MIN_BOOTH_SIZE);
        assert_eq!(plan.event_id, "3");
        assert_eq!(plan.positions().count(), 15);
    }
}
