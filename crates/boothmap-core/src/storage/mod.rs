//! Storage abstraction for persisting floor plans.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::booth::{Booth, BoothPosition};
use crate::event::EventCatalog;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix shared by every layout key.
pub const STORAGE_PREFIX: &str = "booth_app_";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// The persisted form of one event's floor plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutDocument {
    pub booth_positions: Vec<BoothPosition>,
    pub booths: Vec<Booth>,
    /// Spreadsheet the booth list is synchronized from, if any.
    pub sheet_url: String,
    /// Booths the user deleted; a later sync must not bring them back.
    pub deleted_booth_ids: Vec<String>,
    /// Seconds since the Unix epoch at the last save.
    pub saved_at: Option<u64>,
}

impl LayoutDocument {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Build the storage key for an event, scoped to a user when one is signed in.
///
/// The email is lowercased and every character outside `[a-z0-9]` becomes `_`.
pub fn layout_key(user_email: Option<&str>, event_id: &str) -> String {
    match user_email {
        Some(email) => {
            let user: String = email
                .to_lowercase()
                .chars()
                .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
                .collect();
            format!("{STORAGE_PREFIX}{user}_{event_id}")
        }
        None => format!("{STORAGE_PREFIX}{event_id}"),
    }
}

/// Storage key of a user's event catalog.
pub fn events_key(user_email: Option<&str>) -> String {
    layout_key(user_email, "events")
}

/// Trait for layout storage backends.
///
/// Implementations can store layouts in memory or on the filesystem.
/// Event catalogs live in their own namespace, so a catalog key never
/// collides with a layout key.
pub trait Storage: Send + Sync {
    /// Save a layout.
    fn save(&self, key: &str, document: &LayoutDocument) -> StorageResult<()>;

    /// Load a layout.
    fn load(&self, key: &str) -> StorageResult<LayoutDocument>;

    /// Delete a layout.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// List all layout keys.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a layout exists.
    fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Save an event catalog.
    fn save_events(&self, key: &str, catalog: &EventCatalog) -> StorageResult<()>;

    /// Load an event catalog.
    fn load_events(&self, key: &str) -> StorageResult<EventCatalog>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_key_sanitizes_email() {
        assert_eq!(
            layout_key(Some("Jane.Doe+expo@Example.com"), "7"),
            "booth_app_jane_doe_expo_example_com_7"
        );
        assert_eq!(layout_key(None, "7"), "booth_app_7");
        assert_eq!(events_key(Some("Jane@Example.com")), "booth_app_jane_example_com_events");
        assert_eq!(events_key(None), "booth_app_events");
    }

    #[test]
    fn test_document_tolerates_missing_fields() {
        let doc = LayoutDocument::from_json(
            r#"{"boothPositions":[{"id":"A1","x":1,"y":2,"width":3,"height":4}]}"#,
        )
        .unwrap();
        assert_eq!(doc.booth_positions.len(), 1);
        assert!(doc.booths.is_empty());
        assert!(doc.deleted_booth_ids.is_empty());
        assert_eq!(doc.saved_at, None);
    }
}
