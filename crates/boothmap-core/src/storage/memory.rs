//! In-memory storage implementation.

use super::{LayoutDocument, Storage, StorageError, StorageResult};
use crate::event::EventCatalog;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    layouts: RwLock<HashMap<String, LayoutDocument>>,
    catalogs: RwLock<HashMap<String, EventCatalog>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, document: &LayoutDocument) -> StorageResult<()> {
        let mut layouts = self.layouts.write().map_err(lock_error)?;
        layouts.insert(key.to_string(), document.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> StorageResult<LayoutDocument> {
        let layouts = self.layouts.read().map_err(lock_error)?;
        layouts
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut layouts = self.layouts.write().map_err(lock_error)?;
        layouts.remove(key);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let layouts = self.layouts.read().map_err(lock_error)?;
        Ok(layouts.keys().cloned().collect())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let layouts = self.layouts.read().map_err(lock_error)?;
        Ok(layouts.contains_key(key))
    }

    fn save_events(&self, key: &str, catalog: &EventCatalog) -> StorageResult<()> {
        let mut catalogs = self.catalogs.write().map_err(lock_error)?;
        catalogs.insert(key.to_string(), catalog.clone());
        Ok(())
    }

    fn load_events(&self, key: &str) -> StorageResult<EventCatalog> {
        let catalogs = self.catalogs.read().map_err(lock_error)?;
        catalogs
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_sheet(url: &str) -> LayoutDocument {
        LayoutDocument {
            sheet_url: url.to_string(),
            ..LayoutDocument::default()
        }
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let doc = doc_with_sheet("https://sheets.example/1");

        storage.save("test", &doc).unwrap();
        let loaded = storage.load("test").unwrap();

        assert_eq!(doc, loaded);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = storage.load("nonexistent");

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let doc = LayoutDocument::default();

        assert!(!storage.exists("test").unwrap());
        storage.save("test", &doc).unwrap();
        assert!(storage.exists("test").unwrap());
        storage.delete("test").unwrap();
        assert!(!storage.exists("test").unwrap());
    }

    #[test]
    fn test_events_do_not_collide_with_layouts() {
        let storage = MemoryStorage::new();
        storage.save("booth_app_events", &doc_with_sheet("layout")).unwrap();
        assert!(matches!(storage.load_events("booth_app_events"), Err(StorageError::NotFound(_))));

        storage.save_events("booth_app_events", &EventCatalog::empty()).unwrap();
        assert!(storage.load_events("booth_app_events").unwrap().is_empty());
        assert_eq!(storage.load("booth_app_events").unwrap().sheet_url, "layout");
        assert_eq!(storage.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();
        let doc = LayoutDocument::default();

        storage.save("layout1", &doc).unwrap();
        storage.save("layout2", &doc).unwrap();

        let list = storage.list().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains(&"layout1".to_string()));
        assert!(list.contains(&"layout2".to_string()));
    }
}
