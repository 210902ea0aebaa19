//! Exhibition events and the per-user event catalog.
//!
//! Every event owns one floor plan, stored under [`crate::storage::layout_key`]
//! with the event's id. The catalog itself is persisted separately under
//! [`crate::storage::events_key`].

use crate::storage::{Storage, StorageError, StorageResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name given to an event created without one.
pub const DEFAULT_EVENT_NAME: &str = "Новое мероприятие";

/// Venue map shipped with the sample events.
pub const DEFAULT_MAP_URL: &str =
    "https://cdn.poehali.dev/files/84989299-cef8-4fc0-a2cd-b8106a39b96d.png";

/// Event catalog errors.
#[derive(Debug, Error, PartialEq)]
pub enum EventError {
    #[error("unknown event `{0}`")]
    NotFound(String),
    #[error("event name must not be blank")]
    BlankName,
}

/// An exhibition event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Free-form date text, e.g. `15-20 марта 2025`.
    pub date: String,
    pub location: String,
    /// Image drawn under the booths.
    pub map_url: String,
    /// Spreadsheet the booth list is synchronized from; empty when none.
    pub sheet_id: String,
}

/// Field changes for creating or editing an event. `None` keeps the current
/// value on edit and takes the default on create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub map_url: Option<String>,
    pub sheet_id: Option<String>,
}

impl EventChanges {
    fn apply(self, event: &mut Event) -> Result<(), EventError> {
        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(EventError::BlankName);
            }
            event.name = name.to_string();
        }
        let fields = [
            (self.description, &mut event.description),
            (self.date, &mut event.date),
            (self.location, &mut event.location),
            (self.map_url, &mut event.map_url),
            (self.sheet_id, &mut event.sheet_id),
        ];
        for (change, field) in fields {
            if let Some(value) = change {
                *field = value;
            }
        }
        Ok(())
    }
}

/// The events a fresh catalog starts with.
pub fn default_events() -> Vec<Event> {
    [
        ("1", "Выставка 2025", "15-20 марта 2025", "Павильон 1"),
        ("2", "Tech Forum 2025", "5-10 апреля 2025", "Павильон 2"),
    ]
    .into_iter()
    .map(|(id, name, date, location)| Event {
        id: id.to_string(),
        name: name.to_string(),
        date: date.to_string(),
        location: location.to_string(),
        map_url: DEFAULT_MAP_URL.to_string(),
        ..Event::default()
    })
    .collect()
}

/// The events visible to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self {
            events: default_events(),
        }
    }
}

impl EventCatalog {
    /// A catalog with no events.
    pub fn empty() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Id for the next event: one past the highest numeric id.
    fn next_id(&self) -> String {
        let max = self.events.iter().filter_map(|e| e.id.parse::<u64>().ok()).max().unwrap_or(0);
        (u128::from(max) + 1).to_string()
    }

    /// Add an event and return it.
    pub fn create(&mut self, changes: EventChanges) -> Result<&Event, EventError> {
        let mut event = Event {
            id: self.next_id(),
            name: DEFAULT_EVENT_NAME.to_string(),
            map_url: DEFAULT_MAP_URL.to_string(),
            ..Event::default()
        };
        changes.apply(&mut event)?;
        log::info!("Created event {} ({})", event.id, event.name);
        let index = self.events.len();
        self.events.push(event);
        Ok(&self.events[index])
    }

    /// Change the fields of an existing event. Nothing changes on error.
    pub fn edit(&mut self, id: &str, changes: EventChanges) -> Result<&Event, EventError> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;
        let mut edited = event.clone();
        changes.apply(&mut edited)?;
        *event = edited;
        log::info!("Edited event {}", id);
        Ok(&*event)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the catalog stored under `key`, or the default events when none
    /// is stored or it cannot be read.
    pub fn load_or_default(storage: &dyn Storage, key: &str) -> Self {
        match storage.load_events(key) {
            Ok(catalog) => catalog,
            Err(StorageError::NotFound(_)) => {
                log::info!("No stored events {}, using default events", key);
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load events {}: {}; using default events", key, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &dyn Storage, key: &str) -> StorageResult<()> {
        storage.save_events(key, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn named(name: &str) -> EventChanges {
        EventChanges {
            name: Some(name.to_string()),
            ..EventChanges::default()
        }
    }

    #[test]
    fn test_default_catalog() {
        let catalog = EventCatalog::default();
        assert_eq!(catalog.len(), 2);
        let first = catalog.get("1").unwrap();
        assert_eq!(first.name, "Выставка 2025");
        assert_eq!(first.location, "Павильон 1");
        assert_eq!(first.map_url, DEFAULT_MAP_URL);
        assert!(first.sheet_id.is_empty());
        assert!(catalog.get("3").is_none());
    }

    #[test]
    fn test_create_assigns_next_id() {
        let mut catalog = EventCatalog::default();
        let event = catalog
            .create(EventChanges {
                date: Some("1-3 июня 2025".into()),
                ..EventChanges::default()
            })
            .unwrap();
        assert_eq!(event.id, "3");
        assert_eq!(event.name, DEFAULT_EVENT_NAME);
        assert_eq!(event.date, "1-3 июня 2025");

        let event = catalog.create(named("  Food Expo ")).unwrap();
        assert_eq!((event.id.as_str(), event.name.as_str()), ("4", "Food Expo"));

        let mut empty = EventCatalog::empty();
        assert_eq!(empty.create(EventChanges::default()).unwrap().id, "1");
    }

    #[test]
    fn test_edit_changes_only_given_fields() {
        let mut catalog = EventCatalog::default();
        let event = catalog
            .edit(
                "2",
                EventChanges {
                    location: Some("Павильон 3".into()),
                    sheet_id: Some("sheet-42".into()),
                    ..EventChanges::default()
                },
            )
            .unwrap();
        assert_eq!(event.name, "Tech Forum 2025");
        assert_eq!(event.location, "Павильон 3");
        assert_eq!(event.sheet_id, "sheet-42");

        assert_eq!(catalog.edit("9", named("x")), Err(EventError::NotFound("9".into())));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut catalog = EventCatalog::default();
        assert_eq!(catalog.create(named("   ")), Err(EventError::BlankName));
        assert_eq!(catalog.len(), 2);

        let changes = EventChanges {
            name: Some(String::new()),
            location: Some("elsewhere".into()),
            ..EventChanges::default()
        };
        assert_eq!(catalog.edit("1", changes), Err(EventError::BlankName));
        assert_eq!(catalog.get("1").unwrap().location, "Павильон 1");
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        assert_eq!(EventCatalog::load_or_default(&storage, "booth_app_events"), EventCatalog::default());

        let mut catalog = EventCatalog::default();
        catalog.create(named("Food Expo")).unwrap();
        catalog.save(&storage, "booth_app_events").unwrap();

        let loaded = EventCatalog::load_or_default(&storage, "booth_app_events");
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.get("3").unwrap().name, "Food Expo");
    }

    #[test]
    fn test_catalog_json_is_camel_case() {
        let json = EventCatalog::default().to_json().unwrap();
        assert!(json.contains("\"mapUrl\""));
        assert!(json.contains("\"sheetId\""));

        let catalog = EventCatalog::from_json(r#"{"events":[{"id":"7","name":"Solo"}]}"#).unwrap();
        assert_eq!(catalog.get("7").unwrap().name, "Solo");
        assert!(catalog.get("7").unwrap().map_url.is_empty());
    }
}
