//! Local event persistence.
//!
//! The store mirrors the mobile shell's key-value storage: a single
//! namespace key holds the entire event list as one serialized document.
//! Every operation reads the whole list, mutates it, and writes it back.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Event;

/// The one namespace key (file stem) holding the serialized event list.
const EVENTS_KEY: &str = "events";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt event store: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Event not found: {0}")]
    NotFound(String),
}

/// JSON-file-backed event store.
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    /// Open the store rooted at the given directory, creating the
    /// directory on demand. The backing file is created lazily on the
    /// first write.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(Self {
            path: dir.join(format!("{}.json", EVENTS_KEY)),
        })
    }

    /// All stored events, in insertion order. A missing or empty file is
    /// an empty list, not an error.
    pub fn list(&self) -> Result<Vec<Event>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn get(&self, id: &str) -> Result<Option<Event>, StoreError> {
        Ok(self.list()?.into_iter().find(|e| e.id == id))
    }

    pub fn insert(&self, event: &Event) -> Result<(), StoreError> {
        let mut events = self.list()?;
        events.push(event.clone());
        self.write(&events)
    }

    /// Replace the stored event with the same id.
    pub fn update(&self, event: &Event) -> Result<(), StoreError> {
        let mut events = self.list()?;
        let slot = events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| StoreError::NotFound(event.id.clone()))?;
        *slot = event.clone();
        self.write(&events)
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut events = self.list()?;
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.write(&events)
    }

    fn write(&self, events: &[Event]) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(events)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventDraft;

    fn store() -> (tempfile::TempDir, EventStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn sample_event(title: &str) -> Event {
        Event::from_draft(EventDraft {
            title: Some(title.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let (_dir, store) = store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_get_roundtrip() {
        let (_dir, store) = store();
        let event = sample_event("Picnic");
        store.insert(&event).unwrap();

        let loaded = store.get(&event.id).unwrap().unwrap();
        assert_eq!(loaded, event);
        assert!(loaded.plan.is_none());
    }

    #[test]
    fn test_update_replaces_matching_event() {
        let (_dir, store) = store();
        let mut event = sample_event("Picnic");
        store.insert(&event).unwrap();
        store.insert(&sample_event("Other")).unwrap();

        event.plan = Some("# Event Plan\n\nSandwiches in the park".to_string());
        event.touch();
        store.update(&event).unwrap();

        let loaded = store.get(&event.id).unwrap().unwrap();
        assert_eq!(
            loaded.plan.as_deref(),
            Some("# Event Plan\n\nSandwiches in the park")
        );
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let (_dir, store) = store();
        let event = sample_event("Ghost");
        let err = store.update(&event).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_delete_removes_only_the_target() {
        let (_dir, store) = store();
        let keep = sample_event("Keep");
        let drop = sample_event("Drop");
        store.insert(&keep).unwrap();
        store.insert(&drop).unwrap();

        store.delete(&drop.id).unwrap();
        let remaining = store.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);

        assert!(matches!(
            store.delete(&drop.id).unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let event = sample_event("Persistent");
        {
            let store = EventStore::open(dir.path()).unwrap();
            store.insert(&event).unwrap();
        }
        let store = EventStore::open(dir.path()).unwrap();
        assert_eq!(store.list().unwrap(), vec![event]);
    }
}
