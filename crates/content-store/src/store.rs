//! Persistence port for event trees, plus the in-process implementation.
//!
//! The backend persists one whole event tree per upsert; choices and
//! consequences have no endpoints of their own. A `{success: false,
//! message}` answer from the backend surfaces as [`StoreError::Rejected`].

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use content_core::{EventId, GameEvent, IndustryId};

/// Failures surfaced by the persistence adapter.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    /// The backend answered but refused the write.
    #[error("backend rejected the write: {0}")]
    Rejected(String),
    /// Transport or storage failure; the operation name aids tracing.
    #[error("backend error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }
}

/// Fetch/upsert/delete triplet for events, keyed by industry. The same
/// contract is served by the backend for every other entity family.
pub trait EventStore {
    fn fetch_events(&self, industry: &IndustryId) -> Result<Vec<GameEvent>, StoreError>;
    /// Upsert the whole event tree as one atomic write.
    fn upsert_event(&mut self, industry: &IndustryId, event: &GameEvent) -> Result<(), StoreError>;
    /// Delete the whole tree; choices and consequences cascade with it.
    fn delete_event(&mut self, id: &EventId) -> Result<(), StoreError>;
}

/// In-process store backing tests and the CLI. Can be armed to reject the
/// next write, which is how the rollback path gets exercised.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    industries: HashMap<String, Vec<GameEvent>>,
    #[serde(skip)]
    fail_next_write: Option<String>,
    #[serde(skip)]
    write_ops: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next upsert or delete fail with `message`.
    pub fn fail_next_write(&mut self, message: impl Into<String>) {
        self.fail_next_write = Some(message.into());
    }

    /// Number of write operations attempted so far (including rejected ones).
    pub fn write_ops(&self) -> usize {
        self.write_ops
    }

    /// Read a store snapshot from a JSON file; a missing file is an empty
    /// store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| StoreError::backend("load", e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| StoreError::backend("load", e.to_string()))
    }

    /// Write the store snapshot back to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::backend("save", e.to_string()))?;
        std::fs::write(path, text).map_err(|e| StoreError::backend("save", e.to_string()))
    }

    fn take_failure(&mut self) -> Result<(), StoreError> {
        self.write_ops += 1;
        match self.fail_next_write.take() {
            Some(message) => Err(StoreError::Rejected(message)),
            None => Ok(()),
        }
    }
}

impl EventStore for MemoryStore {
    fn fetch_events(&self, industry: &IndustryId) -> Result<Vec<GameEvent>, StoreError> {
        Ok(self.industries.get(&industry.0).cloned().unwrap_or_default())
    }

    fn upsert_event(&mut self, industry: &IndustryId, event: &GameEvent) -> Result<(), StoreError> {
        self.take_failure()?;
        let events = self.industries.entry(industry.0.clone()).or_default();
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = event.clone(),
            None => events.push(event.clone()),
        }
        info!(industry = %industry, event = %event.id, "event upserted");
        Ok(())
    }

    fn delete_event(&mut self, id: &EventId) -> Result<(), StoreError> {
        self.take_failure()?;
        for events in self.industries.values_mut() {
            if let Some(pos) = events.iter().position(|e| e.id == id.0) {
                events.remove(pos);
                info!(event = %id, "event deleted");
                return Ok(());
            }
        }
        Err(StoreError::not_found("event", id.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_core::{EventCategory, GameEvent};

    fn event(id: &str) -> GameEvent {
        GameEvent {
            id: id.to_string(),
            title: "T".to_string(),
            category: EventCategory::Opportunity,
            summary: "S".to_string(),
            requirements: vec![],
            choices: vec![],
        }
    }

    fn industry() -> IndustryId {
        IndustryId("coffee".to_string())
    }

    #[test]
    fn upsert_inserts_then_replaces() {
        let mut store = MemoryStore::new();
        store.upsert_event(&industry(), &event("e1")).unwrap();
        let mut updated = event("e1");
        updated.title = "New title".to_string();
        store.upsert_event(&industry(), &updated).unwrap();
        let events = store.fetch_events(&industry()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "New title");
    }

    #[test]
    fn delete_removes_and_reports_missing() {
        let mut store = MemoryStore::new();
        store.upsert_event(&industry(), &event("e1")).unwrap();
        store.delete_event(&EventId("e1".to_string())).unwrap();
        assert!(store.fetch_events(&industry()).unwrap().is_empty());
        assert_eq!(
            store.delete_event(&EventId("e1".to_string())),
            Err(StoreError::not_found("event", "e1"))
        );
    }

    #[test]
    fn armed_failure_rejects_one_write() {
        let mut store = MemoryStore::new();
        store.fail_next_write("maintenance window");
        assert_eq!(
            store.upsert_event(&industry(), &event("e1")),
            Err(StoreError::Rejected("maintenance window".to_string()))
        );
        store.upsert_event(&industry(), &event("e1")).unwrap();
        assert_eq!(store.write_ops(), 2);
    }

    #[test]
    fn snapshot_roundtrip_via_file() {
        let mut store = MemoryStore::new();
        store.upsert_event(&industry(), &event("e1")).unwrap();
        let dir = std::env::temp_dir().join("content-store-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snapshot.json");
        store.save(&path).unwrap();
        let loaded = MemoryStore::load(&path).unwrap();
        assert_eq!(loaded.fetch_events(&industry()).unwrap().len(), 1);
        std::fs::remove_file(&path).ok();
    }
}
