//! Record storage backing the resource servers.

use crate::error::McpError;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A stored record: a flat JSON object.
pub type Record = Map<String, Value>;

/// Storage for the records a resource server exposes.
///
/// Injected into each server so tests and deployments can supply their own.
pub trait RecordStore: Send + Sync {
    /// All records of `collection`, ordered by id.
    fn list(&self, collection: &str) -> Vec<Record>;

    fn get(&self, collection: &str, id: &str) -> Option<Record>;

    /// Insert a new record. Fails if `id` is already taken.
    fn insert(&self, collection: &str, id: &str, record: Record) -> Result<(), McpError>;

    /// Merge `patch` into an existing record and return the result.
    fn update(&self, collection: &str, id: &str, patch: Record) -> Option<Record>;

    fn count(&self, collection: &str) -> usize {
        self.list(collection).len()
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<BTreeMap<String, BTreeMap<String, Record>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryStore {
    fn list(&self, collection: &str) -> Vec<Record> {
        self.collections
            .read()
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    fn get(&self, collection: &str, id: &str) -> Option<Record> {
        self.collections
            .read()
            .get(collection)
            .and_then(|records| records.get(id))
            .cloned()
    }

    fn insert(&self, collection: &str, id: &str, record: Record) -> Result<(), McpError> {
        let mut collections = self.collections.write();
        let records = collections.entry(collection.to_string()).or_default();
        if records.contains_key(id) {
            return Err(McpError::Conflict {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        records.insert(id.to_string(), record);
        Ok(())
    }

    fn update(&self, collection: &str, id: &str, patch: Record) -> Option<Record> {
        let mut collections = self.collections.write();
        let record = collections.get_mut(collection)?.get_mut(id)?;
        record.extend(patch);
        Some(record.clone())
    }

    fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}
