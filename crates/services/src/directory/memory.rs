use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::{Directory, DirectoryError};

/// Documents held in process memory, keyed by `(collection, id)`.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    documents: DashMap<(String, String), Value>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON file shaped as `{collection: {id: document}}`.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::Seed(format!("{}: {e}", path.display())))?;
        let seed: HashMap<String, HashMap<String, Value>> = serde_json::from_str(&raw)
            .map_err(|e| DirectoryError::Seed(format!("{}: {e}", path.display())))?;

        let directory = Self::new();
        for (collection, documents) in seed {
            for (id, document) in documents {
                directory.insert_json(&collection, &id, document);
            }
        }
        info!(path = %path.display(), documents = directory.len(), "Loaded directory seed");
        Ok(directory)
    }

    pub fn insert_json(&self, collection: &str, id: &str, document: Value) {
        self.documents
            .insert((collection.to_string(), id.to_string()), document);
    }

    pub fn insert<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        document: &T,
    ) -> Result<(), serde_json::Error> {
        self.insert_json(collection, id, serde_json::to_value(document)?);
        Ok(())
    }

    pub fn remove(&self, collection: &str, id: &str) -> Option<Value> {
        self.documents
            .remove(&(collection.to_string(), id.to_string()))
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DirectoryError> {
        Ok(self
            .documents
            .get(&(collection.to_string(), id.to_string()))
            .map(|entry| entry.value().clone()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
