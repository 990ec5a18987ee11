//! In-process backend. Documents are cloned in and out, so callers never
//! observe each other's uncommitted mutations.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use accounts_domain::ResourceDocument;

use crate::error::StorageError;
use crate::traits::ResourceStore;

type Collection = HashMap<String, ResourceDocument>;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, HashMap::len)
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn insert(&self, collection: &str, document: ResourceDocument) -> Result<(), StorageError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&document.id) {
            return Err(StorageError::DuplicateKey {
                collection: collection.to_string(),
                id: document.id,
            });
        }
        tracing::trace!(collection, id = %document.id, "insert");
        docs.insert(document.id.clone(), document);
        Ok(())
    }

    async fn save(&self, collection: &str, document: ResourceDocument) -> Result<(), StorageError> {
        let mut collections = self.collections.write().await;
        tracing::trace!(collection, id = %document.id, "save");
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(document.id.clone(), document);
        Ok(())
    }

    async fn find(&self, collection: &str, id: &str) -> Result<Option<ResourceDocument>, StorageError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StorageError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .is_some_and(|docs| docs.contains_key(id)))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StorageError> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some();
        tracing::trace!(collection, id, removed, "delete");
        Ok(removed)
    }
}
