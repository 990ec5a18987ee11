use async_trait::async_trait;

use accounts_domain::ResourceDocument;

use crate::error::StorageError;

/// Storage for resource documents, one keyed collection per resource family.
///
/// Keys are the derived (or random) resource ids. The only concurrency
/// control a backend must provide is key uniqueness on `insert`; everything
/// else is last-writer-wins.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` to be used in axum
/// application state and across async task boundaries.
#[async_trait]
pub trait ResourceStore: Send + Sync + 'static {
    /// Insert a new document.
    ///
    /// Returns `Err(StorageError::DuplicateKey)` if the collection already
    /// holds a document with the same id.
    async fn insert(&self, collection: &str, document: ResourceDocument) -> Result<(), StorageError>;

    /// Insert or replace a document.
    async fn save(&self, collection: &str, document: ResourceDocument) -> Result<(), StorageError>;

    /// Look up a document by id. Absence is `Ok(None)`.
    async fn find(&self, collection: &str, id: &str) -> Result<Option<ResourceDocument>, StorageError>;

    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StorageError>;

    /// Remove a document. Returns whether anything was removed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StorageError>;
}
