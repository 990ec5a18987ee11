/// All errors that can be returned by a ResourceStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Insert of a key that already exists in the collection.
    #[error("duplicate key {id} in collection {collection}")]
    DuplicateKey { collection: String, id: String },

    /// A stored document could not be encoded or decoded.
    #[error("serialization error in collection {collection}: {message}")]
    Serialization { collection: String, message: String },

    /// A backend-specific storage error (connection, timeout, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StorageError::DuplicateKey { .. })
    }
}
