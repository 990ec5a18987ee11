use accounts_storage::StorageError;

use crate::clients::ClientError;

/// Data-access failures. Business outcomes (not found, duplicate, invalid)
/// are [`Outcome`](crate::Outcome) values, never errors.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A link was to be written on a parent that does not exist.
    #[error("parent {parent} not found: {id}")]
    ParentNotFound { parent: &'static str, id: String },

    /// An outbound service call failed.
    #[error("{service} call failed: {message}")]
    Upstream { service: &'static str, message: String },

    /// A stored document no longer decodes into its resource type.
    #[error("corrupt document {collection}/{id}: {message}")]
    CorruptDocument {
        collection: &'static str,
        id: String,
        message: String,
    },
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        ServiceError::Upstream {
            service: err.service(),
            message: err.to_string(),
        }
    }
}

impl ServiceError {
    pub(crate) fn corrupt(collection: &'static str, id: &str, err: serde_json::Error) -> Self {
        ServiceError::CorruptDocument {
            collection,
            id: id.to_string(),
            message: err.to_string(),
        }
    }
}
