//! Parent link propagation.
//!
//! When a child is created or deleted its parent's link map is updated in a
//! separate read-modify-write. The two writes are not atomic; a crash or a
//! concurrent writer can leave a stale or missing link, which closure
//! validation reports before the transaction is allowed to close.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use accounts_domain::{IdentityDeriver, ParentKind, ResourceDocument};

use crate::error::ServiceError;
use crate::SharedStore;

#[async_trait]
pub trait Linkable: Send + Sync {
    /// Point `link` on the parent at `url`.
    async fn add_link(
        &self,
        parent: ParentKind,
        company_account_id: &str,
        link: &str,
        url: &str,
    ) -> Result<(), ServiceError>;

    async fn remove_link(
        &self,
        parent: ParentKind,
        company_account_id: &str,
        link: &str,
    ) -> Result<(), ServiceError>;

    /// Record a collection member: sets the collection link and adds
    /// `member_id: member_url` to the parent's member map under the same name.
    async fn add_member(
        &self,
        parent: ParentKind,
        company_account_id: &str,
        collection: &str,
        collection_url: &str,
        member_id: &str,
        member_url: &str,
    ) -> Result<(), ServiceError>;

    /// Drop a collection member; the collection link goes with the last one.
    async fn remove_member(
        &self,
        parent: ParentKind,
        company_account_id: &str,
        collection: &str,
        member_id: &str,
    ) -> Result<(), ServiceError>;
}

/// Store-backed [`Linkable`].
pub struct LinkRegistry {
    store: SharedStore,
    ids: IdentityDeriver,
}

impl LinkRegistry {
    pub fn new(store: SharedStore) -> Self {
        LinkRegistry {
            store,
            ids: IdentityDeriver::new(),
        }
    }

    async fn load(&self, parent: ParentKind, company_account_id: &str) -> Result<ResourceDocument, ServiceError> {
        let id = parent.document_id(&self.ids, company_account_id);
        let found = self.store.find(parent.collection(), &id).await?;
        found.ok_or(ServiceError::ParentNotFound {
            parent: parent.json_name(),
            id,
        })
    }

    async fn store(&self, parent: ParentKind, mut document: ResourceDocument) -> Result<(), ServiceError> {
        document.data.touch();
        self.store.save(parent.collection(), document).await?;
        Ok(())
    }
}

#[async_trait]
impl Linkable for LinkRegistry {
    async fn add_link(
        &self,
        parent: ParentKind,
        company_account_id: &str,
        link: &str,
        url: &str,
    ) -> Result<(), ServiceError> {
        let mut document = self.load(parent, company_account_id).await?;
        document.links_mut().insert(link, url);
        debug!(parent = parent.json_name(), link, "link added");
        self.store(parent, document).await
    }

    async fn remove_link(
        &self,
        parent: ParentKind,
        company_account_id: &str,
        link: &str,
    ) -> Result<(), ServiceError> {
        let mut document = self.load(parent, company_account_id).await?;
        document.links_mut().remove(link);
        debug!(parent = parent.json_name(), link, "link removed");
        self.store(parent, document).await
    }

    async fn add_member(
        &self,
        parent: ParentKind,
        company_account_id: &str,
        collection: &str,
        collection_url: &str,
        member_id: &str,
        member_url: &str,
    ) -> Result<(), ServiceError> {
        let mut document = self.load(parent, company_account_id).await?;
        document.links_mut().insert(collection, collection_url);
        let members = document
            .data
            .fields
            .entry(collection.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !members.is_object() {
            *members = Value::Object(Map::new());
        }
        if let Value::Object(map) = members {
            map.insert(member_id.to_string(), Value::String(member_url.to_string()));
        }
        debug!(parent = parent.json_name(), collection, member_id, "member added");
        self.store(parent, document).await
    }

    async fn remove_member(
        &self,
        parent: ParentKind,
        company_account_id: &str,
        collection: &str,
        member_id: &str,
    ) -> Result<(), ServiceError> {
        let mut document = self.load(parent, company_account_id).await?;
        let now_empty = match document.data.fields.get_mut(collection) {
            Some(Value::Object(map)) => {
                map.remove(member_id);
                map.is_empty()
            }
            _ => true,
        };
        if now_empty {
            document.data.fields.remove(collection);
            document.links_mut().remove(collection);
        }
        debug!(parent = parent.json_name(), collection, member_id, now_empty, "member removed");
        self.store(parent, document).await
    }
}

/// Ids listed in a parent's member map, in key order.
pub(crate) fn member_ids(parent: &ResourceDocument, collection: &str) -> Vec<String> {
    match parent.data.fields.get(collection) {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}
