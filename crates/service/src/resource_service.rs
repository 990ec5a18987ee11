use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use accounts_domain::{
    catalogue, DocumentData, IdentityDeriver, Links, ResourceDescriptor, ResourceDocument,
    Validatable,
};

use crate::context::RequestContext;
use crate::error::ServiceError;
use crate::links::Linkable;
use crate::outcome::Outcome;
use crate::SharedStore;

/// Lifecycle of a singleton resource: at most one per company account,
/// keyed by `derive(company_account_id, descriptor.name)`.
pub struct ResourceService<T> {
    descriptor: &'static ResourceDescriptor,
    store: SharedStore,
    links: Arc<dyn Linkable>,
    ids: IdentityDeriver,
    _body: PhantomData<fn() -> T>,
}

impl<T> ResourceService<T>
where
    T: Validatable + Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(descriptor: &'static ResourceDescriptor, store: SharedStore, links: Arc<dyn Linkable>) -> Self {
        ResourceService {
            descriptor,
            store,
            links,
            ids: IdentityDeriver::new(),
            _body: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    pub fn resource_id(&self, company_account_id: &str) -> String {
        self.ids.derive(company_account_id, self.descriptor.name)
    }

    pub async fn create(
        &self,
        body: &T,
        company_account_id: &str,
        ctx: &RequestContext,
    ) -> Result<Outcome<ResourceDocument>, ServiceError> {
        let errors = body.validate(&self.descriptor.json_root());
        if errors.has_errors() {
            debug!(kind = self.descriptor.kind, request_id = %ctx.request_id, errors = errors.len(), "create rejected");
            return Ok(Outcome::ValidationFailed(errors));
        }

        let self_link = self.descriptor.uri(ctx.transaction_id(), company_account_id);
        let data = DocumentData::stamp(body, Links::with_self(&self_link), self.descriptor.kind)
            .map_err(|e| ServiceError::corrupt(self.descriptor.collection, company_account_id, e))?;
        let document = ResourceDocument::new(self.resource_id(company_account_id), data);

        match self.store.insert(self.descriptor.collection, document.clone()).await {
            Ok(()) => {}
            Err(e) if e.is_duplicate_key() => {
                debug!(kind = self.descriptor.kind, company_account_id, "duplicate create");
                return Ok(Outcome::DuplicateKey);
            }
            Err(e) => return Err(e.into()),
        }

        self.links
            .add_link(
                self.descriptor.parent,
                company_account_id,
                self.descriptor.link_name,
                &self_link,
            )
            .await?;

        info!(
            kind = self.descriptor.kind,
            company_account_id,
            transaction_id = ctx.transaction_id(),
            request_id = %ctx.request_id,
            "resource created"
        );
        Ok(Outcome::Created(document))
    }

    /// Replace the body of an existing resource. The id, the self link and
    /// any links or member maps the resource holds as a parent are kept.
    pub async fn update(
        &self,
        body: &T,
        company_account_id: &str,
        ctx: &RequestContext,
    ) -> Result<Outcome<ResourceDocument>, ServiceError> {
        let errors = body.validate(&self.descriptor.json_root());
        if errors.has_errors() {
            return Ok(Outcome::ValidationFailed(errors));
        }

        let Some(existing) = self.find_document(company_account_id).await? else {
            return Ok(Outcome::NotFound);
        };

        let mut links = existing.data.links.clone();
        links.insert(
            accounts_domain::SELF_LINK,
            self.descriptor.uri(ctx.transaction_id(), company_account_id),
        );
        let mut data = DocumentData::stamp(body, links, self.descriptor.kind)
            .map_err(|e| ServiceError::corrupt(self.descriptor.collection, &existing.id, e))?;
        for field in member_fields(self.descriptor) {
            if let Some(members) = existing.data.fields.get(field) {
                data.fields.insert(field.to_string(), members.clone());
            }
        }

        self.store
            .save(self.descriptor.collection, ResourceDocument::new(existing.id, data))
            .await?;
        info!(
            kind = self.descriptor.kind,
            company_account_id,
            request_id = %ctx.request_id,
            "resource updated"
        );
        Ok(Outcome::Updated)
    }

    pub async fn find(&self, company_account_id: &str) -> Result<Outcome<ResourceDocument>, ServiceError> {
        Ok(match self.find_document(company_account_id).await? {
            Some(document) => Outcome::Found(document),
            None => Outcome::NotFound,
        })
    }

    pub async fn find_document(&self, company_account_id: &str) -> Result<Option<ResourceDocument>, ServiceError> {
        Ok(self
            .store
            .find(self.descriptor.collection, &self.resource_id(company_account_id))
            .await?)
    }

    /// The stored body decoded into its resource type.
    pub async fn fetch(&self, company_account_id: &str) -> Result<Option<T>, ServiceError> {
        match self.find_document(company_account_id).await? {
            Some(document) => document
                .data
                .body()
                .map(Some)
                .map_err(|e| ServiceError::corrupt(self.descriptor.collection, &document.id, e)),
            None => Ok(None),
        }
    }

    pub async fn delete(
        &self,
        company_account_id: &str,
        ctx: &RequestContext,
    ) -> Result<Outcome<ResourceDocument>, ServiceError> {
        let id = self.resource_id(company_account_id);
        if !self.store.exists(self.descriptor.collection, &id).await? {
            return Ok(Outcome::NotFound);
        }
        self.store.delete(self.descriptor.collection, &id).await?;
        self.links
            .remove_link(self.descriptor.parent, company_account_id, self.descriptor.link_name)
            .await?;
        info!(
            kind = self.descriptor.kind,
            company_account_id,
            request_id = %ctx.request_id,
            "resource deleted"
        );
        Ok(Outcome::Deleted)
    }
}

/// Member-map fields a resource carries when it is the parent of a collection.
pub(crate) fn member_fields(descriptor: &ResourceDescriptor) -> impl Iterator<Item = &'static str> + '_ {
    catalogue::ALL
        .iter()
        .filter(move |child| {
            child.is_collection()
                && child
                    .parent
                    .descriptor()
                    .is_some_and(|parent| parent.name == descriptor.name)
        })
        .map(|child| child.link_name)
}
