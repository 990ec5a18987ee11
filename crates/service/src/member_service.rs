use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use accounts_domain::resource::company_account_uri;
use accounts_domain::{DocumentData, IdentityDeriver, Links, ResourceDescriptor, ResourceDocument, Validatable};

use crate::context::RequestContext;
use crate::error::ServiceError;
use crate::links::{member_ids, Linkable};
use crate::outcome::Outcome;
use crate::SharedStore;

/// Lifecycle of a multi-instance resource (directors, loans, related-party
/// transactions). Members get random ids; the parent keeps a member map
/// from id to self link.
pub struct MemberService<T> {
    descriptor: &'static ResourceDescriptor,
    store: SharedStore,
    links: Arc<dyn Linkable>,
    ids: IdentityDeriver,
    _body: PhantomData<fn() -> T>,
}

impl<T> MemberService<T>
where
    T: Validatable + Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(descriptor: &'static ResourceDescriptor, store: SharedStore, links: Arc<dyn Linkable>) -> Self {
        MemberService {
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

    pub async fn create(
        &self,
        body: &T,
        company_account_id: &str,
        ctx: &RequestContext,
    ) -> Result<Outcome<ResourceDocument>, ServiceError> {
        let errors = body.validate(&self.descriptor.json_root());
        if errors.has_errors() {
            return Ok(Outcome::ValidationFailed(errors));
        }

        let member_id = self.ids.derive_random();
        let tid = ctx.transaction_id();
        let self_link = self.descriptor.member_uri(tid, company_account_id, &member_id);
        let data = DocumentData::stamp(body, Links::with_self(&self_link), self.descriptor.kind)
            .map_err(|e| ServiceError::corrupt(self.descriptor.collection, &member_id, e))?;
        let document = ResourceDocument::new(member_id.clone(), data);

        match self.store.insert(self.descriptor.collection, document.clone()).await {
            Ok(()) => {}
            Err(e) if e.is_duplicate_key() => return Ok(Outcome::DuplicateKey),
            Err(e) => return Err(e.into()),
        }

        self.links
            .add_member(
                self.descriptor.parent,
                company_account_id,
                self.descriptor.link_name,
                &self.descriptor.uri(tid, company_account_id),
                &member_id,
                &self_link,
            )
            .await?;

        info!(
            kind = self.descriptor.kind,
            company_account_id,
            member_id = %member_id,
            request_id = %ctx.request_id,
            "member created"
        );
        Ok(Outcome::Created(document))
    }

    pub async fn update(
        &self,
        body: &T,
        company_account_id: &str,
        member_id: &str,
        ctx: &RequestContext,
    ) -> Result<Outcome<ResourceDocument>, ServiceError> {
        let errors = body.validate(&self.descriptor.json_root());
        if errors.has_errors() {
            return Ok(Outcome::ValidationFailed(errors));
        }
        let Some(existing) = self.owned(company_account_id, member_id, ctx).await? else {
            return Ok(Outcome::NotFound);
        };

        let data = DocumentData::stamp(body, existing.data.links.clone(), self.descriptor.kind)
            .map_err(|e| ServiceError::corrupt(self.descriptor.collection, member_id, e))?;
        self.store
            .save(self.descriptor.collection, ResourceDocument::new(existing.id, data))
            .await?;
        info!(kind = self.descriptor.kind, member_id, request_id = %ctx.request_id, "member updated");
        Ok(Outcome::Updated)
    }

    pub async fn find(
        &self,
        company_account_id: &str,
        member_id: &str,
        ctx: &RequestContext,
    ) -> Result<Outcome<ResourceDocument>, ServiceError> {
        Ok(match self.owned(company_account_id, member_id, ctx).await? {
            Some(document) => Outcome::Found(document),
            None => Outcome::NotFound,
        })
    }

    /// Every member listed on the parent. `NotFound` when the parent itself
    /// does not exist.
    pub async fn find_all(&self, company_account_id: &str) -> Result<Outcome<Vec<ResourceDocument>>, ServiceError> {
        let parent = self.descriptor.parent;
        let parent_id = parent.document_id(&self.ids, company_account_id);
        let Some(parent_document) = self.store.find(parent.collection(), &parent_id).await? else {
            return Ok(Outcome::NotFound);
        };

        let mut members = Vec::new();
        for id in member_ids(&parent_document, self.descriptor.link_name) {
            if let Some(document) = self.store.find(self.descriptor.collection, &id).await? {
                members.push(document);
            }
        }
        Ok(Outcome::Found(members))
    }

    pub async fn delete(
        &self,
        company_account_id: &str,
        member_id: &str,
        ctx: &RequestContext,
    ) -> Result<Outcome<ResourceDocument>, ServiceError> {
        if self.owned(company_account_id, member_id, ctx).await?.is_none() {
            return Ok(Outcome::NotFound);
        }
        self.store.delete(self.descriptor.collection, member_id).await?;
        self.links
            .remove_member(
                self.descriptor.parent,
                company_account_id,
                self.descriptor.link_name,
                member_id,
            )
            .await?;
        info!(kind = self.descriptor.kind, member_id, request_id = %ctx.request_id, "member deleted");
        Ok(Outcome::Deleted)
    }

    /// A member is only visible under the company account that created it.
    async fn owned(
        &self,
        company_account_id: &str,
        member_id: &str,
        ctx: &RequestContext,
    ) -> Result<Option<ResourceDocument>, ServiceError> {
        let owner = format!("{}/", company_account_uri(ctx.transaction_id(), company_account_id));
        let document = self.store.find(self.descriptor.collection, member_id).await?;
        Ok(document.filter(|d| d.links().self_link().is_some_and(|link| link.starts_with(&owner))))
    }
}
