//! Closure validation: the checks that gate a transaction's close.
//!
//! Each [`ClosureValidator`] owns one resource family and writes errors
//! under its own JSON paths. The chain runs them concurrently against a
//! shared [`ClosureContext`] and concatenates their errors in registration
//! order. An empty collection means the accounts can be filed.

mod members;
mod notes;
mod periods;
mod reports;
mod required;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use accounts_domain::catalogue::{self, COMPANY_ACCOUNTS_COLLECTION};
use accounts_domain::model::{AccountingPolicies, Approval};
use accounts_domain::{
    CompanyProfile, Errors, IdentityDeriver, ParentKind, ResourceDescriptor, ResourceDocument, Transaction,
};

use crate::clients::CompanyProfileClient;
use crate::error::ServiceError;
use crate::SharedStore;

pub use members::MembersValidator;
pub use notes::NotesValidator;
pub use periods::PeriodsValidator;
pub use reports::{CicReportValidator, DirectorsReportValidator};
pub use required::{MandatoryResource, StatementsValidator};

#[async_trait]
pub trait ClosureValidator: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Inspect the graph and return every defect found. Data-access
    /// failures abort the whole chain.
    async fn validate(&self, ctx: &ClosureContext) -> Result<Errors, ServiceError>;
}

/// What every validator reads: the root and small-full documents, the
/// transaction, and a company profile fetched at most once per run.
pub struct ClosureContext {
    store: SharedStore,
    ids: IdentityDeriver,
    profiles: Arc<dyn CompanyProfileClient>,
    profile: OnceCell<CompanyProfile>,
    pub transaction: Transaction,
    pub company_account_id: String,
    pub company_account: ResourceDocument,
    pub small_full: ResourceDocument,
}

impl ClosureContext {
    /// The company profile, looked up on first use and shared afterwards.
    pub async fn profile(&self) -> Result<&CompanyProfile, ServiceError> {
        self.profile
            .get_or_try_init(|| async {
                let profile = self.profiles.get(&self.transaction.company_number).await?;
                debug!(company_number = %self.transaction.company_number, "company profile loaded");
                Ok::<_, ServiceError>(profile)
            })
            .await
    }

    /// The document a parent kind refers to for this company account.
    pub async fn parent(&self, kind: ParentKind) -> Result<Option<ResourceDocument>, ServiceError> {
        match kind {
            ParentKind::CompanyAccount => Ok(Some(self.company_account.clone())),
            ParentKind::SmallFull => Ok(Some(self.small_full.clone())),
            other => {
                let id = other.document_id(&self.ids, &self.company_account_id);
                Ok(self.store.find(other.collection(), &id).await?)
            }
        }
    }

    /// The document `parent` links to for `descriptor`, if both the link
    /// and the document exist. Records nothing.
    pub async fn follow(
        &self,
        parent: &ResourceDocument,
        descriptor: &'static ResourceDescriptor,
    ) -> Result<Option<ResourceDocument>, ServiceError> {
        if !parent.links().contains(descriptor.link_name) {
            return Ok(None);
        }
        let id = self.ids.derive(&self.company_account_id, descriptor.name);
        Ok(self.store.find(descriptor.collection, &id).await?)
    }

    /// Like [`follow`](Self::follow), but a missing link or a dangling one
    /// is recorded as a missing element at the link's JSON path.
    pub async fn require(
        &self,
        parent: &ResourceDocument,
        descriptor: &'static ResourceDescriptor,
        errors: &mut Errors,
    ) -> Result<Option<ResourceDocument>, ServiceError> {
        let document = self.follow(parent, descriptor).await?;
        if document.is_none() {
            errors.missing(descriptor.link_json_path());
        }
        Ok(document)
    }

    /// [`require`](Self::require) and decode the body.
    pub async fn require_body<T: DeserializeOwned>(
        &self,
        parent: &ResourceDocument,
        descriptor: &'static ResourceDescriptor,
        errors: &mut Errors,
    ) -> Result<Option<T>, ServiceError> {
        match self.require(parent, descriptor, errors).await? {
            Some(document) => decode_body(descriptor, &document).map(Some),
            None => Ok(None),
        }
    }

    /// [`follow`](Self::follow) and decode the body.
    pub async fn follow_body<T: DeserializeOwned>(
        &self,
        parent: &ResourceDocument,
        descriptor: &'static ResourceDescriptor,
    ) -> Result<Option<T>, ServiceError> {
        match self.follow(parent, descriptor).await? {
            Some(document) => decode_body(descriptor, &document).map(Some),
            None => Ok(None),
        }
    }
}

fn decode_body<T: DeserializeOwned>(
    descriptor: &'static ResourceDescriptor,
    document: &ResourceDocument,
) -> Result<T, ServiceError> {
    document
        .data
        .body()
        .map_err(|e| ServiceError::corrupt(descriptor.collection, &document.id, e))
}

/// The ordered set of closure validators.
pub struct ClosureChain {
    validators: Vec<Box<dyn ClosureValidator>>,
    store: SharedStore,
    profiles: Arc<dyn CompanyProfileClient>,
    ids: IdentityDeriver,
}

impl ClosureChain {
    pub fn new(
        store: SharedStore,
        profiles: Arc<dyn CompanyProfileClient>,
        validators: Vec<Box<dyn ClosureValidator>>,
    ) -> Self {
        ClosureChain {
            validators,
            store,
            profiles,
            ids: IdentityDeriver::new(),
        }
    }

    /// Every validator for a small-full filing.
    pub fn standard(store: SharedStore, profiles: Arc<dyn CompanyProfileClient>) -> Self {
        let validators: Vec<Box<dyn ClosureValidator>> = vec![
            Box::new(PeriodsValidator),
            Box::new(MandatoryResource::<Approval>::new("approval", &catalogue::APPROVAL)),
            Box::new(StatementsValidator),
            Box::new(MandatoryResource::<AccountingPolicies>::new(
                "accounting_policies",
                &catalogue::ACCOUNTING_POLICIES,
            )),
            Box::new(NotesValidator),
            Box::new(DirectorsReportValidator),
            Box::new(MembersValidator::new(
                "loans_to_directors",
                &catalogue::LOANS_TO_DIRECTORS,
                &catalogue::LOAN,
            )),
            Box::new(MembersValidator::new(
                "related_party_transactions",
                &catalogue::RELATED_PARTY_TRANSACTIONS,
                &catalogue::RELATED_PARTY_TRANSACTION,
            )),
            Box::new(CicReportValidator),
        ];
        ClosureChain::new(store, profiles, validators)
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Walk the graph under a company account. Without a small-full
    /// container nothing else can be checked, so that single error is
    /// returned alone.
    pub async fn validate(&self, transaction: &Transaction, company_account_id: &str) -> Result<Errors, ServiceError> {
        let mut errors = Errors::new();

        let Some(company_account) = self
            .store
            .find(COMPANY_ACCOUNTS_COLLECTION, company_account_id)
            .await?
        else {
            errors.missing("$.company_accounts");
            return Ok(errors);
        };

        let small_full = if company_account.links().contains(catalogue::SMALL_FULL.link_name) {
            let id = self.ids.derive(company_account_id, catalogue::SMALL_FULL.name);
            self.store.find(catalogue::SMALL_FULL.collection, &id).await?
        } else {
            None
        };
        let Some(small_full) = small_full else {
            errors.missing(catalogue::SMALL_FULL.link_json_path());
            return Ok(errors);
        };

        let ctx = ClosureContext {
            store: self.store.clone(),
            ids: self.ids,
            profiles: self.profiles.clone(),
            profile: OnceCell::new(),
            transaction: transaction.clone(),
            company_account_id: company_account_id.to_string(),
            company_account,
            small_full,
        };

        let results = try_join_all(self.validators.iter().map(|v| v.validate(&ctx))).await?;
        for (validator, found) in self.validators.iter().zip(results) {
            if found.has_errors() {
                debug!(validator = validator.name(), errors = found.len(), "closure defects");
            }
            errors.extend(found);
        }

        info!(
            company_account_id,
            transaction_id = %transaction.id,
            errors = errors.len(),
            "closure validation complete"
        );
        Ok(errors)
    }
}
