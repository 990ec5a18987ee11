//! The immutable path → service registry.
//!
//! Built once at start-up from the catalogue and shared by reference. Each
//! entry erases its body type behind [`Creatable`], taking and returning
//! JSON, so the HTTP layer can route any resource path without knowing the
//! type behind it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use accounts_domain::catalogue;
use accounts_domain::errors::codes;
use accounts_domain::model::{
    AccountingPolicies, Approval, CicReport, CicStatements, CreditorsNote, DebtorsNote, DetailsNote,
    Director, DirectorsReport, DirectorsReportStatements, EmployeesNote, FixedAssetNote, Loan,
    LoansToDirectors, Period, RelatedPartyTransaction, RelatedPartyTransactions, Secretary, SmallFull,
    Statements, StocksNote,
};
use accounts_domain::{Errors, ResourceDescriptor, ValidationError, Validatable};

use crate::context::RequestContext;
use crate::error::ServiceError;
use crate::links::Linkable;
use crate::member_service::MemberService;
use crate::outcome::Outcome;
use crate::resource_service::ResourceService;
use crate::SharedStore;

/// Type-erased lifecycle of one resource type.
///
/// `member_id` addresses one member of a multi-instance family; `None`
/// addresses the singleton, or the whole collection for `find`.
#[async_trait]
pub trait Creatable: Send + Sync {
    fn descriptor(&self) -> &'static ResourceDescriptor;

    async fn create(&self, body: Value, company_account_id: &str, ctx: &RequestContext)
        -> Result<Outcome<Value>, ServiceError>;

    async fn update(
        &self,
        body: Value,
        company_account_id: &str,
        member_id: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Outcome<Value>, ServiceError>;

    async fn find(
        &self,
        company_account_id: &str,
        member_id: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Outcome<Value>, ServiceError>;

    async fn delete(
        &self,
        company_account_id: &str,
        member_id: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Outcome<Value>, ServiceError>;
}

/// Decode a submitted body. Malformed JSON for the type is a validation
/// failure, not a server error.
fn decode<T: DeserializeOwned>(descriptor: &ResourceDescriptor, body: Value) -> Result<T, Errors> {
    let body = if body.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        body
    };
    serde_json::from_value(body).map_err(|e| {
        let mut errors = Errors::new();
        errors.push(
            ValidationError::new(codes::INVALID_JSON, descriptor.json_root()).with_value("message", e),
        );
        errors
    })
}

#[async_trait]
impl<T> Creatable for ResourceService<T>
where
    T: Validatable + Serialize + DeserializeOwned + Send + Sync,
{
    fn descriptor(&self) -> &'static ResourceDescriptor {
        ResourceService::descriptor(self)
    }

    async fn create(&self, body: Value, company_account_id: &str, ctx: &RequestContext)
        -> Result<Outcome<Value>, ServiceError> {
        let body: T = match decode(self.descriptor(), body) {
            Ok(body) => body,
            Err(errors) => return Ok(Outcome::ValidationFailed(errors)),
        };
        Ok(ResourceService::create(self, &body, company_account_id, ctx)
            .await?
            .map(|d| d.to_response()))
    }

    async fn update(
        &self,
        body: Value,
        company_account_id: &str,
        member_id: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Outcome<Value>, ServiceError> {
        if member_id.is_some() {
            return Ok(Outcome::NotFound);
        }
        let body: T = match decode(self.descriptor(), body) {
            Ok(body) => body,
            Err(errors) => return Ok(Outcome::ValidationFailed(errors)),
        };
        Ok(ResourceService::update(self, &body, company_account_id, ctx)
            .await?
            .map(|d| d.to_response()))
    }

    async fn find(
        &self,
        company_account_id: &str,
        member_id: Option<&str>,
        _ctx: &RequestContext,
    ) -> Result<Outcome<Value>, ServiceError> {
        if member_id.is_some() {
            return Ok(Outcome::NotFound);
        }
        Ok(ResourceService::find(self, company_account_id)
            .await?
            .map(|d| d.to_response()))
    }

    async fn delete(
        &self,
        company_account_id: &str,
        member_id: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Outcome<Value>, ServiceError> {
        if member_id.is_some() {
            return Ok(Outcome::NotFound);
        }
        Ok(ResourceService::delete(self, company_account_id, ctx)
            .await?
            .map(|d| d.to_response()))
    }
}

#[async_trait]
impl<T> Creatable for MemberService<T>
where
    T: Validatable + Serialize + DeserializeOwned + Send + Sync,
{
    fn descriptor(&self) -> &'static ResourceDescriptor {
        MemberService::descriptor(self)
    }

    async fn create(&self, body: Value, company_account_id: &str, ctx: &RequestContext)
        -> Result<Outcome<Value>, ServiceError> {
        let body: T = match decode(self.descriptor(), body) {
            Ok(body) => body,
            Err(errors) => return Ok(Outcome::ValidationFailed(errors)),
        };
        Ok(MemberService::create(self, &body, company_account_id, ctx)
            .await?
            .map(|d| d.to_response()))
    }

    async fn update(
        &self,
        body: Value,
        company_account_id: &str,
        member_id: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Outcome<Value>, ServiceError> {
        let Some(member_id) = member_id else {
            return Ok(Outcome::NotFound);
        };
        let body: T = match decode(self.descriptor(), body) {
            Ok(body) => body,
            Err(errors) => return Ok(Outcome::ValidationFailed(errors)),
        };
        Ok(MemberService::update(self, &body, company_account_id, member_id, ctx)
            .await?
            .map(|d| d.to_response()))
    }

    async fn find(
        &self,
        company_account_id: &str,
        member_id: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Outcome<Value>, ServiceError> {
        match member_id {
            Some(member_id) => Ok(MemberService::find(self, company_account_id, member_id, ctx)
                .await?
                .map(|d| d.to_response())),
            None => Ok(MemberService::find_all(self, company_account_id)
                .await?
                .map(|docs| Value::Array(docs.iter().map(|d| d.to_response()).collect()))),
        }
    }

    async fn delete(
        &self,
        company_account_id: &str,
        member_id: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Outcome<Value>, ServiceError> {
        let Some(member_id) = member_id else {
            return Ok(Outcome::NotFound);
        };
        Ok(MemberService::delete(self, company_account_id, member_id, ctx)
            .await?
            .map(|d| d.to_response()))
    }
}

/// A resource path resolved against the registry.
pub struct ResolvedResource {
    pub service: Arc<dyn Creatable>,
    pub member_id: Option<String>,
}

pub struct ServiceRegistry {
    by_path: HashMap<&'static str, Arc<dyn Creatable>>,
}

impl ServiceRegistry {
    /// Register a service for every resource in the catalogue.
    pub fn new(store: SharedStore, links: Arc<dyn Linkable>) -> Self {
        let mut registry = ServiceRegistry {
            by_path: HashMap::new(),
        };

        macro_rules! single {
            ($descriptor:expr, $body:ty) => {
                registry.insert(Arc::new(ResourceService::<$body>::new(
                    &$descriptor,
                    store.clone(),
                    links.clone(),
                )))
            };
        }
        macro_rules! many {
            ($descriptor:expr, $body:ty) => {
                registry.insert(Arc::new(MemberService::<$body>::new(
                    &$descriptor,
                    store.clone(),
                    links.clone(),
                )))
            };
        }

        single!(catalogue::SMALL_FULL, SmallFull);
        single!(catalogue::CIC_REPORT, CicReport);
        single!(catalogue::CURRENT_PERIOD, Period);
        single!(catalogue::PREVIOUS_PERIOD, Period);
        single!(catalogue::APPROVAL, Approval);
        single!(catalogue::STATEMENTS, Statements);
        single!(catalogue::ACCOUNTING_POLICIES, AccountingPolicies);
        single!(catalogue::STOCKS, StocksNote);
        single!(catalogue::DEBTORS, DebtorsNote);
        single!(catalogue::CREDITORS_WITHIN_ONE_YEAR, CreditorsNote);
        single!(catalogue::CREDITORS_AFTER_ONE_YEAR, CreditorsNote);
        single!(catalogue::TANGIBLE_ASSETS, FixedAssetNote);
        single!(catalogue::INTANGIBLE_ASSETS, FixedAssetNote);
        single!(catalogue::FIXED_ASSETS_INVESTMENTS, DetailsNote);
        single!(catalogue::CURRENT_ASSETS_INVESTMENTS, DetailsNote);
        single!(catalogue::EMPLOYEES, EmployeesNote);
        single!(catalogue::OFF_BALANCE_SHEET_ARRANGEMENTS, DetailsNote);
        single!(catalogue::FINANCIAL_COMMITMENTS, DetailsNote);
        single!(catalogue::DIRECTORS_REPORT, DirectorsReport);
        single!(catalogue::LOANS_TO_DIRECTORS, LoansToDirectors);
        single!(catalogue::RELATED_PARTY_TRANSACTIONS, RelatedPartyTransactions);
        single!(catalogue::SECRETARY, Secretary);
        single!(catalogue::DIRECTORS_REPORT_STATEMENTS, DirectorsReportStatements);
        single!(catalogue::DIRECTORS_REPORT_APPROVAL, Approval);
        single!(catalogue::CIC_STATEMENTS, CicStatements);
        single!(catalogue::CIC_APPROVAL, Approval);
        many!(catalogue::DIRECTOR, Director);
        many!(catalogue::LOAN, Loan);
        many!(catalogue::RELATED_PARTY_TRANSACTION, RelatedPartyTransaction);

        registry
    }

    fn insert(&mut self, service: Arc<dyn Creatable>) {
        self.by_path.insert(service.descriptor().path, service);
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Resolve a path below the company-account root, e.g.
    /// `small-full/notes/stocks` or `small-full/directors-report/directors/{id}`.
    pub fn resolve(&self, path: &str) -> Option<ResolvedResource> {
        let path = path.trim_matches('/');
        if let Some(service) = self.by_path.get(path) {
            return Some(ResolvedResource {
                service: service.clone(),
                member_id: None,
            });
        }
        let (collection, member_id) = path.rsplit_once('/')?;
        let service = self.by_path.get(collection)?;
        if !service.descriptor().is_collection() || member_id.is_empty() {
            return None;
        }
        Some(ResolvedResource {
            service: service.clone(),
            member_id: Some(member_id.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::LinkRegistry;
    use accounts_storage::MemoryStore;

    fn registry() -> ServiceRegistry {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let links = Arc::new(LinkRegistry::new(store.clone()));
        ServiceRegistry::new(store, links)
    }

    #[test]
    fn every_catalogue_entry_is_registered() {
        let registry = registry();
        assert_eq!(registry.len(), catalogue::ALL.len());
        for descriptor in catalogue::ALL {
            let resolved = registry.resolve(descriptor.path).expect(descriptor.path);
            assert_eq!(resolved.service.descriptor().name, descriptor.name);
            assert!(resolved.member_id.is_none());
        }
    }

    #[test]
    fn collection_paths_resolve_members() {
        let resolved = registry()
            .resolve("/small-full/directors-report/directors/abc/")
            .unwrap();
        assert_eq!(resolved.service.descriptor().name, "director");
        assert_eq!(resolved.member_id.as_deref(), Some("abc"));
    }

    #[test]
    fn singletons_do_not_take_member_ids() {
        let registry = registry();
        assert!(registry.resolve("small-full/notes/stocks/abc").is_none());
        assert!(registry.resolve("small-full/notes/unknown").is_none());
    }

    #[test]
    fn malformed_body_is_a_validation_failure() {
        let errors = decode::<StocksNote>(
            &catalogue::STOCKS,
            serde_json::json!({ "current_period": { "total": "lots" } }),
        )
        .unwrap_err();
        assert!(errors.contains(codes::INVALID_JSON, "$.stocks"));
    }
}
