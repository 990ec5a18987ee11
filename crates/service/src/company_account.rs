use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{error, info};

use accounts_domain::catalogue::{COMPANY_ACCOUNTS_COLLECTION, COMPANY_ACCOUNTS_KIND};
use accounts_domain::model::CompanyAccount;
use accounts_domain::resource::{company_account_uri, transaction_uri};
use accounts_domain::{DocumentData, IdentityDeriver, Links, ResourceDocument, TransactionResource, Validatable};

use crate::clients::TransactionClient;
use crate::context::RequestContext;
use crate::error::ServiceError;
use crate::outcome::Outcome;
use crate::SharedStore;

/// `kind` under which the accounts are registered on the transaction.
pub const TRANSACTION_RESOURCE_KIND: &str = "company-accounts";

/// Link on the root pointing back at its transaction.
pub const TRANSACTION_LINK: &str = "transaction";

/// The company-account root. It has no parent; creating one registers it on
/// the transaction instead.
pub struct CompanyAccountService {
    store: SharedStore,
    transactions: Arc<dyn TransactionClient>,
    ids: IdentityDeriver,
}

impl CompanyAccountService {
    pub fn new(store: SharedStore, transactions: Arc<dyn TransactionClient>) -> Self {
        CompanyAccountService {
            store,
            transactions,
            ids: IdentityDeriver::new(),
        }
    }

    pub async fn create(
        &self,
        body: &CompanyAccount,
        ctx: &RequestContext,
    ) -> Result<Outcome<ResourceDocument>, ServiceError> {
        let errors = body.validate("$.company_accounts");
        if errors.has_errors() {
            return Ok(Outcome::ValidationFailed(errors));
        }

        let id = self.ids.derive_random();
        let tid = ctx.transaction_id();
        let self_link = company_account_uri(tid, &id);
        let mut links = Links::with_self(&self_link);
        links.insert(TRANSACTION_LINK, transaction_uri(tid));
        let data = DocumentData::stamp(body, links, COMPANY_ACCOUNTS_KIND)
            .map_err(|e| ServiceError::corrupt(COMPANY_ACCOUNTS_COLLECTION, &id, e))?;
        let document = ResourceDocument::new(id.clone(), data);

        match self.store.insert(COMPANY_ACCOUNTS_COLLECTION, document.clone()).await {
            Ok(()) => {}
            Err(e) if e.is_duplicate_key() => return Ok(Outcome::DuplicateKey),
            Err(e) => return Err(e.into()),
        }

        let resource = TransactionResource {
            kind: TRANSACTION_RESOURCE_KIND.to_string(),
            links: BTreeMap::from([
                ("resource".to_string(), self_link.clone()),
                ("validation_status".to_string(), validation_status_uri(tid, &id)),
            ]),
        };
        if let Err(e) = self.transactions.add_resource(tid, &self_link, &resource).await {
            error!(company_account_id = %id, transaction_id = tid, error = %e, "registering accounts on transaction failed");
            return Err(e.into());
        }

        info!(
            company_account_id = %id,
            transaction_id = tid,
            request_id = %ctx.request_id,
            "company account created"
        );
        Ok(Outcome::Created(document))
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
            .find(COMPANY_ACCOUNTS_COLLECTION, company_account_id)
            .await?)
    }

    /// Whether the root exists and belongs to the given transaction.
    pub async fn belongs_to(&self, company_account_id: &str, transaction_id: &str) -> Result<bool, ServiceError> {
        let expected = company_account_uri(transaction_id, company_account_id);
        Ok(self
            .find_document(company_account_id)
            .await?
            .is_some_and(|d| d.links().self_link() == Some(expected.as_str())))
    }
}

/// Private URI reporting whether the accounts are closeable.
pub fn validation_status_uri(transaction_id: &str, company_account_id: &str) -> String {
    format!(
        "/private{}/validation-status",
        company_account_uri(transaction_id, company_account_id)
    )
}
