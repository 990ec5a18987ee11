//! Shared fixtures for service integration tests: in-memory store, stub
//! collaborators, and a helper that stands up a company account with a
//! small-full container.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use accounts_domain::catalogue;
use accounts_domain::company::{LastAccounts, ProfileAccounts};
use accounts_domain::model::{CompanyAccount, NextAccounts, SmallFull};
use accounts_domain::{CompanyProfile, ResourceDocument, Transaction, TransactionResource, TransactionStatus};
use accounts_service::clients::{
    ClientError, CompanyProfileClient, DocumentDownloader, DocumentGenerator, DocumentGeneratorRequest,
    DocumentGeneratorResponse, DocumentValidator, GeneratedLinks, TransactionClient, ValidationVerdict,
};
use accounts_service::{
    CompanyAccountService, LinkRegistry, Outcome, RequestContext, ResourceService, SharedStore,
};
use accounts_storage::{MemoryStore, ResourceStore, StorageError};

pub const TRANSACTION_ID: &str = "tx-100";
pub const COMPANY_NUMBER: &str = "01234567";

pub fn transaction(status: TransactionStatus) -> Transaction {
    Transaction {
        id: TRANSACTION_ID.to_string(),
        status,
        company_number: COMPANY_NUMBER.to_string(),
        links: BTreeMap::new(),
        resources: BTreeMap::new(),
    }
}

pub fn ctx() -> RequestContext {
    RequestContext::new(transaction(TransactionStatus::Open), "req-test")
}

// ──── Stub collaborators ────

#[derive(Default)]
pub struct StubTransactions {
    pub registered: Mutex<Vec<(String, String, TransactionResource)>>,
    pub fail: bool,
}

#[async_trait]
impl TransactionClient for StubTransactions {
    async fn get(&self, transaction_id: &str) -> Result<Option<Transaction>, ClientError> {
        Ok((transaction_id == TRANSACTION_ID).then(|| transaction(TransactionStatus::Open)))
    }

    async fn add_resource(
        &self,
        transaction_id: &str,
        resource_uri: &str,
        resource: &TransactionResource,
    ) -> Result<(), ClientError> {
        if self.fail {
            return Err(ClientError::Status { service: "transactions", status: 500 });
        }
        self.registered.lock().unwrap().push((
            transaction_id.to_string(),
            resource_uri.to_string(),
            resource.clone(),
        ));
        Ok(())
    }
}

#[derive(Default)]
pub struct StubProfiles {
    pub profile: CompanyProfile,
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl StubProfiles {
    pub fn first_year() -> Self {
        StubProfiles {
            profile: CompanyProfile {
                company_number: COMPANY_NUMBER.to_string(),
                ..CompanyProfile::default()
            },
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// A profile service that is down.
    pub fn unavailable() -> Self {
        let mut stub = Self::first_year();
        stub.fail = true;
        stub
    }

    pub fn multi_year() -> Self {
        let mut stub = Self::first_year();
        stub.profile.accounts = Some(ProfileAccounts {
            last_accounts: Some(LastAccounts {
                made_up_to: Some("2022-12-31".to_string()),
            }),
            next_accounts: None,
        });
        stub
    }

    pub fn community_interest() -> Self {
        let mut stub = Self::first_year();
        stub.profile.is_community_interest_company = true;
        stub
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompanyProfileClient for StubProfiles {
    async fn get(&self, _company_number: &str) -> Result<CompanyProfile, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClientError::Status { service: "company-profile", status: 503 });
        }
        Ok(self.profile.clone())
    }
}

pub struct StubGenerator {
    pub response: Result<DocumentGeneratorResponse, ClientError>,
    pub requests: Mutex<Vec<DocumentGeneratorRequest>>,
}

impl StubGenerator {
    pub fn returning(response: DocumentGeneratorResponse) -> Self {
        StubGenerator {
            response: Ok(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ClientError) -> Self {
        StubGenerator {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }
}

/// A complete generator response for accounts ending 2023-12-31.
pub fn generated_document() -> DocumentGeneratorResponse {
    DocumentGeneratorResponse {
        description: Some("Small full accounts made up to 31 December 2023".to_string()),
        description_identifier: Some("small-full-accounts".to_string()),
        description_values: Some(BTreeMap::from([(
            "period_end_on".to_string(),
            "2023-12-31".to_string(),
        )])),
        links: Some(GeneratedLinks {
            location: Some("s3://documents/accounts/abc.xhtml".to_string()),
        }),
        size: Some("2048".to_string()),
    }
}

#[async_trait]
impl DocumentGenerator for StubGenerator {
    async fn generate(&self, request: &DocumentGeneratorRequest) -> Result<DocumentGeneratorResponse, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        self.response.clone()
    }
}

pub struct StubDownloader {
    pub bytes: Vec<u8>,
    pub calls: AtomicUsize,
}

impl StubDownloader {
    pub fn with(bytes: &[u8]) -> Self {
        StubDownloader {
            bytes: bytes.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DocumentDownloader for StubDownloader {
    async fn download(&self, _location: &str) -> Result<Vec<u8>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}

pub struct StubValidator {
    pub status: String,
}

impl StubValidator {
    pub fn with(status: &str) -> Self {
        StubValidator {
            status: status.to_string(),
        }
    }
}

#[async_trait]
impl DocumentValidator for StubValidator {
    async fn validate(&self, _document: Vec<u8>, _location: &str) -> Result<ValidationVerdict, ClientError> {
        Ok(ValidationVerdict {
            validation_status: self.status.clone(),
        })
    }
}

/// A store whose backend is down.
pub struct FailingStore;

#[async_trait]
impl ResourceStore for FailingStore {
    async fn insert(&self, _collection: &str, _document: ResourceDocument) -> Result<(), StorageError> {
        Err(StorageError::Backend("connection refused".into()))
    }

    async fn save(&self, _collection: &str, _document: ResourceDocument) -> Result<(), StorageError> {
        Err(StorageError::Backend("connection refused".into()))
    }

    async fn find(&self, _collection: &str, _id: &str) -> Result<Option<ResourceDocument>, StorageError> {
        Err(StorageError::Backend("connection refused".into()))
    }

    async fn exists(&self, _collection: &str, _id: &str) -> Result<bool, StorageError> {
        Err(StorageError::Backend("connection refused".into()))
    }

    async fn delete(&self, _collection: &str, _id: &str) -> Result<bool, StorageError> {
        Err(StorageError::Backend("connection refused".into()))
    }
}

// ──── Fixture ────

pub struct Fixture {
    pub store: SharedStore,
    pub links: Arc<LinkRegistry>,
    pub transactions: Arc<StubTransactions>,
    pub company_account_id: String,
}

impl Fixture {
    /// A company account with no children.
    pub async fn bare() -> Self {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let links = Arc::new(LinkRegistry::new(store.clone()));
        let transactions = Arc::new(StubTransactions::default());
        let accounts = CompanyAccountService::new(store.clone(), transactions.clone());

        let body = CompanyAccount {
            next_accounts: Some(NextAccounts {
                period_start_on: Some("2023-01-01".to_string()),
                period_end_on: Some("2023-12-31".to_string()),
            }),
        };
        let document = match accounts.create(&body, &ctx()).await.unwrap() {
            Outcome::Created(document) => document,
            other => panic!("company account not created: {}", other.label()),
        };

        Fixture {
            store,
            links,
            transactions,
            company_account_id: document.id,
        }
    }

    /// A company account with a small-full container.
    pub async fn with_small_full() -> Self {
        let fixture = Self::bare().await;
        let small_full = fixture.service::<SmallFull>(&catalogue::SMALL_FULL);
        let outcome = small_full
            .create(&SmallFull {}, &fixture.company_account_id, &ctx())
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Created(_)));
        fixture
    }

    pub fn service<T>(&self, descriptor: &'static accounts_domain::ResourceDescriptor) -> ResourceService<T>
    where
        T: accounts_domain::Validatable + serde::Serialize + serde::de::DeserializeOwned + Send + Sync,
    {
        ResourceService::new(descriptor, self.store.clone(), self.links.clone())
    }

    pub async fn document(&self, collection: &str, id: &str) -> Option<ResourceDocument> {
        self.store.find(collection, id).await.unwrap()
    }

    pub async fn company_account(&self) -> ResourceDocument {
        self.document(catalogue::COMPANY_ACCOUNTS_COLLECTION, &self.company_account_id)
            .await
            .expect("company account")
    }

    pub async fn small_full(&self) -> ResourceDocument {
        let id = accounts_domain::IdentityDeriver::new().derive(&self.company_account_id, catalogue::SMALL_FULL.name);
        self.document(catalogue::SMALL_FULL.collection, &id)
            .await
            .expect("small-full")
    }
}
