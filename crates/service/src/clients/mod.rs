//! Outbound service clients.
//!
//! Each collaborator is an async trait so the service layer can be driven by
//! stubs in tests; [`http`] holds the production implementations. Calls are
//! single-attempt with no retries.

pub mod http;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use accounts_domain::{CompanyProfile, Transaction, TransactionResource};

pub const TRANSACTIONS_SERVICE: &str = "transactions";
pub const COMPANY_PROFILE_SERVICE: &str = "company-profile";
pub const DOCUMENT_GENERATOR_SERVICE: &str = "document-generator";
pub const DOCUMENT_DOWNLOAD_SERVICE: &str = "document-download";
pub const DOCUMENT_VALIDATOR_SERVICE: &str = "document-validator";

/// Errors raised by outbound clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, I/O).
    #[error("{service}: request failed: {message}")]
    Transport { service: &'static str, message: String },

    /// The service rejected the request as malformed.
    #[error("{service}: bad request: {message}")]
    BadRequest { service: &'static str, message: String },

    #[error("{service}: {what} not found")]
    NotFound { service: &'static str, what: String },

    #[error("{service}: unexpected status {status}")]
    Status { service: &'static str, status: u16 },

    /// The response body did not decode.
    #[error("{service}: malformed response: {message}")]
    Decode { service: &'static str, message: String },
}

impl ClientError {
    pub fn service(&self) -> &'static str {
        match self {
            ClientError::Transport { service, .. }
            | ClientError::BadRequest { service, .. }
            | ClientError::NotFound { service, .. }
            | ClientError::Status { service, .. }
            | ClientError::Decode { service, .. } => *service,
        }
    }
}

#[async_trait]
pub trait TransactionClient: Send + Sync {
    /// `Ok(None)` when the transaction does not exist.
    async fn get(&self, transaction_id: &str) -> Result<Option<Transaction>, ClientError>;

    /// Register a resource on the transaction under `resource_uri`.
    async fn add_resource(
        &self,
        transaction_id: &str,
        resource_uri: &str,
        resource: &TransactionResource,
    ) -> Result<(), ClientError>;
}

#[async_trait]
pub trait CompanyProfileClient: Send + Sync {
    async fn get(&self, company_number: &str) -> Result<CompanyProfile, ClientError>;
}

/// Request to render the accounts document for a company account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentGeneratorRequest {
    pub resource_uri: String,
    pub mime_type: String,
    pub document_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentGeneratorResponse {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_identifier: Option<String>,
    #[serde(default)]
    pub description_values: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub links: Option<GeneratedLinks>,
    #[serde(default)]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLinks {
    #[serde(default)]
    pub location: Option<String>,
}

#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    async fn generate(&self, request: &DocumentGeneratorRequest) -> Result<DocumentGeneratorResponse, ClientError>;
}

#[async_trait]
pub trait DocumentDownloader: Send + Sync {
    /// Fetch the bytes of a generated document.
    async fn download(&self, location: &str) -> Result<Vec<u8>, ClientError>;
}

/// Verdict of the external document validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub validation_status: String,
}

impl ValidationVerdict {
    /// `"OK"` in any letter case is the only pass.
    pub fn is_ok(&self) -> bool {
        self.validation_status.eq_ignore_ascii_case("OK")
    }
}

#[async_trait]
pub trait DocumentValidator: Send + Sync {
    async fn validate(&self, document: Vec<u8>, location: &str) -> Result<ValidationVerdict, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_ok_is_case_insensitive() {
        for status in ["OK", "ok", "Ok"] {
            assert!(ValidationVerdict { validation_status: status.into() }.is_ok());
        }
        assert!(!ValidationVerdict { validation_status: "FAILED".into() }.is_ok());
        assert!(!ValidationVerdict { validation_status: "OK ".into() }.is_ok());
    }

    #[test]
    fn client_error_names_its_service() {
        let err = ClientError::Status { service: DOCUMENT_GENERATOR_SERVICE, status: 502 };
        assert_eq!(err.service(), "document-generator");
        assert_eq!(err.to_string(), "document-generator: unexpected status 502");
    }

    #[test]
    fn generator_response_tolerates_missing_fields() {
        let response: DocumentGeneratorResponse =
            serde_json::from_value(serde_json::json!({ "description": "accounts" })).unwrap();
        assert_eq!(response.description.as_deref(), Some("accounts"));
        assert!(response.links.is_none());
    }
}
