//! HTTP implementations of the outbound clients.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. Status codes are inspected by hand rather
//! than surfaced as transport errors, so a 400 from the document generator
//! can be told apart from a dead connection.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use ureq::Agent;

use accounts_domain::{CompanyProfile, Transaction, TransactionResource};

use super::{
    ClientError, CompanyProfileClient, DocumentDownloader, DocumentGenerator, DocumentGeneratorRequest,
    DocumentGeneratorResponse, DocumentValidator, TransactionClient, ValidationVerdict,
    COMPANY_PROFILE_SERVICE, DOCUMENT_DOWNLOAD_SERVICE, DOCUMENT_GENERATOR_SERVICE,
    DOCUMENT_VALIDATOR_SERVICE, TRANSACTIONS_SERVICE,
};

/// Where and how to reach one outbound service.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub base_url: String,
    /// Sent as `Authorization: Bearer <key>` when set.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Shared plumbing: one agent per client, requests run on the blocking pool.
#[derive(Clone)]
struct HttpClient {
    service: &'static str,
    base_url: String,
    api_key: Option<String>,
    agent: Agent,
}

impl HttpClient {
    fn new(service: &'static str, config: &HttpClientConfig) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build();
        HttpClient {
            service,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            agent: Agent::new_with_config(agent_config),
        }
    }

    /// Absolute locations are used as given; paths are joined to the base URL.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// The bearer credential for `url`, withheld unless `url` is on the
    /// configured service's origin.
    fn auth_header(&self, url: &str) -> Option<String> {
        let key = self.api_key.as_ref()?;
        match (origin(url), origin(&self.base_url)) {
            (Some(target), Some(own)) if target == own => Some(format!("Bearer {}", key)),
            _ => None,
        }
    }

    async fn run<T, F>(&self, call: F) -> Result<T, ClientError>
    where
        T: Send + 'static,
        F: FnOnce(HttpClient) -> Result<T, ClientError> + Send + 'static,
    {
        let client = self.clone();
        let service = self.service;
        tokio::task::spawn_blocking(move || call(client))
            .await
            .map_err(|e| ClientError::Transport {
                service,
                message: format!("task join error: {}", e),
            })?
    }

    fn transport(&self, err: ureq::Error) -> ClientError {
        ClientError::Transport {
            service: self.service,
            message: err.to_string(),
        }
    }

    fn read_json<T: DeserializeOwned>(&self, response: ureq::http::Response<ureq::Body>) -> Result<T, ClientError> {
        response
            .into_body()
            .read_json()
            .map_err(|e| ClientError::Decode {
                service: self.service,
                message: e.to_string(),
            })
    }

    fn read_text(&self, response: ureq::http::Response<ureq::Body>) -> String {
        response.into_body().read_to_string().unwrap_or_default()
    }
}

/// Scheme, host and effective port of an absolute URL.
fn origin(url: &str) -> Option<(String, String, u16)> {
    let uri: ureq::http::Uri = url.parse().ok()?;
    let scheme = uri.scheme_str()?.to_ascii_lowercase();
    let host = uri.host()?.to_ascii_lowercase();
    let port = match (uri.port_u16(), scheme.as_str()) {
        (Some(port), _) => port,
        (None, "https") => 443,
        (None, "http") => 80,
        (None, _) => return None,
    };
    Some((scheme, host, port))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

// ──────────────────────────────────────────────
// Transactions
// ──────────────────────────────────────────────

pub struct HttpTransactionClient {
    http: HttpClient,
}

impl HttpTransactionClient {
    pub fn new(config: &HttpClientConfig) -> Self {
        HttpTransactionClient {
            http: HttpClient::new(TRANSACTIONS_SERVICE, config),
        }
    }
}

#[async_trait]
impl TransactionClient for HttpTransactionClient {
    async fn get(&self, transaction_id: &str) -> Result<Option<Transaction>, ClientError> {
        let url = self.http.url(&format!("/transactions/{}", transaction_id));
        self.http
            .run(move |http| {
                let mut request = http.agent.get(&url);
                if let Some(auth) = http.auth_header(&url) {
                    request = request.header("Authorization", &auth);
                }
                let response = request.call().map_err(|e| http.transport(e))?;
                match response.status().as_u16() {
                    404 => Ok(None),
                    status if is_success(status) => http.read_json(response).map(Some),
                    status => Err(ClientError::Status {
                        service: http.service,
                        status,
                    }),
                }
            })
            .await
    }

    async fn add_resource(
        &self,
        transaction_id: &str,
        resource_uri: &str,
        resource: &TransactionResource,
    ) -> Result<(), ClientError> {
        let url = self.http.url(&format!("/private/transactions/{}", transaction_id));
        let entry = serde_json::to_value(resource).map_err(|e| ClientError::Decode {
            service: TRANSACTIONS_SERVICE,
            message: e.to_string(),
        })?;
        let mut resources = serde_json::Map::new();
        resources.insert(resource_uri.to_string(), entry);
        let body = json!({ "resources": resources });
        let what = format!("transaction {}", transaction_id);
        self.http
            .run(move |http| {
                let mut request = http.agent.patch(&url);
                if let Some(auth) = http.auth_header(&url) {
                    request = request.header("Authorization", &auth);
                }
                let response = request.send_json(&body).map_err(|e| http.transport(e))?;
                match response.status().as_u16() {
                    status if is_success(status) => Ok(()),
                    400 => Err(ClientError::BadRequest {
                        service: http.service,
                        message: http.read_text(response),
                    }),
                    404 => Err(ClientError::NotFound {
                        service: http.service,
                        what,
                    }),
                    status => Err(ClientError::Status {
                        service: http.service,
                        status,
                    }),
                }
            })
            .await
    }
}

// ──────────────────────────────────────────────
// Company profile
// ──────────────────────────────────────────────

pub struct HttpCompanyProfileClient {
    http: HttpClient,
}

impl HttpCompanyProfileClient {
    pub fn new(config: &HttpClientConfig) -> Self {
        HttpCompanyProfileClient {
            http: HttpClient::new(COMPANY_PROFILE_SERVICE, config),
        }
    }
}

#[async_trait]
impl CompanyProfileClient for HttpCompanyProfileClient {
    async fn get(&self, company_number: &str) -> Result<CompanyProfile, ClientError> {
        let url = self.http.url(&format!("/company/{}", company_number));
        let what = format!("company {}", company_number);
        self.http
            .run(move |http| {
                let mut request = http.agent.get(&url);
                if let Some(auth) = http.auth_header(&url) {
                    request = request.header("Authorization", &auth);
                }
                let response = request.call().map_err(|e| http.transport(e))?;
                match response.status().as_u16() {
                    status if is_success(status) => http.read_json(response),
                    404 => Err(ClientError::NotFound {
                        service: http.service,
                        what,
                    }),
                    status => Err(ClientError::Status {
                        service: http.service,
                        status,
                    }),
                }
            })
            .await
    }
}

// ──────────────────────────────────────────────
// Document generator and download
// ──────────────────────────────────────────────

pub struct HttpDocumentGenerator {
    http: HttpClient,
}

impl HttpDocumentGenerator {
    pub fn new(config: &HttpClientConfig) -> Self {
        HttpDocumentGenerator {
            http: HttpClient::new(DOCUMENT_GENERATOR_SERVICE, config),
        }
    }
}

#[async_trait]
impl DocumentGenerator for HttpDocumentGenerator {
    async fn generate(&self, request: &DocumentGeneratorRequest) -> Result<DocumentGeneratorResponse, ClientError> {
        let url = self.http.url("/private/documents/generate");
        let body = request.clone();
        self.http
            .run(move |http| {
                let mut request = http.agent.post(&url);
                if let Some(auth) = http.auth_header(&url) {
                    request = request.header("Authorization", &auth);
                }
                let response = request.send_json(&body).map_err(|e| http.transport(e))?;
                match response.status().as_u16() {
                    status if is_success(status) => http.read_json(response),
                    400 => Err(ClientError::BadRequest {
                        service: http.service,
                        message: http.read_text(response),
                    }),
                    status => Err(ClientError::Status {
                        service: http.service,
                        status,
                    }),
                }
            })
            .await
    }
}

/// Downloads generated documents. Relative locations resolve against the
/// document generator's base URL.
pub struct HttpDocumentDownloader {
    http: HttpClient,
}

impl HttpDocumentDownloader {
    pub fn new(config: &HttpClientConfig) -> Self {
        HttpDocumentDownloader {
            http: HttpClient::new(DOCUMENT_DOWNLOAD_SERVICE, config),
        }
    }
}

#[async_trait]
impl DocumentDownloader for HttpDocumentDownloader {
    async fn download(&self, location: &str) -> Result<Vec<u8>, ClientError> {
        let url = self.http.url(location);
        let what = location.to_string();
        self.http
            .run(move |http| {
                let mut request = http.agent.get(&url);
                if let Some(auth) = http.auth_header(&url) {
                    request = request.header("Authorization", &auth);
                }
                let response = request.call().map_err(|e| http.transport(e))?;
                match response.status().as_u16() {
                    status if is_success(status) => response
                        .into_body()
                        .read_to_vec()
                        .map_err(|e| ClientError::Decode {
                            service: http.service,
                            message: e.to_string(),
                        }),
                    404 => Err(ClientError::NotFound {
                        service: http.service,
                        what,
                    }),
                    status => Err(ClientError::Status {
                        service: http.service,
                        status,
                    }),
                }
            })
            .await
    }
}

// ──────────────────────────────────────────────
// Document validator
// ──────────────────────────────────────────────

pub struct HttpDocumentValidator {
    http: HttpClient,
}

impl HttpDocumentValidator {
    pub fn new(config: &HttpClientConfig) -> Self {
        HttpDocumentValidator {
            http: HttpClient::new(DOCUMENT_VALIDATOR_SERVICE, config),
        }
    }
}

#[async_trait]
impl DocumentValidator for HttpDocumentValidator {
    async fn validate(&self, document: Vec<u8>, location: &str) -> Result<ValidationVerdict, ClientError> {
        let url = self.http.url("/validate");
        let boundary = format!("accounts-{:016x}", rand::random::<u64>());
        let body = multipart_body(&boundary, &document, location);
        self.http
            .run(move |http| {
                let mut request = http
                    .agent
                    .post(&url)
                    .header("Content-Type", &format!("multipart/form-data; boundary={}", boundary));
                if let Some(auth) = http.auth_header(&url) {
                    request = request.header("Authorization", &auth);
                }
                let response = request.send(&body[..]).map_err(|e| http.transport(e))?;
                match response.status().as_u16() {
                    status if is_success(status) => http.read_json(response),
                    400 => Err(ClientError::BadRequest {
                        service: http.service,
                        message: http.read_text(response),
                    }),
                    status => Err(ClientError::Status {
                        service: http.service,
                        status,
                    }),
                }
            })
            .await
    }
}

/// A `multipart/form-data` body with the document as `file` and its
/// location as a plain field.
fn multipart_body(boundary: &str, document: &[u8], location: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(document.len() + 512);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"accounts.xhtml\"\r\n\
          Content-Type: application/xhtml+xml\r\n\r\n",
    );
    body.extend_from_slice(document);
    body.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"location\"\r\n\r\n");
    body.extend_from_slice(location.as_bytes());
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> HttpClientConfig {
        HttpClientConfig {
            base_url: base_url.to_string(),
            api_key: Some("secret".to_string()),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn url_joins_paths_and_keeps_absolute_locations() {
        let http = HttpClient::new(DOCUMENT_DOWNLOAD_SERVICE, &config("http://docs.local/"));
        assert_eq!(http.url("/a/b"), "http://docs.local/a/b");
        assert_eq!(http.url("a/b"), "http://docs.local/a/b");
        assert_eq!(http.url("https://s3.local/doc.xhtml"), "https://s3.local/doc.xhtml");
    }

    #[test]
    fn auth_header_uses_bearer_scheme() {
        let http = HttpClient::new(TRANSACTIONS_SERVICE, &config("http://tx.local"));
        assert_eq!(
            http.auth_header("http://tx.local/transactions/1").as_deref(),
            Some("Bearer secret")
        );
    }

    #[test]
    fn api_key_stays_on_the_service_origin() {
        let http = HttpClient::new(DOCUMENT_DOWNLOAD_SERVICE, &config("http://docs.local:8080"));
        let own = http.url("/accounts/abc.xhtml");
        assert_eq!(http.auth_header(&own).as_deref(), Some("Bearer secret"));

        for foreign in [
            "https://s3.local/accounts/abc.xhtml",
            "http://docs.local/accounts/abc.xhtml",
            "https://docs.local:8080/accounts/abc.xhtml",
            "http://docs.local.attacker.example:8080/x",
        ] {
            let url = http.url(foreign);
            assert!(http.auth_header(&url).is_none(), "{foreign}");
        }
    }

    #[test]
    fn multipart_body_carries_both_parts() {
        let body = multipart_body("b0undary", b"<html/>", "s3://bucket/doc");
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--b0undary\r\n"));
        assert!(text.contains("name=\"file\"; filename=\"accounts.xhtml\""));
        assert!(text.contains("<html/>\r\n--b0undary\r\n"));
        assert!(text.contains("name=\"location\"\r\n\r\ns3://bucket/doc"));
        assert!(text.ends_with("--b0undary--\r\n"));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        let client = HttpCompanyProfileClient::new(&config("http://127.0.0.1:9"));
        let err = client.get("01234567").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { service: "company-profile", .. }));
    }
}
