//! Filing generation for a closeable company account.
//!
//! Linear stages, single attempt each:
//! determine type → generate document → check the response →
//! (optionally) download and externally validate → build the filing.
//! Any failure ends the run with no filing; the reason is logged, never
//! returned.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use accounts_domain::catalogue::{COMPANY_ACCOUNTS_COLLECTION, SMALL_FULL};
use accounts_domain::{AccountType, Filing, FilingData, FilingLink, Transaction};

use crate::clients::{
    ClientError, DocumentDownloader, DocumentGenerator, DocumentGeneratorRequest, DocumentValidator,
};
use crate::SharedStore;

pub const DOCUMENT_MIME_TYPE: &str = "application/xhtml+xml";
pub const PERIOD_END_ON: &str = "period_end_on";

pub struct FilingOrchestrator {
    store: SharedStore,
    generator: Arc<dyn DocumentGenerator>,
    downloader: Arc<dyn DocumentDownloader>,
    /// `None` when external document validation is switched off.
    validator: Option<Arc<dyn DocumentValidator>>,
}

/// Fields of a generator response the filing cannot do without.
struct GeneratedDocument {
    description: String,
    description_identifier: Option<String>,
    description_values: BTreeMap<String, String>,
    period_end_on: String,
    location: String,
}

impl FilingOrchestrator {
    pub fn new(
        store: SharedStore,
        generator: Arc<dyn DocumentGenerator>,
        downloader: Arc<dyn DocumentDownloader>,
        validator: Option<Arc<dyn DocumentValidator>>,
    ) -> Self {
        FilingOrchestrator {
            store,
            generator,
            downloader,
            validator,
        }
    }

    pub async fn generate_filing(&self, transaction: &Transaction, company_account_id: &str) -> Option<Filing> {
        let (account_type, self_link) = self.determine_type(company_account_id).await?;

        let request = DocumentGeneratorRequest {
            resource_uri: self_link,
            mime_type: DOCUMENT_MIME_TYPE.to_string(),
            document_type: account_type.as_str().to_string(),
        };
        let response = match self.generator.generate(&request).await {
            Ok(response) => response,
            Err(e @ ClientError::BadRequest { .. }) => {
                warn!(company_account_id, error = %e, "document generator rejected request");
                return None;
            }
            Err(e) => {
                warn!(company_account_id, error = %e, "document generation failed");
                return None;
            }
        };

        let Some(document) = Self::check_response(response) else {
            warn!(company_account_id, "document generator response incomplete");
            return None;
        };

        if let Some(validator) = &self.validator {
            let bytes = match self.downloader.download(&document.location).await {
                Ok(bytes) if !bytes.is_empty() => bytes,
                Ok(_) => {
                    warn!(company_account_id, location = %document.location, "downloaded document is empty");
                    return None;
                }
                Err(e) => {
                    warn!(company_account_id, error = %e, "document download failed");
                    return None;
                }
            };
            match validator.validate(bytes, &document.location).await {
                Ok(verdict) if verdict.is_ok() => {}
                Ok(verdict) => {
                    warn!(company_account_id, status = %verdict.validation_status, "document failed external validation");
                    return None;
                }
                Err(e) => {
                    warn!(company_account_id, error = %e, "external document validation failed");
                    return None;
                }
            }
        }

        info!(
            company_account_id,
            transaction_id = %transaction.id,
            kind = account_type.filing_kind(),
            "filing generated"
        );
        Some(Filing {
            company_number: transaction.company_number.clone(),
            description_identifier: document
                .description_identifier
                .unwrap_or_else(|| account_type.as_str().to_string()),
            kind: account_type.filing_kind().to_string(),
            description_values: document.description_values,
            description: document.description,
            data: FilingData {
                period_end_on: document.period_end_on,
                links: vec![FilingLink::accounts(document.location)],
            },
        })
    }

    /// A company account with a small-full container files small-full
    /// accounts; nothing else is supported.
    async fn determine_type(&self, company_account_id: &str) -> Option<(AccountType, String)> {
        let document = match self.store.find(COMPANY_ACCOUNTS_COLLECTION, company_account_id).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                warn!(company_account_id, "company account not found");
                return None;
            }
            Err(e) => {
                warn!(company_account_id, error = %e, "company account lookup failed");
                return None;
            }
        };
        let Some(self_link) = document.links().self_link().map(str::to_string) else {
            warn!(company_account_id, "company account has no self link");
            return None;
        };
        if document.links().contains(SMALL_FULL.link_name) {
            Some((AccountType::SmallFull, self_link))
        } else {
            warn!(company_account_id, "unknown account type");
            None
        }
    }

    fn check_response(response: crate::clients::DocumentGeneratorResponse) -> Option<GeneratedDocument> {
        let description = response.description?;
        let location = response.links.and_then(|l| l.location)?;
        let description_values = response.description_values?;
        let period_end_on = description_values.get(PERIOD_END_ON)?.clone();
        Some(GeneratedDocument {
            description,
            description_identifier: response.description_identifier,
            description_values,
            period_end_on,
            location,
        })
    }
}
