mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use accounts_domain::filing::SMALL_FULL_FILING_KIND;
use accounts_domain::TransactionStatus;
use accounts_service::clients::{ClientError, DocumentGeneratorResponse};
use accounts_service::FilingOrchestrator;

use common::{generated_document, transaction, Fixture, StubDownloader, StubGenerator, StubValidator, COMPANY_NUMBER};

fn orchestrator(
    fixture: &Fixture,
    generator: Arc<StubGenerator>,
    downloader: Arc<StubDownloader>,
    validator: Option<StubValidator>,
) -> FilingOrchestrator {
    FilingOrchestrator::new(
        fixture.store.clone(),
        generator,
        downloader,
        validator.map(|v| Arc::new(v) as Arc<dyn accounts_service::clients::DocumentValidator>),
    )
}

#[tokio::test]
async fn small_full_accounts_produce_a_filing() {
    let fixture = Fixture::with_small_full().await;
    let generator = Arc::new(StubGenerator::returning(generated_document()));
    let downloader = Arc::new(StubDownloader::with(b"<html/>"));
    let filings = orchestrator(&fixture, generator.clone(), downloader.clone(), Some(StubValidator::with("OK")));

    let filing = filings
        .generate_filing(&transaction(TransactionStatus::Closed), &fixture.company_account_id)
        .await
        .expect("filing");

    assert_eq!(filing.kind, SMALL_FULL_FILING_KIND);
    assert_eq!(filing.company_number, COMPANY_NUMBER);
    assert_eq!(filing.description_identifier, "small-full-accounts");
    assert_eq!(filing.data.period_end_on, "2023-12-31");
    assert_eq!(filing.data.links.len(), 1);
    assert_eq!(filing.data.links[0].relationship, "accounts");
    assert_eq!(filing.data.links[0].href, "s3://documents/accounts/abc.xhtml");
    assert_eq!(filing.description_values.get("period_end_on").map(String::as_str), Some("2023-12-31"));

    let requests = generator.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].document_type, "small-full");
    assert_eq!(requests[0].mime_type, "application/xhtml+xml");
    assert_eq!(
        requests[0].resource_uri,
        format!("/transactions/tx-100/company-accounts/{}", fixture.company_account_id)
    );
    assert_eq!(downloader.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn account_type_is_the_fallback_description_identifier() {
    let fixture = Fixture::with_small_full().await;
    let response = DocumentGeneratorResponse {
        description_identifier: None,
        ..generated_document()
    };
    let filings = orchestrator(
        &fixture,
        Arc::new(StubGenerator::returning(response)),
        Arc::new(StubDownloader::with(b"doc")),
        None,
    );
    let filing = filings
        .generate_filing(&transaction(TransactionStatus::Closed), &fixture.company_account_id)
        .await
        .expect("filing");
    assert_eq!(filing.description_identifier, "small-full");
}

#[tokio::test]
async fn disabled_validation_skips_download() {
    let fixture = Fixture::with_small_full().await;
    let downloader = Arc::new(StubDownloader::with(b""));
    let filings = orchestrator(
        &fixture,
        Arc::new(StubGenerator::returning(generated_document())),
        downloader.clone(),
        None,
    );
    let filing = filings
        .generate_filing(&transaction(TransactionStatus::Closed), &fixture.company_account_id)
        .await;
    assert!(filing.is_some());
    assert_eq!(downloader.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn no_small_full_means_no_filing() {
    let fixture = Fixture::bare().await;
    let generator = Arc::new(StubGenerator::returning(generated_document()));
    let filings = orchestrator(&fixture, generator.clone(), Arc::new(StubDownloader::with(b"doc")), None);
    let filing = filings
        .generate_filing(&transaction(TransactionStatus::Closed), &fixture.company_account_id)
        .await;
    assert!(filing.is_none());
    assert!(generator.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_period_end_means_no_filing() {
    let fixture = Fixture::with_small_full().await;
    let mut response = generated_document();
    response.description_values = Some(Default::default());
    let filings = orchestrator(
        &fixture,
        Arc::new(StubGenerator::returning(response)),
        Arc::new(StubDownloader::with(b"doc")),
        None,
    );
    let filing = filings
        .generate_filing(&transaction(TransactionStatus::Closed), &fixture.company_account_id)
        .await;
    assert!(filing.is_none());
}

#[tokio::test]
async fn missing_location_means_no_filing() {
    let fixture = Fixture::with_small_full().await;
    let response = DocumentGeneratorResponse {
        links: None,
        ..generated_document()
    };
    let filings = orchestrator(
        &fixture,
        Arc::new(StubGenerator::returning(response)),
        Arc::new(StubDownloader::with(b"doc")),
        None,
    );
    assert!(filings
        .generate_filing(&transaction(TransactionStatus::Closed), &fixture.company_account_id)
        .await
        .is_none());
}

#[tokio::test]
async fn rejected_document_means_no_filing() {
    let fixture = Fixture::with_small_full().await;
    let filings = orchestrator(
        &fixture,
        Arc::new(StubGenerator::returning(generated_document())),
        Arc::new(StubDownloader::with(b"doc")),
        Some(StubValidator::with("FAILED")),
    );
    assert!(filings
        .generate_filing(&transaction(TransactionStatus::Closed), &fixture.company_account_id)
        .await
        .is_none());
}

#[tokio::test]
async fn verdict_is_case_insensitive() {
    let fixture = Fixture::with_small_full().await;
    let filings = orchestrator(
        &fixture,
        Arc::new(StubGenerator::returning(generated_document())),
        Arc::new(StubDownloader::with(b"doc")),
        Some(StubValidator::with("ok")),
    );
    assert!(filings
        .generate_filing(&transaction(TransactionStatus::Closed), &fixture.company_account_id)
        .await
        .is_some());
}

#[tokio::test]
async fn empty_download_means_no_filing() {
    let fixture = Fixture::with_small_full().await;
    let filings = orchestrator(
        &fixture,
        Arc::new(StubGenerator::returning(generated_document())),
        Arc::new(StubDownloader::with(b"")),
        Some(StubValidator::with("OK")),
    );
    assert!(filings
        .generate_filing(&transaction(TransactionStatus::Closed), &fixture.company_account_id)
        .await
        .is_none());
}

#[tokio::test]
async fn generator_failure_means_no_filing() {
    let fixture = Fixture::with_small_full().await;
    for error in [
        ClientError::BadRequest {
            service: "document-generator",
            message: "unknown resource".to_string(),
        },
        ClientError::Status {
            service: "document-generator",
            status: 503,
        },
    ] {
        let filings = orchestrator(
            &fixture,
            Arc::new(StubGenerator::failing(error)),
            Arc::new(StubDownloader::with(b"doc")),
            None,
        );
        assert!(filings
            .generate_filing(&transaction(TransactionStatus::Closed), &fixture.company_account_id)
            .await
            .is_none());
    }
}
