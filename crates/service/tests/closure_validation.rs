mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use accounts_domain::catalogue;
use accounts_domain::errors::codes;
use accounts_domain::model::{
    AccountingPolicies, Approval, BalanceSheet, CicReport, CurrentAssets, Director, DirectorsReport,
    LoansToDirectors, Period, Statements, StocksNote, StocksPeriod,
};
use accounts_domain::{Errors, TransactionStatus};
use accounts_service::{ClosureChain, MemberService, ResourceService, ServiceError};
use accounts_storage::ResourceStore;

use common::{ctx, transaction, Fixture, StubProfiles};

fn balance_sheet(stocks: Option<i64>) -> BalanceSheet {
    let cash = 100 - stocks.unwrap_or(0);
    BalanceSheet {
        current_assets: Some(CurrentAssets {
            stocks,
            cash_at_bank_and_in_hand: Some(cash),
            total: Some(100),
            ..CurrentAssets::default()
        }),
        ..BalanceSheet::default()
    }
}

fn approval() -> Approval {
    Approval {
        name: Some("A. Director".to_string()),
        date: Some("2024-01-15".to_string()),
    }
}

async fn create<T>(fixture: &Fixture, descriptor: &'static accounts_domain::ResourceDescriptor, body: T)
where
    T: accounts_domain::Validatable + serde::Serialize + serde::de::DeserializeOwned + Send + Sync,
{
    let service: ResourceService<T> = fixture.service(descriptor);
    let outcome = service
        .create(&body, &fixture.company_account_id, &ctx())
        .await
        .unwrap();
    assert_eq!(outcome.label(), "created", "creating {}", descriptor.name);
}

/// Everything a first-year small-full filing needs, with the given stocks figure.
async fn closeable(stocks: Option<i64>) -> Fixture {
    let fixture = Fixture::with_small_full().await;
    create(
        &fixture,
        &catalogue::CURRENT_PERIOD,
        Period {
            balance_sheet: Some(balance_sheet(stocks)),
        },
    )
    .await;
    create(&fixture, &catalogue::APPROVAL, approval()).await;
    create(
        &fixture,
        &catalogue::STATEMENTS,
        Statements {
            has_agreed_to_legal_statements: Some(true),
            legal_statements: BTreeMap::new(),
        },
    )
    .await;
    create(
        &fixture,
        &catalogue::ACCOUNTING_POLICIES,
        AccountingPolicies {
            basis_of_measurement_and_preparation: Some("Historical cost".to_string()),
            ..AccountingPolicies::default()
        },
    )
    .await;
    fixture
}

fn stocks_note(total: Option<i64>) -> StocksNote {
    StocksNote {
        current_period: total.map(|t| StocksPeriod {
            stocks: Some(t),
            payments_on_account: None,
            total: Some(t),
        }),
        previous_period: None,
    }
}

async fn run(fixture: &Fixture, profiles: StubProfiles) -> Errors {
    let chain = ClosureChain::standard(fixture.store.clone(), Arc::new(profiles));
    chain
        .validate(&transaction(TransactionStatus::Open), &fixture.company_account_id)
        .await
        .unwrap()
}

#[tokio::test]
async fn missing_small_full_is_the_only_error() {
    let fixture = Fixture::bare().await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert_eq!(errors.len(), 1, "{errors}");
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.company_accounts.small_full"));
}

#[tokio::test]
async fn unknown_company_account_is_reported() {
    let fixture = Fixture::bare().await;
    let chain = ClosureChain::standard(fixture.store.clone(), Arc::new(StubProfiles::first_year()));
    let errors = chain
        .validate(&transaction(TransactionStatus::Open), "no-such-account")
        .await
        .unwrap();
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.company_accounts"));
}

#[tokio::test]
async fn complete_first_year_filing_has_no_errors() {
    let fixture = closeable(None).await;
    let profiles = StubProfiles::first_year();
    let errors = run(&fixture, profiles).await;
    assert!(errors.is_empty(), "{errors}");
}

#[tokio::test]
async fn profile_is_fetched_once_per_run() {
    let fixture = closeable(None).await;
    let profiles = Arc::new(StubProfiles::first_year());
    let chain = ClosureChain::standard(fixture.store.clone(), profiles.clone());
    chain
        .validate(&transaction(TransactionStatus::Open), &fixture.company_account_id)
        .await
        .unwrap();
    assert_eq!(profiles.calls(), 1);
}

#[tokio::test]
async fn empty_small_full_reports_each_mandatory_resource() {
    let fixture = Fixture::with_small_full().await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    for path in [
        "$.small_full.current_period",
        "$.small_full.approval",
        "$.small_full.statements",
        "$.small_full.accounting_policy_note",
    ] {
        assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, path), "{path}: {errors}");
    }
    assert!(!errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.small_full.previous_period"));
}

#[tokio::test]
async fn multi_year_filer_needs_previous_period() {
    let fixture = closeable(None).await;
    let errors = run(&fixture, StubProfiles::multi_year()).await;
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.small_full.previous_period"));
}

#[tokio::test]
async fn period_without_balance_sheet_is_incomplete() {
    let fixture = Fixture::with_small_full().await;
    create(&fixture, &catalogue::CURRENT_PERIOD, Period::default()).await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.current_period.balance_sheet"));
    assert!(!errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.small_full.current_period"));
}

#[tokio::test]
async fn missing_approval_is_the_single_error() {
    let fixture = closeable(None).await;
    let approvals: ResourceService<Approval> = fixture.service(&catalogue::APPROVAL);
    approvals
        .delete(&fixture.company_account_id, &ctx())
        .await
        .unwrap();

    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert_eq!(errors.len(), 1, "{errors}");
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.small_full.approval"));
}

#[tokio::test]
async fn profile_lookup_failure_is_a_data_access_error() {
    let fixture = closeable(None).await;
    let chain = ClosureChain::standard(fixture.store.clone(), Arc::new(StubProfiles::unavailable()));
    let result = chain
        .validate(&transaction(TransactionStatus::Open), &fixture.company_account_id)
        .await;
    match result {
        Err(ServiceError::Upstream { service, .. }) => assert_eq!(service, "company-profile"),
        other => panic!("expected an upstream error, got {:?}", other.map(|e| e.len())),
    }
}

#[tokio::test]
async fn unagreed_statements_are_invalid() {
    let fixture = Fixture::with_small_full().await;
    create(
        &fixture,
        &catalogue::STATEMENTS,
        Statements {
            has_agreed_to_legal_statements: Some(false),
            legal_statements: BTreeMap::new(),
        },
    )
    .await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(errors.contains(codes::INVALID_VALUE, "$.statements.has_agreed_to_legal_statements"));
}

#[tokio::test]
async fn stocks_figure_without_note_is_missing() {
    let fixture = closeable(Some(20)).await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert_eq!(errors.len(), 1, "{errors}");
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.small_full.stocks_note"));
}

#[tokio::test]
async fn zero_stocks_figure_needs_no_note() {
    let fixture = closeable(Some(0)).await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(errors.is_empty(), "{errors}");
}

#[tokio::test]
async fn matching_stocks_note_is_accepted() {
    let fixture = closeable(Some(20)).await;
    create(&fixture, &catalogue::STOCKS, stocks_note(Some(20))).await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(errors.is_empty(), "{errors}");
}

#[tokio::test]
async fn stocks_note_disagreeing_with_balance_sheet() {
    let fixture = closeable(Some(20)).await;
    create(&fixture, &catalogue::STOCKS, stocks_note(Some(15))).await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(errors.contains(
        codes::VALUE_NOT_EQUAL_TO_BALANCE_SHEET,
        "$.stocks.current_period.total"
    ));
}

#[tokio::test]
async fn stocks_note_without_period_total_is_missing_total() {
    let fixture = closeable(Some(20)).await;
    create(&fixture, &catalogue::STOCKS, stocks_note(None)).await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.stocks.current_period.total"));
    assert!(!errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.small_full.stocks_note"));
}

#[tokio::test]
async fn note_without_balance_sheet_figure_is_accepted() {
    let fixture = closeable(None).await;
    create(&fixture, &catalogue::STOCKS, stocks_note(Some(5))).await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(errors.is_empty(), "{errors}");
}

#[tokio::test]
async fn directors_report_needs_directors_statements_and_approval() {
    let fixture = closeable(None).await;
    create(&fixture, &catalogue::DIRECTORS_REPORT, DirectorsReport {}).await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.directors_report.directors"));
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.directors_report.statements"));
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.directors_report.approval"));
}

#[tokio::test]
async fn directors_report_with_a_director_is_partly_satisfied() {
    let fixture = closeable(None).await;
    create(&fixture, &catalogue::DIRECTORS_REPORT, DirectorsReport {}).await;
    let directors: MemberService<Director> =
        MemberService::new(&catalogue::DIRECTOR, fixture.store.clone(), fixture.links.clone());
    let director = Director {
        name: Some("A. Director".to_string()),
        appointment_date: None,
        resignation_date: None,
    };
    directors
        .create(&director, &fixture.company_account_id, &ctx())
        .await
        .unwrap();
    create(&fixture, &catalogue::DIRECTORS_REPORT_APPROVAL, approval()).await;

    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(!errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.directors_report.directors"));
    assert!(!errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.directors_report.approval"));
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.directors_report.statements"));
}

#[tokio::test]
async fn empty_loans_container_is_incomplete() {
    let fixture = closeable(None).await;
    create(&fixture, &catalogue::LOANS_TO_DIRECTORS, LoansToDirectors {}).await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.loans_to_directors.loans"));
}

#[tokio::test]
async fn community_interest_company_needs_cic_report() {
    let fixture = closeable(None).await;
    let errors = run(&fixture, StubProfiles::community_interest()).await;
    assert_eq!(errors.len(), 1, "{errors}");
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.company_accounts.cic_report"));

    create(&fixture, &catalogue::CIC_REPORT, CicReport {}).await;
    let errors = run(&fixture, StubProfiles::community_interest()).await;
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.cic_report.statements"));
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.cic_report.approval"));
}

#[tokio::test]
async fn dangling_link_is_reported_as_missing() {
    let fixture = closeable(None).await;
    let approval_service: ResourceService<Approval> = fixture.service(&catalogue::APPROVAL);
    let id = approval_service.resource_id(&fixture.company_account_id);
    fixture.store.delete(catalogue::APPROVAL.collection, &id).await.unwrap();

    let errors = run(&fixture, StubProfiles::first_year()).await;
    assert!(errors.contains(codes::MANDATORY_ELEMENT_MISSING, "$.small_full.approval"));
}

#[tokio::test]
async fn errors_follow_validator_order() {
    let fixture = Fixture::with_small_full().await;
    let errors = run(&fixture, StubProfiles::first_year()).await;
    let locations: Vec<&str> = errors.iter().map(|e| e.location.as_str()).collect();
    let period = locations.iter().position(|l| *l == "$.small_full.current_period");
    let policies = locations.iter().position(|l| *l == "$.small_full.accounting_policy_note");
    assert!(period < policies, "{locations:?}");
}
