//! The resource catalogue.
//!
//! One descriptor per resource type. Resource names seed document keys, so
//! they must stay unique across the catalogue even where two resources share
//! a link name under different parents (the three approvals, for instance).

use crate::resource::{Multiplicity, ParentKind, ResourceDescriptor};

/// Collection holding company-account root documents.
pub const COMPANY_ACCOUNTS_COLLECTION: &str = "company_accounts";

/// `kind` of the company-account root.
pub const COMPANY_ACCOUNTS_KIND: &str = "company-accounts#company-accounts";

pub static SMALL_FULL: ResourceDescriptor = ResourceDescriptor {
    name: "small-full",
    kind: "smallfull#smallfull",
    collection: "small_full",
    path: "small-full",
    link_name: "small_full",
    parent: ParentKind::CompanyAccount,
    multiplicity: Multiplicity::Single,
};

pub static CIC_REPORT: ResourceDescriptor = ResourceDescriptor {
    name: "cic-report",
    kind: "cic-report#cic-report",
    collection: "cic_report",
    path: "cic-report",
    link_name: "cic_report",
    parent: ParentKind::CompanyAccount,
    multiplicity: Multiplicity::Single,
};

pub static CURRENT_PERIOD: ResourceDescriptor = ResourceDescriptor {
    name: "current-period",
    kind: "smallfull#currentPeriod",
    collection: "current_period",
    path: "small-full/current-period",
    link_name: "current_period",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static PREVIOUS_PERIOD: ResourceDescriptor = ResourceDescriptor {
    name: "previous-period",
    kind: "smallfull#previousPeriod",
    collection: "previous_period",
    path: "small-full/previous-period",
    link_name: "previous_period",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static APPROVAL: ResourceDescriptor = ResourceDescriptor {
    name: "approval",
    kind: "smallfull#approval",
    collection: "approvals",
    path: "small-full/approval",
    link_name: "approval",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static STATEMENTS: ResourceDescriptor = ResourceDescriptor {
    name: "statements",
    kind: "smallfull#statements",
    collection: "statements",
    path: "small-full/statements",
    link_name: "statements",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static ACCOUNTING_POLICIES: ResourceDescriptor = ResourceDescriptor {
    name: "accounting-policies",
    kind: "smallfull#accountingPolicyNote",
    collection: "accounting_policies",
    path: "small-full/notes/accounting-policy",
    link_name: "accounting_policy_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static STOCKS: ResourceDescriptor = ResourceDescriptor {
    name: "stocks",
    kind: "smallfull#stocksNote",
    collection: "stocks",
    path: "small-full/notes/stocks",
    link_name: "stocks_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static DEBTORS: ResourceDescriptor = ResourceDescriptor {
    name: "debtors",
    kind: "smallfull#debtorsNote",
    collection: "debtors",
    path: "small-full/notes/debtors",
    link_name: "debtors_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static CREDITORS_WITHIN_ONE_YEAR: ResourceDescriptor = ResourceDescriptor {
    name: "creditors-within-one-year",
    kind: "smallfull#creditorsWithinOneYearNote",
    collection: "creditors_within_one_year",
    path: "small-full/notes/creditors-within-one-year",
    link_name: "creditors_within_one_year_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static CREDITORS_AFTER_ONE_YEAR: ResourceDescriptor = ResourceDescriptor {
    name: "creditors-after-one-year",
    kind: "smallfull#creditorsAfterMoreThanOneYearNote",
    collection: "creditors_after_one_year",
    path: "small-full/notes/creditors-after-more-than-one-year",
    link_name: "creditors_after_more_than_one_year_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static TANGIBLE_ASSETS: ResourceDescriptor = ResourceDescriptor {
    name: "tangible-assets",
    kind: "smallfull#tangibleAssetsNote",
    collection: "tangible_assets",
    path: "small-full/notes/tangible-assets",
    link_name: "tangible_assets_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static INTANGIBLE_ASSETS: ResourceDescriptor = ResourceDescriptor {
    name: "intangible-assets",
    kind: "smallfull#intangibleAssetsNote",
    collection: "intangible_assets",
    path: "small-full/notes/intangible-assets",
    link_name: "intangible_assets_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static FIXED_ASSETS_INVESTMENTS: ResourceDescriptor = ResourceDescriptor {
    name: "fixed-assets-investments",
    kind: "smallfull#fixedAssetsInvestmentsNote",
    collection: "fixed_assets_investments",
    path: "small-full/notes/fixed-assets-investments",
    link_name: "fixed_assets_investments_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static CURRENT_ASSETS_INVESTMENTS: ResourceDescriptor = ResourceDescriptor {
    name: "current-assets-investments",
    kind: "smallfull#currentAssetsInvestmentsNote",
    collection: "current_assets_investments",
    path: "small-full/notes/current-assets-investments",
    link_name: "current_assets_investments_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static EMPLOYEES: ResourceDescriptor = ResourceDescriptor {
    name: "employees",
    kind: "smallfull#employeesNote",
    collection: "employees",
    path: "small-full/notes/employees",
    link_name: "employees_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static OFF_BALANCE_SHEET_ARRANGEMENTS: ResourceDescriptor = ResourceDescriptor {
    name: "off-balance-sheet-arrangements",
    kind: "smallfull#offBalanceSheetArrangementsNote",
    collection: "off_balance_sheet_arrangements",
    path: "small-full/notes/off-balance-sheet-arrangements",
    link_name: "off_balance_sheet_arrangements_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static FINANCIAL_COMMITMENTS: ResourceDescriptor = ResourceDescriptor {
    name: "financial-commitments",
    kind: "smallfull#financialCommitmentsNote",
    collection: "financial_commitments",
    path: "small-full/notes/financial-commitments",
    link_name: "financial_commitments_note",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static DIRECTORS_REPORT: ResourceDescriptor = ResourceDescriptor {
    name: "directors-report",
    kind: "smallfull#directorsReport",
    collection: "directors_reports",
    path: "small-full/directors-report",
    link_name: "directors_report",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static LOANS_TO_DIRECTORS: ResourceDescriptor = ResourceDescriptor {
    name: "loans-to-directors",
    kind: "smallfull#loansToDirectors",
    collection: "loans_to_directors",
    path: "small-full/notes/loans-to-directors",
    link_name: "loans_to_directors",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static RELATED_PARTY_TRANSACTIONS: ResourceDescriptor = ResourceDescriptor {
    name: "related-party-transactions",
    kind: "smallfull#relatedPartyTransactions",
    collection: "related_party_transactions",
    path: "small-full/notes/related-party-transactions",
    link_name: "related_party_transactions",
    parent: ParentKind::SmallFull,
    multiplicity: Multiplicity::Single,
};

pub static SECRETARY: ResourceDescriptor = ResourceDescriptor {
    name: "secretary",
    kind: "directors-report#secretary",
    collection: "secretaries",
    path: "small-full/directors-report/secretary",
    link_name: "secretary",
    parent: ParentKind::DirectorsReport,
    multiplicity: Multiplicity::Single,
};

pub static DIRECTORS_REPORT_STATEMENTS: ResourceDescriptor = ResourceDescriptor {
    name: "directors-report-statements",
    kind: "directors-report#statements",
    collection: "directors_report_statements",
    path: "small-full/directors-report/statements",
    link_name: "statements",
    parent: ParentKind::DirectorsReport,
    multiplicity: Multiplicity::Single,
};

pub static DIRECTORS_REPORT_APPROVAL: ResourceDescriptor = ResourceDescriptor {
    name: "directors-report-approval",
    kind: "directors-report#approval",
    collection: "directors_report_approvals",
    path: "small-full/directors-report/approval",
    link_name: "approval",
    parent: ParentKind::DirectorsReport,
    multiplicity: Multiplicity::Single,
};

pub static CIC_STATEMENTS: ResourceDescriptor = ResourceDescriptor {
    name: "cic-statements",
    kind: "cic-report#statements",
    collection: "cic_statements",
    path: "cic-report/cic-statements",
    link_name: "statements",
    parent: ParentKind::CicReport,
    multiplicity: Multiplicity::Single,
};

pub static CIC_APPROVAL: ResourceDescriptor = ResourceDescriptor {
    name: "cic-approval",
    kind: "cic-report#approval",
    collection: "cic_approvals",
    path: "cic-report/cic-approval",
    link_name: "approval",
    parent: ParentKind::CicReport,
    multiplicity: Multiplicity::Single,
};

pub static DIRECTOR: ResourceDescriptor = ResourceDescriptor {
    name: "director",
    kind: "directors-report#director",
    collection: "directors",
    path: "small-full/directors-report/directors",
    link_name: "directors",
    parent: ParentKind::DirectorsReport,
    multiplicity: Multiplicity::Many,
};

pub static LOAN: ResourceDescriptor = ResourceDescriptor {
    name: "loan",
    kind: "loans-to-directors#loan",
    collection: "loans",
    path: "small-full/notes/loans-to-directors/loans",
    link_name: "loans",
    parent: ParentKind::LoansToDirectors,
    multiplicity: Multiplicity::Many,
};

pub static RELATED_PARTY_TRANSACTION: ResourceDescriptor = ResourceDescriptor {
    name: "related-party-transaction",
    kind: "related-party-transactions#transaction",
    collection: "related_party_transaction_entries",
    path: "small-full/notes/related-party-transactions/transactions",
    link_name: "transactions",
    parent: ParentKind::RelatedPartyTransactions,
    multiplicity: Multiplicity::Many,
};

/// Every descriptor, parents before their children.
pub static ALL: &[&ResourceDescriptor] = &[
    &SMALL_FULL,
    &CIC_REPORT,
    &CURRENT_PERIOD,
    &PREVIOUS_PERIOD,
    &APPROVAL,
    &STATEMENTS,
    &ACCOUNTING_POLICIES,
    &STOCKS,
    &DEBTORS,
    &CREDITORS_WITHIN_ONE_YEAR,
    &CREDITORS_AFTER_ONE_YEAR,
    &TANGIBLE_ASSETS,
    &INTANGIBLE_ASSETS,
    &FIXED_ASSETS_INVESTMENTS,
    &CURRENT_ASSETS_INVESTMENTS,
    &EMPLOYEES,
    &OFF_BALANCE_SHEET_ARRANGEMENTS,
    &FINANCIAL_COMMITMENTS,
    &DIRECTORS_REPORT,
    &LOANS_TO_DIRECTORS,
    &RELATED_PARTY_TRANSACTIONS,
    &SECRETARY,
    &DIRECTORS_REPORT_STATEMENTS,
    &DIRECTORS_REPORT_APPROVAL,
    &CIC_STATEMENTS,
    &CIC_APPROVAL,
    &DIRECTOR,
    &LOAN,
    &RELATED_PARTY_TRANSACTION,
];

/// Look up a descriptor by its URI path below the company-account root.
pub fn by_path(path: &str) -> Option<&'static ResourceDescriptor> {
    ALL.iter().copied().find(|d| d.path == path)
}

pub fn by_name(name: &str) -> Option<&'static ResourceDescriptor> {
    ALL.iter().copied().find(|d| d.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let names: HashSet<&str> = ALL.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn paths_and_collections_are_unique() {
        let paths: HashSet<&str> = ALL.iter().map(|d| d.path).collect();
        let collections: HashSet<&str> = ALL.iter().map(|d| d.collection).collect();
        assert_eq!(paths.len(), ALL.len());
        assert_eq!(collections.len(), ALL.len());
        assert!(!collections.contains(COMPANY_ACCOUNTS_COLLECTION));
    }

    #[test]
    fn link_names_are_unique_per_parent() {
        let pairs: HashSet<(ParentKind, &str)> =
            ALL.iter().map(|d| (d.parent, d.link_name)).collect();
        assert_eq!(pairs.len(), ALL.len());
    }

    #[test]
    fn every_child_path_extends_its_parent_path() {
        for d in ALL.iter() {
            if let Some(parent) = d.parent.descriptor() {
                assert!(
                    d.path.starts_with(parent.path),
                    "{} does not sit under {}",
                    d.path,
                    parent.path
                );
            }
        }
    }

    #[test]
    fn lookup_by_path() {
        assert_eq!(by_path("small-full/notes/stocks"), Some(&STOCKS));
        assert_eq!(by_path("small-full/notes/unknown"), None);
        assert_eq!(by_name("director"), Some(&DIRECTOR));
    }
}
