//! Typed bodies of every resource in the catalogue.

mod account;
mod cic;
mod loans;
mod notes;
mod period;
mod reports;
mod statements;

pub use account::{CompanyAccount, NextAccounts, SmallFull};
pub use cic::{CicReport, CicStatements, ReportingPeriod};
pub use loans::{LoanBreakdown, Loan, LoansToDirectors, RelatedPartyTransaction, RelatedPartyTransactions};
pub use notes::{
    AccountingPolicies, CreditorsNote, CreditorsPeriod, DebtorsNote, DebtorsPeriod, DetailsNote,
    EmployeesNote, EmployeesPeriod, FixedAssetNote, FixedAssetTotals, StocksNote, StocksPeriod,
    MAX_EMPLOYEES,
};
pub use period::{
    BalanceSheet, BalanceSheetItem, CapitalAndReserves, CurrentAssets, FixedAssets,
    OtherLiabilitiesOrAssets, Period,
};
pub use reports::{Approval, Director, DirectorsReport, DirectorsReportStatements, Secretary};
pub use statements::Statements;
