//! Current and previous period resources and the balance sheet they carry.
//!
//! Figures are whole pounds. Sub-totals are checked against their
//! components; the closure validators compare notes against these figures.

use serde::{Deserialize, Serialize};

use crate::errors::{codes, Errors};
use crate::validation::{check_net_total, check_total, non_negative, Validatable};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_sheet: Option<BalanceSheet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub called_up_share_capital_not_paid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_assets: Option<FixedAssets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_assets: Option<CurrentAssets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_liabilities_or_assets: Option<OtherLiabilitiesOrAssets>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital_and_reserves: Option<CapitalAndReserves>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedAssets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangible: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intangible: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investments: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentAssets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stocks: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debtors: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_at_bank_and_in_hand: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investments: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherLiabilitiesOrAssets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayments_and_accrued_income: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creditors_due_within_one_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_current_assets: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_assets_less_current_liabilities: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creditors_after_one_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provision_for_liabilities: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accruals_and_deferred_income: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_net_assets: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalAndReserves {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub called_up_share_capital: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_premium_account: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_reserves: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_and_loss_account: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_shareholders_funds: Option<i64>,
}

impl BalanceSheet {
    /// Balance-sheet figures that notes are reconciled against.
    pub fn figure(&self, item: BalanceSheetItem) -> Option<i64> {
        let fixed = self.fixed_assets.as_ref();
        let current = self.current_assets.as_ref();
        let other = self.other_liabilities_or_assets.as_ref();
        match item {
            BalanceSheetItem::TangibleAssets => fixed?.tangible,
            BalanceSheetItem::IntangibleAssets => fixed?.intangible,
            BalanceSheetItem::FixedAssetsInvestments => fixed?.investments,
            BalanceSheetItem::Stocks => current?.stocks,
            BalanceSheetItem::Debtors => current?.debtors,
            BalanceSheetItem::CurrentAssetsInvestments => current?.investments,
            BalanceSheetItem::CreditorsDueWithinOneYear => other?.creditors_due_within_one_year,
            BalanceSheetItem::CreditorsAfterOneYear => other?.creditors_after_one_year,
        }
    }

    fn validate_into(&self, errors: &mut Errors, base: &str) {
        non_negative(
            errors,
            self.called_up_share_capital_not_paid,
            &format!("{}.called_up_share_capital_not_paid", base),
        );

        let mut fixed_total = None;
        if let Some(fixed) = &self.fixed_assets {
            let path = format!("{}.fixed_assets", base);
            non_negative(errors, fixed.tangible, &format!("{}.tangible", path));
            non_negative(errors, fixed.intangible, &format!("{}.intangible", path));
            non_negative(errors, fixed.investments, &format!("{}.investments", path));
            check_total(
                errors,
                &[fixed.tangible, fixed.intangible, fixed.investments],
                fixed.total,
                &format!("{}.total", path),
            );
            fixed_total = fixed.total;
        }

        let mut current_total = None;
        if let Some(current) = &self.current_assets {
            let path = format!("{}.current_assets", base);
            non_negative(errors, current.stocks, &format!("{}.stocks", path));
            non_negative(errors, current.debtors, &format!("{}.debtors", path));
            non_negative(errors, current.investments, &format!("{}.investments", path));
            check_total(
                errors,
                &[
                    current.stocks,
                    current.debtors,
                    current.cash_at_bank_and_in_hand,
                    current.investments,
                ],
                current.total,
                &format!("{}.total", path),
            );
            current_total = current.total;
        }

        let mut net_assets = None;
        if let Some(other) = &self.other_liabilities_or_assets {
            let path = format!("{}.other_liabilities_or_assets", base);
            if other.net_current_assets.is_some() {
                check_net_total(
                    errors,
                    &[current_total, other.prepayments_and_accrued_income],
                    &[other.creditors_due_within_one_year],
                    other.net_current_assets,
                    &format!("{}.net_current_assets", path),
                );
            }
            if other.total_assets_less_current_liabilities.is_some() {
                check_total(
                    errors,
                    &[
                        fixed_total,
                        other.net_current_assets,
                        self.called_up_share_capital_not_paid,
                    ],
                    other.total_assets_less_current_liabilities,
                    &format!("{}.total_assets_less_current_liabilities", path),
                );
            }
            if other.total_net_assets.is_some() {
                check_net_total(
                    errors,
                    &[other.total_assets_less_current_liabilities],
                    &[
                        other.creditors_after_one_year,
                        other.provision_for_liabilities,
                        other.accruals_and_deferred_income,
                    ],
                    other.total_net_assets,
                    &format!("{}.total_net_assets", path),
                );
            }
            net_assets = other.total_net_assets;
        }

        if let Some(capital) = &self.capital_and_reserves {
            let path = format!("{}.capital_and_reserves", base);
            check_total(
                errors,
                &[
                    capital.called_up_share_capital,
                    capital.share_premium_account,
                    capital.other_reserves,
                    capital.profit_and_loss_account,
                ],
                capital.total_shareholders_funds,
                &format!("{}.total_shareholders_funds", path),
            );
            if let (Some(funds), Some(net)) = (capital.total_shareholders_funds, net_assets) {
                if funds != net {
                    errors.add(
                        codes::INCORRECT_TOTAL,
                        format!("{}.total_shareholders_funds", path),
                    );
                }
            }
        }
    }
}

/// Balance-sheet lines that have a supporting note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceSheetItem {
    TangibleAssets,
    IntangibleAssets,
    FixedAssetsInvestments,
    Stocks,
    Debtors,
    CurrentAssetsInvestments,
    CreditorsDueWithinOneYear,
    CreditorsAfterOneYear,
}

impl Validatable for Period {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        if let Some(balance_sheet) = &self.balance_sheet {
            balance_sheet.validate_into(&mut errors, &format!("{}.balance_sheet", root));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> BalanceSheet {
        BalanceSheet {
            called_up_share_capital_not_paid: None,
            fixed_assets: Some(FixedAssets {
                tangible: Some(100),
                intangible: None,
                investments: Some(50),
                total: Some(150),
            }),
            current_assets: Some(CurrentAssets {
                stocks: Some(10),
                debtors: Some(20),
                cash_at_bank_and_in_hand: Some(70),
                investments: None,
                total: Some(100),
            }),
            other_liabilities_or_assets: Some(OtherLiabilitiesOrAssets {
                prepayments_and_accrued_income: None,
                creditors_due_within_one_year: Some(40),
                net_current_assets: Some(60),
                total_assets_less_current_liabilities: Some(210),
                creditors_after_one_year: Some(10),
                provision_for_liabilities: None,
                accruals_and_deferred_income: None,
                total_net_assets: Some(200),
            }),
            capital_and_reserves: Some(CapitalAndReserves {
                called_up_share_capital: Some(1),
                share_premium_account: None,
                other_reserves: None,
                profit_and_loss_account: Some(199),
                total_shareholders_funds: Some(200),
            }),
        }
    }

    #[test]
    fn consistent_balance_sheet_is_valid() {
        let period = Period {
            balance_sheet: Some(sheet()),
        };
        let errors = period.validate("$.current_period");
        assert!(errors.is_empty(), "{errors}");
    }

    #[test]
    fn wrong_current_assets_total_is_reported_under_resource_root() {
        let mut bs = sheet();
        bs.current_assets.as_mut().unwrap().total = Some(99);
        let period = Period {
            balance_sheet: Some(bs),
        };
        let errors = period.validate("$.previous_period");
        assert!(errors.contains(
            codes::INCORRECT_TOTAL,
            "$.previous_period.balance_sheet.current_assets.total"
        ));
    }

    #[test]
    fn shareholders_funds_must_match_net_assets() {
        let mut bs = sheet();
        let capital = bs.capital_and_reserves.as_mut().unwrap();
        capital.profit_and_loss_account = Some(198);
        capital.total_shareholders_funds = Some(199);
        let errors = Period {
            balance_sheet: Some(bs),
        }
        .validate("$.current_period");
        assert!(errors.contains(
            codes::INCORRECT_TOTAL,
            "$.current_period.balance_sheet.capital_and_reserves.total_shareholders_funds"
        ));
    }

    #[test]
    fn figure_reads_note_backed_lines() {
        let bs = sheet();
        assert_eq!(bs.figure(BalanceSheetItem::Stocks), Some(10));
        assert_eq!(bs.figure(BalanceSheetItem::IntangibleAssets), None);
        assert_eq!(bs.figure(BalanceSheetItem::CreditorsAfterOneYear), Some(10));
    }

    #[test]
    fn period_without_balance_sheet_validates() {
        assert!(Period::default().validate("$.current_period").is_empty());
    }

    #[test]
    fn extreme_figures_are_incorrect_totals_not_overflows() {
        let mut bs = sheet();
        let current = bs.current_assets.as_mut().unwrap();
        current.stocks = Some(i64::MAX);
        current.debtors = Some(1);
        current.cash_at_bank_and_in_hand = None;
        // What a wrapping sum of the components would produce.
        current.total = Some(i64::MIN);
        let errors = Period {
            balance_sheet: Some(bs),
        }
        .validate("$.current_period");
        assert!(errors.contains(
            codes::INCORRECT_TOTAL,
            "$.current_period.balance_sheet.current_assets.total"
        ));
    }

    #[test]
    fn most_negative_creditors_figure_is_an_incorrect_total() {
        let mut bs = sheet();
        let other = bs.other_liabilities_or_assets.as_mut().unwrap();
        other.creditors_due_within_one_year = Some(i64::MIN);
        other.net_current_assets = Some(0);
        let errors = Period {
            balance_sheet: Some(bs),
        }
        .validate("$.current_period");
        assert!(errors.contains(
            codes::INCORRECT_TOTAL,
            "$.current_period.balance_sheet.other_liabilities_or_assets.net_current_assets"
        ));
    }
}
