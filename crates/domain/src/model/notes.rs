//! Notes to the accounts.

use serde::{Deserialize, Serialize};

use crate::errors::Errors;
use crate::validation::{
    check_net_total, check_total, non_negative, optional_text, require_text, within_range, Validatable,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountingPolicies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis_of_measurement_and_preparation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangible_fixed_assets_depreciation_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intangible_fixed_assets_amortisation_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation_information_and_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_accounting_policy: Option<String>,
}

impl Validatable for AccountingPolicies {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        require_text(
            &mut errors,
            self.basis_of_measurement_and_preparation.as_deref(),
            &format!("{}.basis_of_measurement_and_preparation", root),
        );
        for (name, value) in [
            ("turnover_policy", &self.turnover_policy),
            (
                "tangible_fixed_assets_depreciation_policy",
                &self.tangible_fixed_assets_depreciation_policy,
            ),
            (
                "intangible_fixed_assets_amortisation_policy",
                &self.intangible_fixed_assets_amortisation_policy,
            ),
            (
                "valuation_information_and_policy",
                &self.valuation_information_and_policy,
            ),
            ("other_accounting_policy", &self.other_accounting_policy),
        ] {
            optional_text(&mut errors, value.as_deref(), &format!("{}.{}", root, name));
        }
        errors
    }
}

// ── Stocks ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StocksNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period: Option<StocksPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_period: Option<StocksPeriod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StocksPeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stocks: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payments_on_account: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl Validatable for StocksNote {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        for (name, period) in [
            ("current_period", &self.current_period),
            ("previous_period", &self.previous_period),
        ] {
            if let Some(p) = period {
                let path = format!("{}.{}", root, name);
                non_negative(&mut errors, p.stocks, &format!("{}.stocks", path));
                non_negative(
                    &mut errors,
                    p.payments_on_account,
                    &format!("{}.payments_on_account", path),
                );
                check_total(
                    &mut errors,
                    &[p.stocks, p.payments_on_account],
                    p.total,
                    &format!("{}.total", path),
                );
            }
        }
        errors
    }
}

// ── Debtors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtorsNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period: Option<DebtorsPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_period: Option<DebtorsPeriod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtorsPeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_debtors: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayments_and_accrued_income: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_debtors: Option<i64>,
    /// Shown for information; already included in the other lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than_one_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl Validatable for DebtorsNote {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        for (name, period) in [
            ("current_period", &self.current_period),
            ("previous_period", &self.previous_period),
        ] {
            if let Some(p) = period {
                let path = format!("{}.{}", root, name);
                optional_text(&mut errors, p.details.as_deref(), &format!("{}.details", path));
                non_negative(
                    &mut errors,
                    p.greater_than_one_year,
                    &format!("{}.greater_than_one_year", path),
                );
                check_total(
                    &mut errors,
                    &[p.trade_debtors, p.prepayments_and_accrued_income, p.other_debtors],
                    p.total,
                    &format!("{}.total", path),
                );
            }
        }
        errors
    }
}

// ── Creditors ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditorsNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period: Option<CreditorsPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_period: Option<CreditorsPeriod>,
}

/// Shared by the within-one-year and after-one-year notes; the latter
/// leaves the short-term lines empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditorsPeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_loans_and_overdrafts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finance_leases_and_hire_purchase_contracts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_creditors: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxation_and_social_security: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accruals_and_deferred_income: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_creditors: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl Validatable for CreditorsNote {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        for (name, period) in [
            ("current_period", &self.current_period),
            ("previous_period", &self.previous_period),
        ] {
            if let Some(p) = period {
                let path = format!("{}.{}", root, name);
                optional_text(&mut errors, p.details.as_deref(), &format!("{}.details", path));
                check_total(
                    &mut errors,
                    &[
                        p.bank_loans_and_overdrafts,
                        p.finance_leases_and_hire_purchase_contracts,
                        p.trade_creditors,
                        p.taxation_and_social_security,
                        p.accruals_and_deferred_income,
                        p.other_creditors,
                    ],
                    p.total,
                    &format!("{}.total", path),
                );
            }
        }
        errors
    }
}

// ── Tangible / intangible fixed assets ───────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedAssetNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<FixedAssetTotals>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedAssetTotals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_at_period_start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additions: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposals: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_at_period_end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation_at_period_end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_book_value_at_end_of_current_period: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_book_value_at_end_of_previous_period: Option<i64>,
}

impl Validatable for FixedAssetNote {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        optional_text(
            &mut errors,
            self.additional_information.as_deref(),
            &format!("{}.additional_information", root),
        );
        if let Some(t) = &self.total {
            let path = format!("{}.total", root);
            non_negative(&mut errors, t.additions, &format!("{}.additions", path));
            non_negative(&mut errors, t.disposals, &format!("{}.disposals", path));
            if t.cost_at_period_start.is_some() || t.additions.is_some() || t.disposals.is_some() {
                check_net_total(
                    &mut errors,
                    &[t.cost_at_period_start, t.additions],
                    &[t.disposals],
                    t.cost_at_period_end,
                    &format!("{}.cost_at_period_end", path),
                );
            }
            if t.cost_at_period_end.is_some() || t.depreciation_at_period_end.is_some() {
                check_net_total(
                    &mut errors,
                    &[t.cost_at_period_end],
                    &[t.depreciation_at_period_end],
                    t.net_book_value_at_end_of_current_period,
                    &format!("{}.net_book_value_at_end_of_current_period", path),
                );
            }
        }
        errors
    }
}

// ── Text-only notes ──────────────────────────────────────────────────────────

/// Notes whose whole content is a free-text answer: fixed and current asset
/// investments, off-balance-sheet arrangements, financial commitments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailsNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Validatable for DetailsNote {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        require_text(&mut errors, self.details.as_deref(), &format!("{}.details", root));
        errors
    }
}

// ── Employees ────────────────────────────────────────────────────────────────

pub const MAX_EMPLOYEES: i64 = 99_999;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeesNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period: Option<EmployeesPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_period: Option<EmployeesPeriod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeesPeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_number_of_employees: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Validatable for EmployeesNote {
    fn validate(&self, root: &str) -> Errors {
        let mut errors = Errors::new();
        for (name, period) in [
            ("current_period", &self.current_period),
            ("previous_period", &self.previous_period),
        ] {
            if let Some(p) = period {
                let path = format!("{}.{}", root, name);
                within_range(
                    &mut errors,
                    p.average_number_of_employees,
                    0,
                    MAX_EMPLOYEES,
                    &format!("{}.average_number_of_employees", path),
                );
                optional_text(&mut errors, p.details.as_deref(), &format!("{}.details", path));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::codes;

    #[test]
    fn accounting_policies_require_basis_of_preparation() {
        let errors = AccountingPolicies::default().validate("$.accounting_policies");
        assert!(errors.contains(
            codes::MANDATORY_ELEMENT_MISSING,
            "$.accounting_policies.basis_of_measurement_and_preparation"
        ));
    }

    #[test]
    fn stocks_total_checked_per_period() {
        let note = StocksNote {
            current_period: Some(StocksPeriod {
                stocks: Some(5),
                payments_on_account: Some(5),
                total: Some(10),
            }),
            previous_period: Some(StocksPeriod {
                stocks: Some(5),
                payments_on_account: None,
                total: Some(6),
            }),
        };
        let errors = note.validate("$.stocks");
        assert_eq!(errors.len(), 1);
        assert!(errors.contains(codes::INCORRECT_TOTAL, "$.stocks.previous_period.total"));
    }

    #[test]
    fn debtors_total_excludes_amounts_over_one_year() {
        let note = DebtorsNote {
            current_period: Some(DebtorsPeriod {
                details: None,
                trade_debtors: Some(10),
                prepayments_and_accrued_income: Some(5),
                other_debtors: None,
                greater_than_one_year: Some(3),
                total: Some(15),
            }),
            previous_period: None,
        };
        assert!(note.validate("$.debtors").is_empty());
    }

    #[test]
    fn fixed_asset_net_book_value_reconciles() {
        let note = FixedAssetNote {
            additional_information: None,
            total: Some(FixedAssetTotals {
                cost_at_period_start: Some(100),
                additions: Some(20),
                disposals: Some(10),
                cost_at_period_end: Some(110),
                depreciation_at_period_end: Some(30),
                net_book_value_at_end_of_current_period: Some(70),
                net_book_value_at_end_of_previous_period: None,
            }),
        };
        let errors = note.validate("$.tangible_assets");
        assert!(errors.contains(
            codes::INCORRECT_TOTAL,
            "$.tangible_assets.total.net_book_value_at_end_of_current_period"
        ));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn employees_bounded() {
        let note = EmployeesNote {
            current_period: Some(EmployeesPeriod {
                average_number_of_employees: Some(MAX_EMPLOYEES + 1),
                details: None,
            }),
            previous_period: None,
        };
        let errors = note.validate("$.employees");
        assert!(errors.contains(
            codes::VALUE_OUTSIDE_RANGE,
            "$.employees.current_period.average_number_of_employees"
        ));
    }

    #[test]
    fn details_note_requires_details() {
        let errors = DetailsNote::default().validate("$.financial_commitments");
        assert!(errors.contains(
            codes::MANDATORY_ELEMENT_MISSING,
            "$.financial_commitments.details"
        ));
    }
}
