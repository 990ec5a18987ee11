//! Notes reconciled against the balance sheet.
//!
//! For each balance-sheet line with a supporting note:
//! - no note and no (or a zero) figure is fine;
//! - a non-zero figure with no note, or a link to a note that is gone, is a
//!   missing element at the note's link path;
//! - a note whose period total is absent while the sheet has a figure is a
//!   missing element at the total;
//! - a note total that differs from the sheet is `value_not_equal_to_balance_sheet`;
//! - a note with no figure to compare against is accepted.
//!
//! Previous-period figures only count for multi-year filers.

use async_trait::async_trait;

use accounts_domain::catalogue::{
    CREDITORS_AFTER_ONE_YEAR, CREDITORS_WITHIN_ONE_YEAR, CURRENT_ASSETS_INVESTMENTS, CURRENT_PERIOD,
    DEBTORS, FIXED_ASSETS_INVESTMENTS, INTANGIBLE_ASSETS, PREVIOUS_PERIOD, STOCKS, TANGIBLE_ASSETS,
};
use accounts_domain::errors::codes;
use accounts_domain::model::{BalanceSheet, BalanceSheetItem, Period};
use accounts_domain::{Errors, ResourceDescriptor, ResourceDocument, ValidationError};

use super::{ClosureContext, ClosureValidator};
use crate::error::ServiceError;

enum NoteCheck {
    /// JSON pointers to the note's current and previous period totals.
    Totals {
        current: &'static str,
        previous: &'static str,
    },
    /// The note only has to say something.
    Details,
}

struct NoteRule {
    item: BalanceSheetItem,
    note: &'static ResourceDescriptor,
    check: NoteCheck,
}

const PERIOD_TOTALS: NoteCheck = NoteCheck::Totals {
    current: "/current_period/total",
    previous: "/previous_period/total",
};

const NET_BOOK_VALUES: NoteCheck = NoteCheck::Totals {
    current: "/total/net_book_value_at_end_of_current_period",
    previous: "/total/net_book_value_at_end_of_previous_period",
};

static RULES: [NoteRule; 8] = [
    NoteRule {
        item: BalanceSheetItem::TangibleAssets,
        note: &TANGIBLE_ASSETS,
        check: NET_BOOK_VALUES,
    },
    NoteRule {
        item: BalanceSheetItem::IntangibleAssets,
        note: &INTANGIBLE_ASSETS,
        check: NET_BOOK_VALUES,
    },
    NoteRule {
        item: BalanceSheetItem::FixedAssetsInvestments,
        note: &FIXED_ASSETS_INVESTMENTS,
        check: NoteCheck::Details,
    },
    NoteRule {
        item: BalanceSheetItem::Stocks,
        note: &STOCKS,
        check: PERIOD_TOTALS,
    },
    NoteRule {
        item: BalanceSheetItem::Debtors,
        note: &DEBTORS,
        check: PERIOD_TOTALS,
    },
    NoteRule {
        item: BalanceSheetItem::CurrentAssetsInvestments,
        note: &CURRENT_ASSETS_INVESTMENTS,
        check: NoteCheck::Details,
    },
    NoteRule {
        item: BalanceSheetItem::CreditorsDueWithinOneYear,
        note: &CREDITORS_WITHIN_ONE_YEAR,
        check: PERIOD_TOTALS,
    },
    NoteRule {
        item: BalanceSheetItem::CreditorsAfterOneYear,
        note: &CREDITORS_AFTER_ONE_YEAR,
        check: PERIOD_TOTALS,
    },
];

/// JSON path of a field inside a note, from its pointer.
fn note_path(note: &ResourceDescriptor, pointer: &str) -> String {
    format!("{}{}", note.json_root(), pointer.replace('/', "."))
}

fn reconcile(errors: &mut Errors, note: &ResourceDocument, descriptor: &ResourceDescriptor, pointer: &str, figure: Option<i64>) {
    let Some(figure) = figure else {
        return;
    };
    let path = note_path(descriptor, pointer);
    match note.data.field(pointer).and_then(|v| v.as_i64()) {
        None => errors.missing(path),
        Some(total) if total != figure => errors.push(
            ValidationError::new(codes::VALUE_NOT_EQUAL_TO_BALANCE_SHEET, path)
                .with_value("balance_sheet_value", figure),
        ),
        Some(_) => {}
    }
}

pub struct NotesValidator;

impl NotesValidator {
    async fn balance_sheet(
        ctx: &ClosureContext,
        period: &'static ResourceDescriptor,
    ) -> Result<Option<BalanceSheet>, ServiceError> {
        let period: Option<Period> = ctx.follow_body(&ctx.small_full, period).await?;
        Ok(period.and_then(|p| p.balance_sheet))
    }
}

#[async_trait]
impl ClosureValidator for NotesValidator {
    fn name(&self) -> &'static str {
        "notes"
    }

    async fn validate(&self, ctx: &ClosureContext) -> Result<Errors, ServiceError> {
        let mut errors = Errors::new();
        let multi_year = ctx.profile().await?.is_multi_year_filer();
        let current = Self::balance_sheet(ctx, &CURRENT_PERIOD).await?;
        let previous = if multi_year {
            Self::balance_sheet(ctx, &PREVIOUS_PERIOD).await?
        } else {
            None
        };

        for rule in &RULES {
            let current_figure = current.as_ref().and_then(|bs| bs.figure(rule.item));
            let previous_figure = previous.as_ref().and_then(|bs| bs.figure(rule.item));
            let needs_note = [current_figure, previous_figure]
                .iter()
                .any(|f| matches!(f, Some(v) if *v != 0));

            let Some(note) = ctx.follow(&ctx.small_full, rule.note).await? else {
                if needs_note || ctx.small_full.links().contains(rule.note.link_name) {
                    errors.missing(rule.note.link_json_path());
                }
                continue;
            };

            match rule.check {
                NoteCheck::Totals { current, previous } => {
                    reconcile(&mut errors, &note, rule.note, current, current_figure);
                    reconcile(&mut errors, &note, rule.note, previous, previous_figure);
                }
                NoteCheck::Details => {
                    let has_details = note
                        .data
                        .field("/details")
                        .and_then(|v| v.as_str())
                        .is_some_and(|s| !s.trim().is_empty());
                    if !has_details {
                        errors.missing(note_path(rule.note, "/details"));
                    }
                }
            }
        }
        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_paths_mirror_pointers() {
        assert_eq!(note_path(&STOCKS, "/current_period/total"), "$.stocks.current_period.total");
        assert_eq!(
            note_path(&TANGIBLE_ASSETS, "/total/net_book_value_at_end_of_current_period"),
            "$.tangible_assets.total.net_book_value_at_end_of_current_period"
        );
    }

    #[test]
    fn every_note_backed_line_has_one_rule() {
        let mut notes: Vec<_> = RULES.iter().map(|r| r.note.name).collect();
        notes.sort();
        notes.dedup();
        assert_eq!(notes.len(), RULES.len());
    }
}
