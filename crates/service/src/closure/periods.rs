use async_trait::async_trait;

use accounts_domain::catalogue::{CURRENT_PERIOD, PREVIOUS_PERIOD};
use accounts_domain::model::Period;
use accounts_domain::{Errors, ResourceDescriptor};

use super::{ClosureContext, ClosureValidator};
use crate::error::ServiceError;

/// The current period, with a balance sheet, is always required. Companies
/// that have filed before must also supply the previous period.
pub struct PeriodsValidator;

impl PeriodsValidator {
    async fn check(
        ctx: &ClosureContext,
        descriptor: &'static ResourceDescriptor,
        errors: &mut Errors,
    ) -> Result<(), ServiceError> {
        let period: Option<Period> = ctx.require_body(&ctx.small_full, descriptor, errors).await?;
        if let Some(period) = period {
            if period.balance_sheet.is_none() {
                errors.missing(format!("{}.balance_sheet", descriptor.json_root()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ClosureValidator for PeriodsValidator {
    fn name(&self) -> &'static str {
        "periods"
    }

    async fn validate(&self, ctx: &ClosureContext) -> Result<Errors, ServiceError> {
        let mut errors = Errors::new();
        Self::check(ctx, &CURRENT_PERIOD, &mut errors).await?;
        if ctx.profile().await?.is_multi_year_filer() {
            Self::check(ctx, &PREVIOUS_PERIOD, &mut errors).await?;
        }
        Ok(errors)
    }
}
