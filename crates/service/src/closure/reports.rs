use async_trait::async_trait;

use accounts_domain::catalogue::{
    CIC_APPROVAL, CIC_REPORT, CIC_STATEMENTS, DIRECTOR, DIRECTORS_REPORT, DIRECTORS_REPORT_APPROVAL,
    DIRECTORS_REPORT_STATEMENTS,
};
use accounts_domain::model::Approval;
use accounts_domain::{Errors, ResourceDescriptor, ResourceDocument, Validatable};

use super::{ClosureContext, ClosureValidator};
use crate::error::ServiceError;
use crate::links::member_ids;

/// A report needs its statements and a valid approval.
async fn check_report(
    ctx: &ClosureContext,
    report: &ResourceDocument,
    statements: &'static ResourceDescriptor,
    approval: &'static ResourceDescriptor,
    errors: &mut Errors,
) -> Result<(), ServiceError> {
    ctx.require(report, statements, errors).await?;
    let body: Option<Approval> = ctx.require_body(report, approval, errors).await?;
    if let Some(body) = body {
        errors.extend(body.validate(&approval.json_root()));
    }
    Ok(())
}

/// Optional. Once linked, the directors' report must name at least one
/// director and carry statements and an approval.
pub struct DirectorsReportValidator;

#[async_trait]
impl ClosureValidator for DirectorsReportValidator {
    fn name(&self) -> &'static str {
        "directors_report"
    }

    async fn validate(&self, ctx: &ClosureContext) -> Result<Errors, ServiceError> {
        let mut errors = Errors::new();
        if !ctx.small_full.links().contains(DIRECTORS_REPORT.link_name) {
            return Ok(errors);
        }
        let Some(report) = ctx.require(&ctx.small_full, &DIRECTORS_REPORT, &mut errors).await? else {
            return Ok(errors);
        };
        if member_ids(&report, DIRECTOR.link_name).is_empty() {
            errors.missing(DIRECTOR.link_json_path());
        }
        check_report(
            ctx,
            &report,
            &DIRECTORS_REPORT_STATEMENTS,
            &DIRECTORS_REPORT_APPROVAL,
            &mut errors,
        )
        .await?;
        Ok(errors)
    }
}

/// Community interest companies must file a CIC report with statements and
/// an approval. Other companies are not checked.
pub struct CicReportValidator;

#[async_trait]
impl ClosureValidator for CicReportValidator {
    fn name(&self) -> &'static str {
        "cic_report"
    }

    async fn validate(&self, ctx: &ClosureContext) -> Result<Errors, ServiceError> {
        let mut errors = Errors::new();
        if !ctx.profile().await?.is_community_interest_company {
            return Ok(errors);
        }
        let Some(report) = ctx.require(&ctx.company_account, &CIC_REPORT, &mut errors).await? else {
            return Ok(errors);
        };
        check_report(ctx, &report, &CIC_STATEMENTS, &CIC_APPROVAL, &mut errors).await?;
        Ok(errors)
    }
}
