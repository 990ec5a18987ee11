use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use accounts_domain::catalogue::STATEMENTS;
use accounts_domain::errors::codes;
use accounts_domain::model::Statements;
use accounts_domain::{Errors, ResourceDescriptor, Validatable};

use super::{ClosureContext, ClosureValidator};
use crate::error::ServiceError;

/// A resource that must be linked from its parent and whose body must still
/// pass its own validation at close (approval dates, for one, age).
pub struct MandatoryResource<T> {
    name: &'static str,
    descriptor: &'static ResourceDescriptor,
    _body: PhantomData<fn() -> T>,
}

impl<T> MandatoryResource<T> {
    pub fn new(name: &'static str, descriptor: &'static ResourceDescriptor) -> Self {
        MandatoryResource {
            name,
            descriptor,
            _body: PhantomData,
        }
    }
}

#[async_trait]
impl<T> ClosureValidator for MandatoryResource<T>
where
    T: Validatable + DeserializeOwned + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    async fn validate(&self, ctx: &ClosureContext) -> Result<Errors, ServiceError> {
        let mut errors = Errors::new();
        let Some(parent) = ctx.parent(self.descriptor.parent).await? else {
            errors.missing(self.descriptor.link_json_path());
            return Ok(errors);
        };
        let body: Option<T> = ctx.require_body(&parent, self.descriptor, &mut errors).await?;
        if let Some(body) = body {
            errors.extend(body.validate(&self.descriptor.json_root()));
        }
        Ok(errors)
    }
}

/// The legal statements must exist and have been agreed to.
pub struct StatementsValidator;

#[async_trait]
impl ClosureValidator for StatementsValidator {
    fn name(&self) -> &'static str {
        "statements"
    }

    async fn validate(&self, ctx: &ClosureContext) -> Result<Errors, ServiceError> {
        let mut errors = Errors::new();
        let statements: Option<Statements> = ctx.require_body(&ctx.small_full, &STATEMENTS, &mut errors).await?;
        if let Some(statements) = statements {
            if !statements.agreed() {
                errors.add(
                    codes::INVALID_VALUE,
                    format!("{}.has_agreed_to_legal_statements", STATEMENTS.json_root()),
                );
            }
        }
        Ok(errors)
    }
}
