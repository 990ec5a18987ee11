use async_trait::async_trait;

use accounts_domain::{Errors, ResourceDescriptor};

use super::{ClosureContext, ClosureValidator};
use crate::error::ServiceError;
use crate::links::member_ids;

/// An optional container (loans to directors, related-party transactions)
/// that, once linked, must hold at least one member.
pub struct MembersValidator {
    name: &'static str,
    container: &'static ResourceDescriptor,
    member: &'static ResourceDescriptor,
}

impl MembersValidator {
    pub fn new(
        name: &'static str,
        container: &'static ResourceDescriptor,
        member: &'static ResourceDescriptor,
    ) -> Self {
        MembersValidator {
            name,
            container,
            member,
        }
    }
}

#[async_trait]
impl ClosureValidator for MembersValidator {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn validate(&self, ctx: &ClosureContext) -> Result<Errors, ServiceError> {
        let mut errors = Errors::new();
        if !ctx.small_full.links().contains(self.container.link_name) {
            return Ok(errors);
        }
        let Some(container) = ctx.require(&ctx.small_full, self.container, &mut errors).await? else {
            return Ok(errors);
        };
        if member_ids(&container, self.member.link_name).is_empty() {
            errors.missing(self.member.link_json_path());
        }
        Ok(errors)
    }
}
