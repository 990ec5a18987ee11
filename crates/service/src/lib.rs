//! Service layer for company accounts filings.
//!
//! Resources are created, updated and deleted through [`ResourceService`]
//! (singletons), [`MemberService`] (multi-instance families) and
//! [`CompanyAccountService`] (the root). Each write keeps the parent's link
//! map in step through a [`Linkable`] implementation. Before a transaction
//! closes, the [`ClosureChain`] walks the resource graph and the
//! [`FilingOrchestrator`] turns a complete graph into a filing.

pub mod clients;
pub mod closure;
mod company_account;
mod context;
mod error;
mod filing;
mod links;
mod member_service;
mod outcome;
mod registry;
mod resource_service;

use std::sync::Arc;

use accounts_storage::ResourceStore;

pub use company_account::{validation_status_uri, CompanyAccountService};
pub use closure::{ClosureChain, ClosureContext, ClosureValidator};
pub use context::RequestContext;
pub use error::ServiceError;
pub use filing::FilingOrchestrator;
pub use links::{LinkRegistry, Linkable};
pub use member_service::MemberService;
pub use outcome::Outcome;
pub use registry::{Creatable, ResolvedResource, ServiceRegistry};
pub use resource_service::ResourceService;

/// The document store shared by every service.
pub type SharedStore = Arc<dyn ResourceStore>;
