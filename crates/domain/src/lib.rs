//! Domain model for company accounts filings: resource identities, stored
//! documents and their link maps, the resource catalogue, typed resource
//! bodies and structured validation errors.

pub mod catalogue;
pub mod company;
pub mod document;
pub mod errors;
pub mod filing;
pub mod identity;
pub mod model;
pub mod resource;
pub mod transaction;
pub mod validation;

pub use company::CompanyProfile;
pub use document::{DocumentData, Links, ResourceDocument, SELF_LINK};
pub use errors::{Errors, ValidationError};
pub use filing::{AccountType, Filing, FilingData, FilingLink};
pub use identity::IdentityDeriver;
pub use resource::{Multiplicity, ParentKind, ResourceDescriptor};
pub use transaction::{Transaction, TransactionResource, TransactionStatus};
pub use validation::Validatable;
