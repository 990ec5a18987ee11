//! Resource descriptors: the static facts about each resource type.
//!
//! A descriptor says where a resource lives in the URI tree, which parent
//! links to it and under which link name, what its `kind` tag is, and which
//! store collection holds it. Descriptors are plain `static` data; the
//! service layer builds its registry from them once at start-up.

use crate::identity::IdentityDeriver;

/// URI of a transaction.
pub fn transaction_uri(transaction_id: &str) -> String {
    format!("/transactions/{}", transaction_id)
}

/// URI of the company-account root within a transaction.
pub fn company_account_uri(transaction_id: &str, company_account_id: &str) -> String {
    format!(
        "/transactions/{}/company-accounts/{}",
        transaction_id, company_account_id
    )
}

/// Resources that other resources link from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentKind {
    CompanyAccount,
    SmallFull,
    CicReport,
    DirectorsReport,
    LoansToDirectors,
    RelatedPartyTransactions,
}

impl ParentKind {
    /// Descriptor of the parent resource itself, `None` for the root.
    pub fn descriptor(self) -> Option<&'static ResourceDescriptor> {
        use crate::catalogue;
        match self {
            ParentKind::CompanyAccount => None,
            ParentKind::SmallFull => Some(&catalogue::SMALL_FULL),
            ParentKind::CicReport => Some(&catalogue::CIC_REPORT),
            ParentKind::DirectorsReport => Some(&catalogue::DIRECTORS_REPORT),
            ParentKind::LoansToDirectors => Some(&catalogue::LOANS_TO_DIRECTORS),
            ParentKind::RelatedPartyTransactions => Some(&catalogue::RELATED_PARTY_TRANSACTIONS),
        }
    }

    /// Name used as the first segment of closure-validation JSON paths.
    pub fn json_name(self) -> &'static str {
        match self {
            ParentKind::CompanyAccount => "company_accounts",
            ParentKind::SmallFull => "small_full",
            ParentKind::CicReport => "cic_report",
            ParentKind::DirectorsReport => "directors_report",
            ParentKind::LoansToDirectors => "loans_to_directors",
            ParentKind::RelatedPartyTransactions => "related_party_transactions",
        }
    }

    /// Store collection holding the parent document.
    pub fn collection(self) -> &'static str {
        match self.descriptor() {
            Some(descriptor) => descriptor.collection,
            None => crate::catalogue::COMPANY_ACCOUNTS_COLLECTION,
        }
    }

    /// Store key of the parent document for a given company account.
    ///
    /// The root is keyed by the company-account id itself; every other
    /// parent is a singleton derived from it.
    pub fn document_id(self, ids: &IdentityDeriver, company_account_id: &str) -> String {
        match self.descriptor() {
            Some(descriptor) => ids.derive(company_account_id, descriptor.name),
            None => company_account_id.to_string(),
        }
    }
}

/// Whether a parent holds at most one of this resource, or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Single,
    Many,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Identity seed, `derive(company_account_id, name)`.
    pub name: &'static str,
    /// The `kind` tag stamped on every document of this type.
    pub kind: &'static str,
    /// Store collection.
    pub collection: &'static str,
    /// URI suffix below the company-account root.
    pub path: &'static str,
    /// Link name on the parent. For collections, the collection link and
    /// the member-map field on the parent.
    pub link_name: &'static str,
    pub parent: ParentKind,
    pub multiplicity: Multiplicity,
}

impl ResourceDescriptor {
    pub fn is_collection(&self) -> bool {
        self.multiplicity == Multiplicity::Many
    }

    /// Self link of a singleton, or the collection link of a collection.
    pub fn uri(&self, transaction_id: &str, company_account_id: &str) -> String {
        format!(
            "{}/{}",
            company_account_uri(transaction_id, company_account_id),
            self.path
        )
    }

    /// Self link of one member of a collection.
    pub fn member_uri(&self, transaction_id: &str, company_account_id: &str, member_id: &str) -> String {
        format!("{}/{}", self.uri(transaction_id, company_account_id), member_id)
    }

    /// JSON path reported when the parent lacks the link to this resource.
    pub fn link_json_path(&self) -> String {
        format!("$.{}.{}", self.parent.json_name(), self.link_name)
    }

    /// JSON path prefix for fields inside this resource.
    pub fn json_root(&self) -> String {
        format!("$.{}", self.name.replace('-', "_"))
    }
}
