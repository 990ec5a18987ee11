use accounts_domain::Errors;

/// Result of a resource operation that reached the store.
///
/// Every variant is a normal business result; data-access failures travel
/// separately as [`ServiceError`](crate::ServiceError).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Created(T),
    Updated,
    Found(T),
    Deleted,
    NotFound,
    DuplicateKey,
    ValidationFailed(Errors),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Created(v) => Outcome::Created(f(v)),
            Outcome::Found(v) => Outcome::Found(f(v)),
            Outcome::Updated => Outcome::Updated,
            Outcome::Deleted => Outcome::Deleted,
            Outcome::NotFound => Outcome::NotFound,
            Outcome::DuplicateKey => Outcome::DuplicateKey,
            Outcome::ValidationFailed(errors) => Outcome::ValidationFailed(errors),
        }
    }

    /// Short name used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Created(_) => "created",
            Outcome::Updated => "updated",
            Outcome::Found(_) => "found",
            Outcome::Deleted => "deleted",
            Outcome::NotFound => "not_found",
            Outcome::DuplicateKey => "duplicate_key",
            Outcome::ValidationFailed(_) => "validation_failed",
        }
    }

    pub fn into_found(self) -> Option<T> {
        match self {
            Outcome::Found(v) => Some(v),
            _ => None,
        }
    }
}
