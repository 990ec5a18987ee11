//! Document key derivation.
//!
//! Singleton resources are keyed by a SHA-256 digest of
//! `"{parent_id}-{resource_name}"`, base64-url encoded. The key is a pure
//! function of its inputs, so a second create for the same
//! (parent, resource) pair lands on the same key and the store's uniqueness
//! constraint rejects it.
//!
//! Multi-instance resources (directors, loans, related-party transactions)
//! and the company-account root use [`IdentityDeriver::derive_random`].

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Derives store keys for resources.
///
/// The digest is compiled in, so there is no runtime "algorithm
/// unavailable" failure mode to report per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityDeriver;

impl IdentityDeriver {
    pub fn new() -> Self {
        IdentityDeriver
    }

    /// Deterministic key for the `resource_name` child of `parent_id`.
    pub fn derive(&self, parent_id: &str, resource_name: &str) -> String {
        let seed = format!("{}-{}", parent_id, resource_name);
        URL_SAFE.encode(Sha256::digest(seed.as_bytes()))
    }

    /// Fresh random key. Two calls never share a seed.
    pub fn derive_random(&self) -> String {
        let entropy: [u8; 32] = rand::random();
        URL_SAFE.encode(Sha256::digest(entropy))
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let ids = IdentityDeriver::new();
        assert_eq!(
            ids.derive("abc123", "current-period"),
            ids.derive("abc123", "current-period")
        );
    }

    #[test]
    fn derive_differs_by_resource_name() {
        let ids = IdentityDeriver::new();
        assert_ne!(
            ids.derive("abc123", "current-period"),
            ids.derive("abc123", "previous-period")
        );
    }

    #[test]
    fn derive_differs_by_parent() {
        let ids = IdentityDeriver::new();
        assert_ne!(ids.derive("a", "stocks"), ids.derive("b", "stocks"));
    }

    #[test]
    fn derive_matches_known_digest() {
        // sha256("abc-def"), url-safe base64 with padding
        let expected = URL_SAFE.encode(Sha256::digest(b"abc-def"));
        assert_eq!(IdentityDeriver::new().derive("abc", "def"), expected);
    }

    #[test]
    fn derived_keys_are_url_safe() {
        let ids = IdentityDeriver::new();
        for name in ["small-full", "approval", "stocks", "cic-report"] {
            let key = ids.derive("company-account-1", name);
            assert!(!key.contains('+') && !key.contains('/'), "{key}");
            assert_eq!(key.len(), 44);
        }
    }

    #[test]
    fn random_keys_do_not_repeat() {
        let ids = IdentityDeriver::new();
        let a = ids.derive_random();
        let b = ids.derive_random();
        assert_ne!(a, b);
        assert_eq!(a.len(), 44);
    }
}
