//! Conformance test suite for `ResourceStore` implementations.
//!
//! This module provides a backend-agnostic test suite that any
//! `ResourceStore` implementation can run to verify correctness. The suite
//! covers:
//!
//! - **Insert**: key uniqueness per collection, collection isolation
//! - **Save**: upsert semantics, last writer wins
//! - **Find / exists**: absence is a normal result
//! - **Delete**: removal reported once, other keys untouched
//! - **Concurrency**: racing inserts of one key, exactly one wins
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory function that
//! creates a fresh, empty store for each test:
//!
//! ```ignore
//! use accounts_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn mongo_conformance() {
//!     let report = run_conformance_suite(|| async { connect_test_store().await }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod concurrent;
mod delete;
mod insert;
mod save;

use std::fmt;
use std::future::Future;

use accounts_domain::{DocumentData, Links, ResourceDocument};

use crate::ResourceStore;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "insert", "delete").
    pub category: String,
    /// Test name (e.g. "insert_duplicate_key_rejected").
    pub name: String,
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn pass(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(category: &str, name: &str, msg: String) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: false,
            message: Some(msg),
        }
    }

    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::pass(category, name),
            Err(msg) => Self::fail(category, name, msg),
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a store.
///
/// The `factory` function is called once per test to create a fresh, empty
/// store, ensuring test isolation.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.extend(insert::run_insert_tests(&factory).await);
    results.extend(save::run_save_tests(&factory).await);
    results.extend(delete::run_delete_tests(&factory).await);
    results.extend(concurrent::run_concurrent_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

const COLLECTION: &str = "conformance";

fn make_document(id: &str, details: &str) -> Result<ResourceDocument, String> {
    let data = DocumentData::stamp(
        &serde_json::json!({ "details": details }),
        Links::with_self(format!("/conformance/{id}")),
        "conformance#document",
    )
    .map_err(|e| e.to_string())?;
    Ok(ResourceDocument::new(id, data))
}

fn details_of(document: &ResourceDocument) -> Option<&str> {
    document.data.fields.get("details").and_then(|v| v.as_str())
}
