use std::future::Future;

use super::{details_of, make_document, TestResult, COLLECTION};
use crate::{ResourceStore, StorageError};

pub(super) async fn run_insert_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "insert",
        "inserted_document_is_found",
        inserted_document_is_found(factory).await,
    ));
    results.push(TestResult::from_result(
        "insert",
        "insert_duplicate_key_rejected",
        insert_duplicate_key_rejected(factory).await,
    ));
    results.push(TestResult::from_result(
        "insert",
        "duplicate_insert_keeps_original",
        duplicate_insert_keeps_original(factory).await,
    ));
    results.push(TestResult::from_result(
        "insert",
        "same_key_in_different_collections",
        same_key_in_different_collections(factory).await,
    ));
    results.push(TestResult::from_result(
        "insert",
        "find_missing_returns_none",
        find_missing_returns_none(factory).await,
    ));

    results
}

// ── Test implementations ──────────────────────────────────────────────────────

/// After insert, find and exists must see the document unchanged.
async fn inserted_document_is_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let doc = make_document("doc-1", "first")?;
    s.insert(COLLECTION, doc.clone())
        .await
        .map_err(|e| e.to_string())?;

    let found = s
        .find(COLLECTION, "doc-1")
        .await
        .map_err(|e| e.to_string())?
        .ok_or("inserted document not found")?;
    if found != doc {
        return Err(format!("expected {doc:?}, got {found:?}"));
    }
    if !s.exists(COLLECTION, "doc-1").await.map_err(|e| e.to_string())? {
        return Err("exists returned false for inserted document".to_string());
    }
    Ok(())
}

/// A second insert under the same key must fail with DuplicateKey carrying
/// the collection and id.
async fn insert_duplicate_key_rejected<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert(COLLECTION, make_document("doc-1", "first")?)
        .await
        .map_err(|e| e.to_string())?;

    match s.insert(COLLECTION, make_document("doc-1", "second")?).await {
        Err(StorageError::DuplicateKey { collection, id }) => {
            if collection != COLLECTION || id != "doc-1" {
                return Err(format!(
                    "expected DuplicateKey {COLLECTION}/doc-1, got {collection}/{id}"
                ));
            }
            Ok(())
        }
        Err(e) => Err(format!("expected DuplicateKey, got: {e}")),
        Ok(()) => Err("expected DuplicateKey error, but got Ok".to_string()),
    }
}

/// A rejected insert must not overwrite the stored document.
async fn duplicate_insert_keeps_original<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert(COLLECTION, make_document("doc-1", "first")?)
        .await
        .map_err(|e| e.to_string())?;
    let _ = s.insert(COLLECTION, make_document("doc-1", "second")?).await;

    let found = s
        .find(COLLECTION, "doc-1")
        .await
        .map_err(|e| e.to_string())?
        .ok_or("document vanished after duplicate insert")?;
    match details_of(&found) {
        Some("first") => Ok(()),
        other => Err(format!("expected details \"first\", got {other:?}")),
    }
}

/// Key uniqueness is per collection.
async fn same_key_in_different_collections<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert("stocks", make_document("doc-1", "a")?)
        .await
        .map_err(|e| e.to_string())?;
    s.insert("debtors", make_document("doc-1", "b")?)
        .await
        .map_err(|e| e.to_string())?;

    let stocks = s.find("stocks", "doc-1").await.map_err(|e| e.to_string())?;
    let debtors = s.find("debtors", "doc-1").await.map_err(|e| e.to_string())?;
    match (stocks.as_ref().and_then(details_of), debtors.as_ref().and_then(details_of)) {
        (Some("a"), Some("b")) => Ok(()),
        other => Err(format!("collections not isolated: {other:?}")),
    }
}

/// Absence is a normal result, not an error.
async fn find_missing_returns_none<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    if s.find(COLLECTION, "nope").await.map_err(|e| e.to_string())?.is_some() {
        return Err("expected None for missing document".to_string());
    }
    if s.exists(COLLECTION, "nope").await.map_err(|e| e.to_string())? {
        return Err("exists returned true for missing document".to_string());
    }
    Ok(())
}
