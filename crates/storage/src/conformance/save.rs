use std::future::Future;

use super::{details_of, make_document, TestResult, COLLECTION};
use crate::ResourceStore;

pub(super) async fn run_save_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "save",
            "save_creates_missing_document",
            save_creates_missing_document(factory).await,
        ),
        TestResult::from_result(
            "save",
            "save_replaces_existing_document",
            save_replaces_existing_document(factory).await,
        ),
        TestResult::from_result(
            "save",
            "save_after_insert_keeps_single_document",
            save_after_insert_keeps_single_document(factory).await,
        ),
    ]
}

/// Save is an upsert: a missing key is created.
async fn save_creates_missing_document<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.save(COLLECTION, make_document("doc-1", "saved")?)
        .await
        .map_err(|e| e.to_string())?;
    if !s.exists(COLLECTION, "doc-1").await.map_err(|e| e.to_string())? {
        return Err("saved document does not exist".to_string());
    }
    Ok(())
}

/// The last save wins, including a fresh etag.
async fn save_replaces_existing_document<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let first = make_document("doc-1", "first")?;
    let second = make_document("doc-1", "second")?;
    s.save(COLLECTION, first).await.map_err(|e| e.to_string())?;
    s.save(COLLECTION, second.clone()).await.map_err(|e| e.to_string())?;

    let found = s
        .find(COLLECTION, "doc-1")
        .await
        .map_err(|e| e.to_string())?
        .ok_or("document not found after save")?;
    if details_of(&found) != Some("second") {
        return Err(format!("expected details \"second\", got {:?}", details_of(&found)));
    }
    if found.data.etag != second.data.etag {
        return Err("etag of the last save was not kept".to_string());
    }
    Ok(())
}

/// Insert then save under one key leaves one document, not two.
async fn save_after_insert_keeps_single_document<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert(COLLECTION, make_document("doc-1", "first")?)
        .await
        .map_err(|e| e.to_string())?;
    s.save(COLLECTION, make_document("doc-1", "second")?)
        .await
        .map_err(|e| e.to_string())?;

    if !s.delete(COLLECTION, "doc-1").await.map_err(|e| e.to_string())? {
        return Err("expected delete to remove the document".to_string());
    }
    if s.exists(COLLECTION, "doc-1").await.map_err(|e| e.to_string())? {
        return Err("a second copy survived the delete".to_string());
    }
    Ok(())
}
