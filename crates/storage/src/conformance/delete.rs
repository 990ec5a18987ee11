use std::future::Future;

use super::{make_document, TestResult, COLLECTION};
use crate::ResourceStore;

pub(super) async fn run_delete_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "delete",
            "delete_removes_document",
            delete_removes_document(factory).await,
        ),
        TestResult::from_result(
            "delete",
            "second_delete_reports_nothing_removed",
            second_delete_reports_nothing_removed(factory).await,
        ),
        TestResult::from_result(
            "delete",
            "delete_leaves_other_keys",
            delete_leaves_other_keys(factory).await,
        ),
        TestResult::from_result(
            "delete",
            "deleted_key_can_be_inserted_again",
            deleted_key_can_be_inserted_again(factory).await,
        ),
    ]
}

async fn delete_removes_document<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert(COLLECTION, make_document("doc-1", "x")?)
        .await
        .map_err(|e| e.to_string())?;
    if !s.delete(COLLECTION, "doc-1").await.map_err(|e| e.to_string())? {
        return Err("delete reported nothing removed".to_string());
    }
    if s.find(COLLECTION, "doc-1").await.map_err(|e| e.to_string())?.is_some() {
        return Err("document still found after delete".to_string());
    }
    Ok(())
}

async fn second_delete_reports_nothing_removed<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert(COLLECTION, make_document("doc-1", "x")?)
        .await
        .map_err(|e| e.to_string())?;
    s.delete(COLLECTION, "doc-1").await.map_err(|e| e.to_string())?;
    if s.delete(COLLECTION, "doc-1").await.map_err(|e| e.to_string())? {
        return Err("second delete reported a removal".to_string());
    }
    if s.delete("never-created", "doc-1").await.map_err(|e| e.to_string())? {
        return Err("delete in an unknown collection reported a removal".to_string());
    }
    Ok(())
}

async fn delete_leaves_other_keys<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert(COLLECTION, make_document("doc-1", "x")?)
        .await
        .map_err(|e| e.to_string())?;
    s.insert(COLLECTION, make_document("doc-2", "y")?)
        .await
        .map_err(|e| e.to_string())?;
    s.delete(COLLECTION, "doc-1").await.map_err(|e| e.to_string())?;
    if !s.exists(COLLECTION, "doc-2").await.map_err(|e| e.to_string())? {
        return Err("unrelated document removed".to_string());
    }
    Ok(())
}

/// Delete frees the key for a later create.
async fn deleted_key_can_be_inserted_again<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.insert(COLLECTION, make_document("doc-1", "x")?)
        .await
        .map_err(|e| e.to_string())?;
    s.delete(COLLECTION, "doc-1").await.map_err(|e| e.to_string())?;
    s.insert(COLLECTION, make_document("doc-1", "again")?)
        .await
        .map_err(|e| format!("re-insert after delete: {e}"))
}
