use std::future::Future;
use std::sync::Arc;

use super::{make_document, TestResult, COLLECTION};
use crate::{ResourceStore, StorageError};

/// Number of concurrent tasks to spawn in each test.
const N: usize = 10;

pub(super) async fn run_concurrent_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.push(TestResult::from_result(
        "concurrent",
        "concurrent_inserts_exactly_one_wins",
        concurrent_inserts_exactly_one_wins(factory).await,
    ));
    results.push(TestResult::from_result(
        "concurrent",
        "concurrent_inserts_different_keys_all_succeed",
        concurrent_inserts_different_keys_all_succeed(factory).await,
    ));

    results
}

// ── Concurrent insert: exactly one wins ─────────────────────────────────────

/// N tasks race to insert the same key. Exactly one succeeds; the rest must
/// get DuplicateKey.
async fn concurrent_inserts_exactly_one_wins<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);

    let mut handles = Vec::new();
    for i in 0..N {
        let s = storage.clone();
        let doc = make_document("doc-1", &format!("writer-{i}"))?;
        handles.push(tokio::spawn(async move {
            match s.insert(COLLECTION, doc).await {
                Ok(()) => Ok(true),
                Err(StorageError::DuplicateKey { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        }));
    }

    let mut winners = 0usize;
    let mut losers = 0usize;
    for handle in handles {
        let won = handle
            .await
            .map_err(|e| format!("task panic: {e}"))?
            .map_err(|e: StorageError| format!("storage error: {e}"))?;
        if won {
            winners += 1;
        } else {
            losers += 1;
        }
    }

    if winners != 1 {
        return Err(format!("expected exactly 1 winner, got {winners}"));
    }
    if losers != N - 1 {
        return Err(format!("expected {} losers, got {losers}", N - 1));
    }
    Ok(())
}

// ── Concurrent inserts on distinct keys ─────────────────────────────────────

async fn concurrent_inserts_different_keys_all_succeed<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: ResourceStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);

    let mut handles = Vec::new();
    for i in 0..N {
        let s = storage.clone();
        let doc = make_document(&format!("doc-{i}"), "x")?;
        handles.push(tokio::spawn(async move { s.insert(COLLECTION, doc).await }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| format!("task panic: {e}"))?
            .map_err(|e| format!("storage error: {e}"))?;
    }

    for i in 0..N {
        let id = format!("doc-{i}");
        if !storage.exists(COLLECTION, &id).await.map_err(|e| e.to_string())? {
            return Err(format!("{id} missing after concurrent inserts"));
        }
    }
    Ok(())
}
