use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use super::*;
use shared::domain::ProductId;

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_millis(350),
    }
}

#[test]
fn backoff_doubles_and_caps() {
    let policy = policy(5);
    assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
    assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
    assert_eq!(policy.backoff_for(3), Duration::from_millis(350));
    assert_eq!(policy.backoff_for(40), Duration::from_millis(350));
}

#[tokio::test(start_paused = true)]
async fn retries_network_errors_until_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let start = tokio::time::Instant::now();

    let result = policy(3)
        .run("fetch_page", || {
            let calls = Arc::clone(&calls);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(CatalogError::network("connection reset"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

    assert_eq!(result.expect("third attempt succeeds"), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn gives_up_after_max_attempts() {
    let calls = Arc::new(AtomicU32::new(0));

    let result: Result<(), _> = policy(2)
        .run("fetch_page", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(CatalogError::network("timed out"))
            }
        })
        .await;

    assert!(matches!(result, Err(CatalogError::Network { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn does_not_retry_not_found() {
    let calls = Arc::new(AtomicU32::new(0));

    let result: Result<(), _> = policy(5)
        .run("fetch_by_id", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(CatalogError::NotFound(ProductId(9)))
            }
        })
        .await;

    assert!(matches!(result, Err(CatalogError::NotFound(ProductId(9)))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_attempts_still_runs_once() {
    let calls = Arc::new(AtomicU32::new(0));
    let _ = policy(0)
        .run("fetch_page", || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(CatalogError::network("refused"))
            }
        })
        .await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
