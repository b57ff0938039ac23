//! Concurrency and race condition tests
//!
//! These tests verify that:
//! - Concurrent adds with distinct ids all succeed
//! - Concurrent adds of one id succeed exactly once
//! - The monitor map and the state map agree after mixed add/delete traffic

use futures::future::join_all;
use hostmonitor::monitors::MonitorId;
use pretty_assertions::assert_eq;

use crate::helpers::*;

#[tokio::test]
async fn test_concurrent_adds_distinct_ids() {
    let engine = start_engine();

    let tasks = (0..50).map(|id| {
        let engine = engine.clone();
        tokio::spawn(async move { engine.register(offline_monitor(id)).await })
    });

    for result in join_all(tasks).await {
        assert!(result.unwrap().unwrap());
    }

    assert_eq!(engine.monitors().await.unwrap().len(), 50);
    assert_eq!(engine.snapshot().await.unwrap().len(), 50);

    engine.shutdown();
}

#[tokio::test]
async fn test_concurrent_adds_same_id() {
    let engine = start_engine();

    let tasks = (0..20).map(|_| {
        let engine = engine.clone();
        tokio::spawn(async move { engine.register(offline_monitor(9)).await })
    });

    let accepted = join_all(tasks)
        .await
        .into_iter()
        .filter(|result| matches!(result, Ok(Ok(true))))
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(engine.snapshot().await.unwrap().len(), 1);

    engine.shutdown();
}

#[tokio::test]
async fn test_mixed_traffic_keeps_maps_consistent() {
    let engine = start_engine();

    // even ids are added and deleted again, odd ids stay
    let tasks = (0..40).map(|id: MonitorId| {
        let engine = engine.clone();
        tokio::spawn(async move {
            assert!(engine.register(offline_monitor(id)).await.unwrap());
            if id % 2 == 0 {
                assert!(engine.register_delete(id).await.unwrap());
            }
        })
    });

    for result in join_all(tasks).await {
        result.unwrap();
    }

    let registered = engine.monitors().await.unwrap();
    let snapshot = engine.snapshot().await.unwrap();
    let recorded: Vec<MonitorId> = snapshot.entries.keys().copied().collect();

    assert_eq!(registered, (0..40).filter(|id| id % 2 == 1).collect::<Vec<_>>());
    assert_eq!(registered, recorded);

    engine.shutdown();
}

#[tokio::test]
async fn test_reads_during_writes() {
    let engine = start_engine();

    let writer = {
        let engine = engine.clone();
        tokio::spawn(async move {
            for id in 0..30 {
                engine.register(offline_monitor(id)).await.unwrap();
            }
        })
    };

    let mut last_len = 0;
    while !writer.is_finished() {
        let len = engine.snapshot_read().await.unwrap().len();
        assert!(len >= last_len, "records never disappear without a delete");
        last_len = len;
        tokio::task::yield_now().await;
    }
    writer.await.unwrap();

    assert_eq!(engine.snapshot().await.unwrap().len(), 30);
    engine.shutdown();
}
