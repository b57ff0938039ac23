//! Integration tests for real probe executions
//!
//! These tests verify that:
//! - Successful checks refresh latency and status
//! - Refused connections and timeouts mark a monitor down
//! - A check in flight while its monitor is deleted leaves no trace

use std::time::Duration;

use hostmonitor::monitors::{Change, classify};
use pretty_assertions::assert_eq;

use crate::helpers::*;

#[tokio::test]
async fn test_first_check_records_http_status() {
    let target = healthy_target().await;
    let engine = start_engine();

    engine.register(http_monitor(1, target.uri())).await.unwrap();

    let state = wait_for_state(&engine, 1, |s| s.code == 200).await.unwrap();
    assert!(state.alive);
    assert_eq!(state.change, Change::None);
    assert_eq!(state.status, "200 OK");
    assert_eq!(state.message, "");
    assert!(state.latency >= 0);
    assert!(state.timestamp >= state.last_change);

    engine.shutdown();
}

#[tokio::test]
async fn test_connection_refused_marks_monitor_down() {
    let engine = start_engine();

    engine.register(http_monitor(2, closed_port_url())).await.unwrap();

    let state = wait_for_state(&engine, 2, |s| !s.alive).await.unwrap();
    assert_eq!(state.change, Change::Down);
    assert_eq!(state.message, classify::CONNECTION_REFUSED);
    assert_eq!(state.latency, -1);
    assert_eq!(state.code, -1);
    assert_eq!(state.status, "");
    assert_eq!(state.last_change, state.timestamp);

    engine.shutdown();
}

#[tokio::test]
async fn test_timeout_marks_monitor_down() {
    let target = slow_target(Duration::from_secs(3)).await;
    let engine = start_engine();

    engine
        .register(http_monitor_with_timeout(3, target.uri(), Duration::from_secs(1)))
        .await
        .unwrap();

    let state = wait_for_state(&engine, 3, |s| !s.alive).await.unwrap();
    assert_eq!(state.message, classify::TIMEOUT);
    assert_eq!(state.change, Change::Down);

    engine.shutdown();
}

#[tokio::test]
async fn test_in_flight_check_after_delete_is_dropped() {
    let target = slow_target(Duration::from_millis(500)).await;
    let engine = start_engine();

    engine.register(http_monitor(4, target.uri())).await.unwrap();

    // delete returns without waiting for the in-flight check
    let deleted = tokio::time::timeout(Duration::from_millis(250), engine.register_delete(4))
        .await
        .expect("delete must not wait for the running check");
    assert!(deleted.unwrap());

    // let the check complete and its result reach the state actor
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(engine.snapshot().await.unwrap().get(4).is_none());
    assert!(target.received_requests().await.unwrap().len() <= 1);

    engine.shutdown();
}
