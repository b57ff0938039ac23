//! Integration tests for API endpoints
//!
//! These tests verify that:
//! - Management endpoints answer with `{Ok, Message}` bodies
//! - Validation rejects requests before they reach the engine
//! - The state map is served as JSON

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use hostmonitor::{
    Engine,
    api::{ApiConfig, ApiState, HealthResponse, RespMsg, router, spawn_api_server},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::helpers::*;

fn test_app(engine: &Engine) -> Router {
    router(&ApiConfig::default(), ApiState::new(engine.clone()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.unwrap_or_default()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn resp(body: Value) -> RespMsg {
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_add_monitor() {
    let target = slow_target(Duration::from_secs(2)).await;
    let engine = start_engine();
    let app = test_app(&engine);

    let body = json!({"id": 1, "url": target.uri(), "frequency": 60, "timeout": 5});
    let (status, response) = send(&app, "POST", "/addmonitor/http/GET", Some(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"Ok": true, "Message": "Monitor added"}));
    assert_eq!(engine.monitors().await.unwrap(), vec![1]);

    engine.shutdown();
}

#[tokio::test]
async fn test_add_duplicate_monitor() {
    let target = slow_target(Duration::from_secs(2)).await;
    let engine = start_engine();
    let app = test_app(&engine);

    let body = json!({"id": 3, "url": target.uri(), "frequency": 60, "timeout": 5}).to_string();
    send(&app, "POST", "/addmonitor/http/GET", Some(body.clone())).await;
    let (_, response) = send(&app, "POST", "/addmonitor/http/GET", Some(body)).await;

    assert_eq!(resp(response), RespMsg::failed("Already exists id=3"));
    assert_eq!(engine.snapshot().await.unwrap().len(), 1);

    engine.shutdown();
}

#[tokio::test]
async fn test_frequency_below_minimum_never_reaches_engine() {
    let engine = start_engine();
    let app = test_app(&engine);

    let body = json!({"id": 2, "url": "http://example.test", "frequency": 30, "timeout": 5});
    let (status, response) = send(&app, "POST", "/addmonitor/http/GET", Some(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        resp(response),
        RespMsg::failed("Parameter 'frequency' minimum 60, has 30")
    );
    assert!(engine.monitors().await.unwrap().is_empty());
    assert!(engine.snapshot().await.unwrap().is_empty());

    engine.shutdown();
}

#[tokio::test]
async fn test_post_monitors_are_rejected() {
    let engine = start_engine();
    let app = test_app(&engine);

    let body = json!({"id": 4, "url": "http://example.test", "frequency": 60, "timeout": 5});
    let (_, response) = send(&app, "POST", "/addmonitor/http/POST", Some(body.to_string())).await;

    assert_eq!(resp(response), RespMsg::failed("POST not implemented"));
    assert!(engine.monitors().await.unwrap().is_empty());

    engine.shutdown();
}

#[tokio::test]
async fn test_unknown_method_is_not_found() {
    let engine = start_engine();
    let app = test_app(&engine);

    let body = json!({"id": 4, "url": "http://example.test", "frequency": 60, "timeout": 5});
    let (status, response) = send(&app, "POST", "/addmonitor/http/PATCH", Some(body.to_string())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(response["error"].as_str().unwrap().contains("PATCH"));

    engine.shutdown();
}

#[tokio::test]
async fn test_malformed_body() {
    let engine = start_engine();
    let app = test_app(&engine);

    let (status, response) = send(&app, "POST", "/addmonitor/http/GET", Some("{not json".to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let response = resp(response);
    assert!(!response.ok);
    assert!(!response.message.is_empty());

    engine.shutdown();
}

#[tokio::test]
async fn test_delete_monitor() {
    let engine = start_engine();
    let app = test_app(&engine);
    engine.register(offline_monitor(7)).await.unwrap();

    let body = json!({"id": 7}).to_string();
    let (_, first) = send(&app, "DELETE", "/deletemonitor", Some(body.clone())).await;
    let (_, second) = send(&app, "DELETE", "/deletemonitor", Some(body)).await;

    assert_eq!(resp(first), RespMsg::ok("Monitor deleted"));
    assert_eq!(resp(second), RespMsg::failed("id=7 not registered"));

    engine.shutdown();
}

#[tokio::test]
async fn test_delete_requires_id() {
    let engine = start_engine();
    let app = test_app(&engine);

    let (_, response) = send(&app, "DELETE", "/deletemonitor", Some("{}".to_string())).await;

    assert_eq!(resp(response), RespMsg::failed("Missing parameter 'id'"));

    engine.shutdown();
}

#[tokio::test]
async fn test_read_monitors() {
    let target = slow_target(Duration::from_secs(2)).await;
    let engine = start_engine();
    let app = test_app(&engine);
    engine.register(http_monitor(1, target.uri())).await.unwrap();

    let (status, response) = send(&app, "GET", "/monitors", None).await;

    assert_eq!(status, StatusCode::OK);
    let record = &response["monitors"]["1"];
    assert_eq!(record["id"], 1);
    assert_eq!(record["alive"], true);
    assert_eq!(record["message"], "new");
    assert_eq!(record["change"], "");

    // the read lease was released
    assert!(engine.register_delete(1).await.unwrap());

    engine.shutdown();
}

#[tokio::test]
async fn test_engine_down_is_service_unavailable() {
    let engine = start_engine();
    let app = test_app(&engine);
    engine.shutdown();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (status, _) = send(&app, "GET", "/monitors", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_server_health_endpoint() {
    let engine = start_engine();
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(), // Random port
        enable_cors: true,
    };

    let addr = spawn_api_server(config, ApiState::new(engine.clone())).await.unwrap();

    let health: HealthResponse = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.monitors, 0);

    engine.shutdown();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let health: HealthResponse = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health.status, "degraded");
}
