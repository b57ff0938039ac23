//! Helper functions for integration tests

use std::collections::HashMap;
use std::time::Duration;

use hostmonitor::{
    Engine,
    config::EngineConfig,
    monitors::{Monitor, MonitorId, MonitorState},
};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn start_engine() -> Engine {
    Engine::start(&EngineConfig::default()).unwrap()
}

pub fn http_monitor(id: MonitorId, url: impl Into<String>) -> Monitor {
    Monitor::http_get(id, Duration::from_secs(60), url, Duration::from_secs(5))
}

pub fn http_monitor_with_timeout(id: MonitorId, url: impl Into<String>, timeout: Duration) -> Monitor {
    Monitor::http_get(id, Duration::from_secs(60), url, timeout)
}

/// Monitor that never touches the network
pub fn offline_monitor(id: MonitorId) -> Monitor {
    Monitor::http_post(
        id,
        Duration::from_secs(60),
        "http://example.test",
        Duration::from_secs(1),
        HashMap::new(),
    )
}

/// Target answering 200 after `delay`
///
/// Keeps the first check of a monitor in flight while a test inspects the
/// initial state.
pub async fn slow_target(delay: Duration) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(delay))
        .mount(&mock_server)
        .await;
    mock_server
}

pub async fn healthy_target() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&mock_server)
        .await;
    mock_server
}

/// URL of a local port nothing listens on
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

/// Poll the engine until the state of `id` satisfies `pred`
pub async fn wait_for_state(
    engine: &Engine,
    id: MonitorId,
    pred: impl Fn(&MonitorState) -> bool,
) -> Option<MonitorState> {
    for _ in 0..200 {
        let snapshot = engine.snapshot().await.unwrap();
        if let Some(state) = snapshot.get(id)
            && pred(state)
        {
            return Some(state.clone());
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    None
}
