//! HTTP management API
//!
//! Thin translation layer between JSON requests and the [`Engine`](crate::engine::Engine).
//!
//! ## Endpoints
//!
//! - `POST /addmonitor/http/:method` - Register a monitor (`GET` only)
//! - `DELETE /deletemonitor` - Remove a monitor
//! - `GET /monitors` - Current state of all monitors
//! - `GET /health` - Health check

#[cfg(feature = "api")]
pub mod error;
#[cfg(feature = "api")]
pub mod routes;
#[cfg(feature = "api")]
pub mod state;
#[cfg(feature = "api")]
pub mod types;

#[cfg(feature = "api")]
pub use error::{ApiError, ApiResult};
#[cfg(feature = "api")]
pub use state::ApiState;
#[cfg(feature = "api")]
pub use types::{HealthResponse, RespMsg};

#[cfg(feature = "api")]
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
#[cfg(feature = "api")]
use tracing::info;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (e.g., "127.0.0.1:8085")
    pub bind_addr: SocketAddr,

    /// Enable CORS for browser clients
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8085),
            enable_cors: false,
        }
    }
}

/// Build the API router
#[cfg(feature = "api")]
pub fn router(config: &ApiConfig, state: ApiState) -> Router {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/addmonitor/http/:method", post(routes::monitors::add_http_monitor))
        .route("/deletemonitor", delete(routes::monitors::delete_monitor))
        .route("/monitors", get(routes::monitors::read_state))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Bind the management API and serve it from a background task
///
/// Returns the bound address, which differs from `config.bind_addr` when
/// port 0 was requested.
#[cfg(feature = "api")]
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    info!("starting API server on {}", config.bind_addr);

    let app = router(&config, state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;

    info!("API server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("management API stopped: {e}");
        }
    });

    Ok(addr)
}
