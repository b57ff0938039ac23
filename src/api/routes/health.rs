use axum::{Json, extract::State};

use crate::api::{state::ApiState, types::HealthResponse};

/// GET /health
///
/// Reports `degraded` once the engine stopped answering.
pub async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    let (status, monitors) = match state.engine.monitors().await {
        Ok(ids) => ("ok", ids.len()),
        Err(_) => ("degraded", 0),
    };

    Json(HealthResponse {
        status: status.to_string(),
        monitors,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
