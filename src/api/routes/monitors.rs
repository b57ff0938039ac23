//! Monitor management endpoints

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::debug;

use crate::api::{
    error::{ApiError, ApiResult},
    state::ApiState,
    types::RespMsg,
};
use crate::validation::{validate_add, validate_delete};

fn parse_body(body: &Bytes) -> Result<Value, String> {
    serde_json::from_slice(body).map_err(|e| e.to_string())
}

/// POST /addmonitor/http/:method
///
/// Register an HTTP monitor. Only `GET` monitors can be registered.
pub async fn add_http_monitor(
    State(state): State<ApiState>,
    Path(method): Path<String>,
    body: Bytes,
) -> ApiResult<Json<RespMsg>> {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(e) => return Ok(Json(RespMsg::failed(e))),
    };

    let request = match validate_add(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!("rejected add request: {e}");
            return Ok(Json(RespMsg::failed(e.to_string())));
        }
    };

    let id = request.id;
    let monitor = match method.as_str() {
        "GET" => request.into_http_get(),
        "POST" => return Ok(Json(RespMsg::failed("POST not implemented"))),
        other => return Err(ApiError::NotFound(format!("unknown monitor method '{other}'"))),
    };

    if state.engine.register(monitor).await? {
        Ok(Json(RespMsg::ok("Monitor added")))
    } else {
        Ok(Json(RespMsg::failed(format!("Already exists id={id}"))))
    }
}

/// DELETE /deletemonitor
///
/// Remove a registered monitor.
pub async fn delete_monitor(State(state): State<ApiState>, body: Bytes) -> ApiResult<Json<RespMsg>> {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(e) => return Ok(Json(RespMsg::failed(e))),
    };

    let id = match validate_delete(&body) {
        Ok(id) => id,
        Err(e) => return Ok(Json(RespMsg::failed(e.to_string()))),
    };

    if state.engine.register_delete(id).await? {
        Ok(Json(RespMsg::ok("Monitor deleted")))
    } else {
        Ok(Json(RespMsg::failed(format!("id={id} not registered"))))
    }
}

/// GET /monitors
///
/// Current state of every monitor. The state map is serialized while the
/// read lease is held and released right after.
pub async fn read_state(State(state): State<ApiState>) -> ApiResult<Response> {
    let guard = state.engine.snapshot_read().await?;
    let body = serde_json::to_vec(&*guard);
    drop(guard);

    Ok(([(header::CONTENT_TYPE, "application/json")], body?).into_response())
}
