//! API response types

use serde::{Deserialize, Serialize};

/// Outcome of a management request
///
/// Field names are capitalized on the wire (`{"Ok": true, "Message": "..."}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RespMsg {
    pub ok: bool,
    pub message: String,
}

impl RespMsg {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Number of registered monitors
    pub monitors: usize,
    pub timestamp: String,
}
