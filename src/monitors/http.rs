//! HTTP monitor kinds

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use hyper::ext::ReasonPhrase;
use reqwest::StatusCode;

use super::classify::ProbeError;
use super::{CheckResult, MonitorBase, MonitorId};

/// Response data kept from a successful execution
#[derive(Debug, Clone)]
pub struct Probed {
    pub status: StatusCode,

    /// Reason phrase sent by the server when it differs from the canonical one
    pub reason: Option<String>,

    /// Milliseconds between sending the request and receiving headers
    pub latency: i64,

    pub timestamp: DateTime<Utc>,
}

/// Monitor issuing a GET request against `url`
#[derive(Debug, Clone)]
pub struct HttpMonitor {
    pub(crate) base: MonitorBase,
    pub(crate) url: String,
    pub(crate) timeout: Duration,
}

impl HttpMonitor {
    pub fn new(id: MonitorId, frequency: Duration, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base: MonitorBase::new(id, frequency),
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue the request, bounded by `deadline`
    ///
    /// The body is never read; dropping the response releases the connection.
    pub async fn execute(&self, client: &reqwest::Client, deadline: Duration) -> Result<Probed, ProbeError> {
        let start = Instant::now();
        let response = client.get(&self.url).timeout(deadline).send().await?;
        let latency = start.elapsed().as_millis() as i64;
        let timestamp = Utc::now();

        let reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
            .filter(|reason| !reason.is_empty())
            .map(str::to_string);

        Ok(Probed {
            status: response.status(),
            reason,
            latency,
            timestamp,
        })
    }

    pub(crate) fn response_handler(&self, probed: Probed) -> CheckResult {
        CheckResult::success(
            self.base.id,
            probed.latency,
            probed.timestamp,
            i32::from(probed.status.as_u16()),
            status_line(probed.status, probed.reason.as_deref()),
        )
    }
}

/// Status line as `"<code> <reason>"`, or the bare code when no reason is known
pub(crate) fn status_line(status: StatusCode, reason: Option<&str>) -> String {
    match reason.or(status.canonical_reason()) {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

/// Monitor posting a payload to `url`
///
/// Declared for completeness; registration rejects it and it never executes.
#[derive(Debug, Clone)]
pub struct HttpPostMonitor {
    pub(crate) http: HttpMonitor,
    pub(crate) payload: HashMap<String, String>,
}

impl HttpPostMonitor {
    pub fn new(http: HttpMonitor, payload: HashMap<String, String>) -> Self {
        Self { http, payload }
    }

    pub fn payload(&self) -> &HashMap<String, String> {
        &self.payload
    }
}
