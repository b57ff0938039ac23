//! Monitors: periodically executed network checks
//!
//! A [`Monitor`] is a closed set of probe kinds. Every kind carries the shared
//! [`MonitorBase`] (id, frequency, stop signal) and knows how to execute
//! itself and turn the outcome into a [`CheckResult`].
//!
//! | Kind       | Executed | Notes                                  |
//! |------------|----------|----------------------------------------|
//! | `HttpGet`  | yes      | plain GET, latency measured to headers |
//! | `HttpPost` | no       | carries a payload, rejected on register |

pub mod classify;
pub mod http;
pub mod state;

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::trace;

pub use http::{HttpMonitor, HttpPostMonitor};
pub use state::{Change, CheckResult, MonitorState, StateSet};

use classify::ProbeError;

/// Caller-assigned monitor identifier
pub type MonitorId = u64;

/// Fields shared by every monitor kind
#[derive(Debug, Clone)]
pub struct MonitorBase {
    id: MonitorId,
    frequency: Duration,

    /// Cancelled by the registry to terminate the scheduler loop
    stopper: CancellationToken,
}

impl MonitorBase {
    pub fn new(id: MonitorId, frequency: Duration) -> Self {
        Self {
            id,
            frequency,
            stopper: CancellationToken::new(),
        }
    }
}

/// A registered probe
#[derive(Debug, Clone)]
pub enum Monitor {
    HttpGet(HttpMonitor),
    HttpPost(HttpPostMonitor),
}

impl Monitor {
    /// Create an HTTP GET monitor
    pub fn http_get(id: MonitorId, frequency: Duration, url: impl Into<String>, timeout: Duration) -> Self {
        Monitor::HttpGet(HttpMonitor::new(id, frequency, url, timeout))
    }

    /// Create an HTTP POST monitor
    ///
    /// POST monitors can be constructed but the management API refuses to
    /// register them.
    pub fn http_post(
        id: MonitorId,
        frequency: Duration,
        url: impl Into<String>,
        timeout: Duration,
        payload: HashMap<String, String>,
    ) -> Self {
        Monitor::HttpPost(HttpPostMonitor::new(
            HttpMonitor::new(id, frequency, url, timeout),
            payload,
        ))
    }

    fn base(&self) -> &MonitorBase {
        match self {
            Monitor::HttpGet(m) => &m.base,
            Monitor::HttpPost(m) => &m.http.base,
        }
    }

    pub fn id(&self) -> MonitorId {
        self.base().id
    }

    pub fn frequency(&self) -> Duration {
        self.base().frequency
    }

    pub fn timeout(&self) -> Duration {
        match self {
            Monitor::HttpGet(m) => m.timeout,
            Monitor::HttpPost(m) => m.http.timeout,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Monitor::HttpGet(_) => "http-get",
            Monitor::HttpPost(_) => "http-post",
        }
    }

    /// Stop signal observed by this monitor's scheduler loop
    pub fn stopper(&self) -> &CancellationToken {
        &self.base().stopper
    }

    /// Signal the scheduler loop to terminate
    ///
    /// Never waits for the loop to exit.
    pub fn stop(&self) {
        self.base().stopper.cancel();
    }

    /// Fresh periodic timer at the configured frequency
    ///
    /// The first tick completes immediately. Missed ticks are not caught up.
    pub fn ticker(&self) -> Interval {
        let mut ticker = interval(self.frequency());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }

    /// State record created when this monitor is registered
    pub fn initial_state(&self) -> MonitorState {
        MonitorState::new(self.id())
    }

    /// Execute the check once and classify the outcome
    pub async fn check(&self, client: &reqwest::Client) -> CheckResult {
        trace!("executing {} monitor {}", self.kind(), self.id());

        match self {
            Monitor::HttpGet(m) => match m.execute(client, m.timeout).await {
                Ok(probed) => m.response_handler(probed),
                Err(e) => self.error_handler(&e),
            },
            Monitor::HttpPost(_) => self.error_handler(&ProbeError::NotImplemented("POST")),
        }
    }

    fn error_handler(&self, error: &ProbeError) -> CheckResult {
        let message = classify::classify(error);
        trace!("monitor {} failed ({message}): {error}", self.id());
        CheckResult::failure(self.id(), message, Utc::now())
    }
}
