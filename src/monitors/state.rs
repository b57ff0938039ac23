//! Monitor state records and check results
//!
//! A [`MonitorState`] is the latest known liveness snapshot of one monitor.
//! It is only ever mutated by the state actor, either on creation or by
//! applying a [`CheckResult`] produced by a scheduler tick.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MonitorId;

/// Latency reported while a monitor is down
pub const LATENCY_UNAVAILABLE: i64 = -1;

/// Status code reported while a monitor is down
pub const CODE_UNAVAILABLE: i32 = -1;

/// Marks whether the most recent update flipped the `alive` flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::None => write!(f, "none"),
            Change::Up => write!(f, "up"),
            Change::Down => write!(f, "down"),
        }
    }
}

/// Latest observed state of an HTTP monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorState {
    pub id: MonitorId,

    pub alive: bool,

    /// Outcome or error classification of the last check
    pub message: String,

    pub change: Change,

    /// Round-trip time to response headers in milliseconds
    pub latency: i64,

    /// When `alive` last flipped
    pub last_change: DateTime<Utc>,

    /// When the last check was performed
    pub timestamp: DateTime<Utc>,

    /// HTTP status code of the last successful check
    pub code: i32,

    /// HTTP status line of the last successful check (e.g. "200 OK")
    pub status: String,
}

impl MonitorState {
    /// Default record for a freshly registered monitor
    pub fn new(id: MonitorId) -> Self {
        let now = Utc::now();
        Self {
            id,
            alive: true,
            message: "new".to_string(),
            change: Change::None,
            latency: 0,
            last_change: now,
            timestamp: now,
            code: 0,
            status: String::new(),
        }
    }

    /// Apply the outcome of one check to this record
    ///
    /// `last_change` only moves when `alive` flips, and `change` only
    /// describes this very update.
    pub fn apply(&mut self, result: &CheckResult) {
        self.change = Change::None;
        self.message = result.message.clone();
        self.timestamp = result.timestamp;

        if result.alive {
            if !self.alive {
                self.last_change = result.timestamp;
                self.change = Change::Up;
            }

            if let Some(latency) = result.latency {
                self.latency = latency;
            }
            self.code = result.code;
            self.status = result.status.clone();
        } else if self.alive {
            self.last_change = result.timestamp;
            self.change = Change::Down;
            self.latency = LATENCY_UNAVAILABLE;
            self.code = CODE_UNAVAILABLE;
            self.status = String::new();
        }

        self.alive = result.alive;
    }
}

/// Outcome of a single check, consumed exactly once by the state actor
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub id: MonitorId,
    pub alive: bool,
    pub message: String,

    /// `None` when the check failed
    pub latency: Option<i64>,

    pub timestamp: DateTime<Utc>,
    pub code: i32,
    pub status: String,
}

impl CheckResult {
    /// A check that received response headers
    pub fn success(
        id: MonitorId,
        latency: i64,
        timestamp: DateTime<Utc>,
        code: i32,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id,
            alive: true,
            message: String::new(),
            latency: Some(latency),
            timestamp,
            code,
            status: status.into(),
        }
    }

    /// A check that failed with a classified message
    pub fn failure(id: MonitorId, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            alive: false,
            message: message.into(),
            latency: None,
            timestamp,
            code: 0,
            status: String::new(),
        }
    }
}

/// Current state of every registered monitor, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSet {
    #[serde(rename = "monitors")]
    pub entries: BTreeMap<MonitorId, MonitorState>,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the record for `state.id`
    pub fn add(&mut self, state: MonitorState) {
        self.entries.insert(state.id, state);
    }

    pub fn delete(&mut self, id: MonitorId) -> Option<MonitorState> {
        self.entries.remove(&id)
    }

    /// Apply a check result if its monitor is still registered
    ///
    /// Returns `false` when the result was discarded.
    pub fn update(&mut self, result: &CheckResult) -> bool {
        match self.entries.get_mut(&result.id) {
            Some(state) => {
                state.apply(result);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: MonitorId) -> Option<&MonitorState> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
