//! Validation of monitor registration requests
//!
//! Requests arrive as loosely typed JSON objects. Required fields are checked
//! in a fixed order and the first violation is reported.
//!
//! | Field       | Rule                |
//! |-------------|---------------------|
//! | `id`        | number, `>= 0`      |
//! | `url`       | string              |
//! | `frequency` | number, `>= 60` (s) |
//! | `timeout`   | number, `1..=60` (s)|

use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::monitors::{Monitor, MonitorId};

/// Lowest accepted polling interval in seconds
pub const MIN_FREQUENCY_SECS: f64 = 60.0;

/// Accepted timeout range in seconds
pub const TIMEOUT_RANGE_SECS: (f64, f64) = (1.0, 60.0);

/// Reasons a request is rejected before it reaches the engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("Missing parameter '{0}'")]
    Missing(&'static str),

    #[error("Parameter '{0}' not numerical")]
    NotNumerical(&'static str),

    #[error("Parameter '{0}' not a string")]
    NotString(&'static str),

    #[error("Parameter 'id' negative value: {0}")]
    NegativeId(i64),

    #[error("Parameter 'frequency' minimum 60, has {0}")]
    FrequencyTooLow(i64),

    #[error("Parameter 'timeout' allowed range(1, 60), has {0}")]
    TimeoutOutOfRange(i64),
}

/// A validated registration request
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorRequest {
    pub id: MonitorId,
    pub url: String,
    pub frequency: Duration,
    pub timeout: Duration,
}

impl MonitorRequest {
    pub fn into_http_get(self) -> Monitor {
        Monitor::http_get(self.id, self.frequency, self.url, self.timeout)
    }
}

type Args = Map<String, Value>;

fn object(body: &Value) -> Result<&Args, ValidationError> {
    body.as_object().ok_or(ValidationError::NotAnObject)
}

fn field<'a>(args: &'a Args, key: &'static str) -> Result<&'a Value, ValidationError> {
    args.get(key).ok_or(ValidationError::Missing(key))
}

fn number(args: &Args, key: &'static str) -> Result<f64, ValidationError> {
    field(args, key)?.as_f64().ok_or(ValidationError::NotNumerical(key))
}

fn id(args: &Args) -> Result<MonitorId, ValidationError> {
    let id = number(args, "id")?;
    if id < 0.0 {
        return Err(ValidationError::NegativeId(id as i64));
    }
    Ok(id as MonitorId)
}

fn url(args: &Args) -> Result<String, ValidationError> {
    field(args, "url")?
        .as_str()
        .map(str::to_string)
        .ok_or(ValidationError::NotString("url"))
}

fn frequency(args: &Args) -> Result<Duration, ValidationError> {
    let frequency = number(args, "frequency")?;
    if frequency < MIN_FREQUENCY_SECS {
        return Err(ValidationError::FrequencyTooLow(frequency as i64));
    }
    Ok(Duration::from_secs(frequency as u64))
}

fn timeout(args: &Args) -> Result<Duration, ValidationError> {
    let timeout = number(args, "timeout")?;
    let (min, max) = TIMEOUT_RANGE_SECS;
    if timeout < min || timeout > max {
        return Err(ValidationError::TimeoutOutOfRange(timeout as i64));
    }
    Ok(Duration::from_secs(timeout as u64))
}

/// Validate an add request body
///
/// Fields are checked in the order id, url, frequency, timeout.
pub fn validate_add(body: &Value) -> Result<MonitorRequest, ValidationError> {
    let args = object(body)?;

    Ok(MonitorRequest {
        id: id(args)?,
        url: url(args)?,
        frequency: frequency(args)?,
        timeout: timeout(args)?,
    })
}

/// Validate a delete request body, returning the monitor id
pub fn validate_delete(body: &Value) -> Result<MonitorId, ValidationError> {
    id(object(body)?)
}
