use tracing::trace;

use crate::error::{EngineError, EngineResult};
use crate::monitors::Monitor;
use crate::validation::{ValidationError, validate_add};

/// Queue bounds of the engine actors
#[derive(Debug, Clone, serde::Deserialize)]
pub struct EngineConfig {
    /// Capacity of the add/delete/read queues
    #[serde(default = "default_monitor_queue_size")]
    pub monitor_queue_size: usize,

    /// Capacity of the check result queue
    #[serde(default = "default_update_queue_size")]
    pub update_queue_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            monitor_queue_size: default_monitor_queue_size(),
            update_queue_size: default_update_queue_size(),
        }
    }
}

impl EngineConfig {
    /// Reject queue capacities the channels cannot be built with
    pub fn validate(&self) -> EngineResult<()> {
        if self.monitor_queue_size == 0 {
            return Err(EngineError::EmptyQueue("monitor_queue_size"));
        }
        if self.update_queue_size == 0 {
            return Err(EngineError::EmptyQueue("update_queue_size"));
        }
        Ok(())
    }
}

fn default_monitor_queue_size() -> usize {
    50
}

fn default_update_queue_size() -> usize {
    1000
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    /// Monitors registered at startup, same shape as an add request body
    pub monitors: Option<Vec<serde_json::Value>>,
}

impl Config {
    /// Validate the preloaded monitors
    pub fn initial_monitors(&self) -> Result<Vec<Monitor>, ValidationError> {
        self.monitors
            .iter()
            .flatten()
            .map(|body| validate_add(body).map(|request| request.into_http_get()))
            .collect()
    }
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))?;
    config.engine.validate()?;
    trace!("loaded config: {config:?}");
    Ok(config)
}
