//! Engine - Programmatic entry point of the monitoring core
//!
//! Wires a [`StateHandle`] and a [`RegistryHandle`] together and exposes the
//! three operations the management layer needs: register, delete, read.

use tracing::debug;

use crate::actors::registry::RegistryHandle;
use crate::actors::state::{StateHandle, StateReadGuard};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::monitors::{Monitor, MonitorId, MonitorState, StateSet};

/// Running monitoring engine
///
/// Cloning is cheap; every clone talks to the same actors.
#[derive(Clone)]
pub struct Engine {
    registry: RegistryHandle,
    state: StateHandle,
}

impl Engine {
    /// Spawn the state and registry actors
    ///
    /// Fails with [`EngineError::EmptyQueue`](crate::EngineError::EmptyQueue)
    /// when a queue capacity is zero.
    pub fn start(config: &EngineConfig) -> EngineResult<Self> {
        config.validate()?;

        debug!(
            "starting engine (monitor queue {}, update queue {})",
            config.monitor_queue_size, config.update_queue_size
        );

        let client = reqwest::Client::builder().build()?;

        let state = StateHandle::spawn(config.monitor_queue_size, config.update_queue_size);
        let registry = RegistryHandle::spawn(state.clone(), client, config.monitor_queue_size);

        Ok(Self { registry, state })
    }

    /// Register `monitor` with `initial_state`
    ///
    /// Returns `true` iff the monitor was newly registered. Once this returns
    /// `true` a state record for the monitor is readable.
    pub async fn register_add(&self, monitor: Monitor, initial_state: MonitorState) -> EngineResult<bool> {
        self.registry.add(monitor, initial_state).await
    }

    /// Register `monitor` with its default initial state
    pub async fn register(&self, monitor: Monitor) -> EngineResult<bool> {
        let state = monitor.initial_state();
        self.register_add(monitor, state).await
    }

    /// Remove the monitor with `id`
    ///
    /// Returns `true` iff such a monitor existed.
    pub async fn register_delete(&self, id: MonitorId) -> EngineResult<bool> {
        self.registry.delete(id).await
    }

    /// Borrow the live state map
    ///
    /// The state actor is blocked until the guard is dropped.
    pub async fn snapshot_read(&self) -> EngineResult<StateReadGuard> {
        self.state.read().await
    }

    /// Copy of the current state map
    pub async fn snapshot(&self) -> EngineResult<StateSet> {
        self.state.snapshot().await
    }

    /// Ids of all registered monitors
    pub async fn monitors(&self) -> EngineResult<Vec<MonitorId>> {
        self.registry.list().await
    }

    /// Direct access to the state actor
    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    /// Stop the engine
    ///
    /// The registry forwards the shutdown to the state actor and stops all
    /// schedulers. Pending requests fail with an error instead of hanging.
    pub fn shutdown(&self) {
        self.registry.shutdown();
    }
}
