//! Message types for actor communication
//!
//! ## Design Principles
//!
//! 1. **Commands**: requests sent to one specific actor through a bounded mpsc queue
//! 2. **Acknowledgements**: every handshake operation carries a oneshot sender the
//!    actor answers once the operation took effect
//! 3. **Results**: [`CheckResult`]s flow from the schedulers to the state actor on a
//!    separate, larger queue and are never acknowledged

use tokio::sync::oneshot;

use crate::monitors::{Monitor, MonitorId, MonitorState};

use super::state::StateReadGuard;

/// Commands accepted by the registry actor
#[derive(Debug)]
pub enum RegistryCommand {
    /// Register a monitor and start scheduling it
    ///
    /// Answers `false` if the id is already registered.
    Add {
        monitor: Monitor,
        state: MonitorState,
        respond_to: oneshot::Sender<bool>,
    },

    /// Stop a monitor and remove its state record
    ///
    /// Answers `false` if the id is not registered.
    Delete {
        id: MonitorId,
        respond_to: oneshot::Sender<bool>,
    },

    /// Get the ids of all registered monitors
    List {
        respond_to: oneshot::Sender<Vec<MonitorId>>,
    },
}

/// Commands accepted by the state actor
#[derive(Debug)]
pub enum StateCommand {
    /// Insert (or overwrite) a state record, acknowledged once stored
    Add {
        state: MonitorState,
        respond_to: oneshot::Sender<()>,
    },

    /// Remove a state record if present, acknowledged once removed
    Delete {
        id: MonitorId,
        respond_to: oneshot::Sender<()>,
    },

    /// Lend the live state map to the caller
    ///
    /// The actor does nothing else until the returned guard is dropped.
    Read {
        respond_to: oneshot::Sender<StateReadGuard>,
    },
}
