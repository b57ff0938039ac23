//! RegistryActor - Single owner of the active monitor map
//!
//! Requests are handled one at a time, in submission order. Adding and
//! deleting a monitor are bracketed by a handshake with the state actor so
//! that a monitor's state record exists for its whole scheduling lifetime:
//!
//! ```text
//! Add:    insert monitor ─► StateActor::Add ─► wait ack ─► spawn Scheduler ─► true
//! Delete: cancel Scheduler + remove monitor ─► StateActor::Delete ─► wait ack ─► true
//! ```
//!
//! Deleting never waits for the scheduler task to exit; the loop notices the
//! stop signal on its own.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{EngineError, EngineResult};
use crate::monitors::{Monitor, MonitorId, MonitorState};

use super::messages::RegistryCommand;
use super::scheduler::Scheduler;
use super::state::StateHandle;

/// Actor owning every registered monitor
pub struct RegistryActor {
    monitors: HashMap<MonitorId, Monitor>,

    command_rx: mpsc::Receiver<RegistryCommand>,

    /// Handshake partner owning the state records
    state: StateHandle,

    /// HTTP client handed to every scheduler
    client: reqwest::Client,

    shutdown: CancellationToken,
}

impl RegistryActor {
    pub fn new(
        command_rx: mpsc::Receiver<RegistryCommand>,
        state: StateHandle,
        client: reqwest::Client,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            monitors: HashMap::new(),
            command_rx,
            state,
            client,
            shutdown,
        }
    }

    /// Run the actor's main loop
    ///
    /// On exit the state actor is shut down as well and every scheduler is
    /// told to stop. Requests still queued at that point are dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting registry actor");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    debug!("received shutdown signal");
                    break;
                }

                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else {
                        warn!("command channel closed, shutting down");
                        break;
                    };

                    if let Err(e) = self.handle_command(cmd).await {
                        error!("stopping registry: {e}");
                        break;
                    }
                }
            }
        }

        for monitor in self.monitors.values() {
            monitor.stop();
        }
        self.state.shutdown();

        debug!("registry actor stopped");
    }

    async fn handle_command(&mut self, cmd: RegistryCommand) -> EngineResult<()> {
        match cmd {
            RegistryCommand::Add {
                monitor,
                state,
                respond_to,
            } => self.add(monitor, state, respond_to).await,

            RegistryCommand::Delete { id, respond_to } => self.delete(id, respond_to).await,

            RegistryCommand::List { respond_to } => {
                let mut ids: Vec<_> = self.monitors.keys().copied().collect();
                ids.sort_unstable();
                let _ = respond_to.send(ids);
                Ok(())
            }
        }
    }

    async fn add(
        &mut self,
        monitor: Monitor,
        state: MonitorState,
        respond_to: oneshot::Sender<bool>,
    ) -> EngineResult<()> {
        let id = monitor.id();
        if self.monitors.contains_key(&id) {
            debug!("monitor {id} already registered");
            let _ = respond_to.send(false);
            return Ok(());
        }

        self.monitors.insert(id, monitor.clone());

        // the record must exist before the first result can arrive
        self.state.add(state).await?;

        Scheduler::spawn(monitor, self.client.clone(), self.state.results());
        info!("registered monitor {id}");

        let _ = respond_to.send(true);
        Ok(())
    }

    async fn delete(&mut self, id: MonitorId, respond_to: oneshot::Sender<bool>) -> EngineResult<()> {
        let Some(monitor) = self.monitors.remove(&id) else {
            debug!("monitor {id} not registered");
            let _ = respond_to.send(false);
            return Ok(());
        };

        monitor.stop();

        // answer only once the record is gone, so a re-add cannot race it
        self.state.delete(id).await?;
        info!("deleted monitor {id}");

        let _ = respond_to.send(true);
        Ok(())
    }
}

/// Handle for talking to the RegistryActor
#[derive(Clone)]
pub struct RegistryHandle {
    sender: mpsc::Sender<RegistryCommand>,
    shutdown: CancellationToken,
}

impl RegistryHandle {
    /// Spawn a new registry actor paired with `state`
    pub fn spawn(state: StateHandle, client: reqwest::Client, queue_size: usize) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(queue_size);
        let shutdown = CancellationToken::new();

        let actor = RegistryActor::new(cmd_rx, state, client, shutdown.clone());

        tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            shutdown,
        }
    }

    /// Register a monitor with the given initial state
    ///
    /// `Ok(false)` if a monitor with the same id is already registered.
    pub async fn add(&self, monitor: Monitor, state: MonitorState) -> EngineResult<bool> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RegistryCommand::Add {
                monitor,
                state,
                respond_to: tx,
            })
            .await
            .map_err(|_| EngineError::RegistryStopped)?;

        rx.await.map_err(|_| EngineError::RegistryStopped)
    }

    /// Remove a monitor
    ///
    /// `Ok(false)` if no monitor with this id is registered.
    pub async fn delete(&self, id: MonitorId) -> EngineResult<bool> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RegistryCommand::Delete { id, respond_to: tx })
            .await
            .map_err(|_| EngineError::RegistryStopped)?;

        rx.await.map_err(|_| EngineError::RegistryStopped)
    }

    /// Ids of all registered monitors, sorted
    pub async fn list(&self) -> EngineResult<Vec<MonitorId>> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(RegistryCommand::List { respond_to: tx })
            .await
            .map_err(|_| EngineError::RegistryStopped)?;

        rx.await.map_err(|_| EngineError::RegistryStopped)
    }

    /// Stop the registry actor, which in turn stops the state actor
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
