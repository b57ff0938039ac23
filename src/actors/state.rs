//! StateActor - Single owner of the monitor state map
//!
//! All mutations of the state records are serialized through this actor's
//! loop: explicit adds and deletes from the registry handshake, results from
//! the schedulers, and reads.
//!
//! ## Message Flow
//!
//! ```text
//! RegistryActor ── Add/Delete (acked) ──┐
//! API ─────────── Read (lease) ────────┼──► StateActor ──► StateSet
//! Schedulers ──── CheckResult ─────────┘
//! ```
//!
//! A result for an id without a record belongs to a monitor deleted while its
//! check was in flight and is dropped.

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

use crate::error::{EngineError, EngineResult};
use crate::monitors::{CheckResult, MonitorId, MonitorState, StateSet};

use super::messages::StateCommand;

static EMPTY: StateSet = StateSet {
    entries: BTreeMap::new(),
};

/// Read access to the live state map
///
/// While a guard exists the state actor is blocked; serialize or copy what you
/// need and drop it promptly.
#[derive(Debug)]
pub struct StateReadGuard {
    states: Option<Arc<StateSet>>,
    release: Option<oneshot::Sender<()>>,
}

impl StateReadGuard {
    fn new(states: Arc<StateSet>, release: oneshot::Sender<()>) -> Self {
        Self {
            states: Some(states),
            release: Some(release),
        }
    }
}

impl Deref for StateReadGuard {
    type Target = StateSet;

    fn deref(&self) -> &StateSet {
        self.states.as_deref().unwrap_or(&EMPTY)
    }
}

impl Drop for StateReadGuard {
    fn drop(&mut self) {
        // give the map back before waking the actor so it can mutate in place
        self.states.take();
        if let Some(release) = self.release.take() {
            let _ = release.send(());
        }
    }
}

/// Actor owning the state record of every registered monitor
pub struct StateActor {
    states: Arc<StateSet>,

    /// Handshake and read requests
    command_rx: mpsc::Receiver<StateCommand>,

    /// Results published by scheduler loops
    result_rx: mpsc::Receiver<CheckResult>,

    shutdown: CancellationToken,
}

impl StateActor {
    pub fn new(
        command_rx: mpsc::Receiver<StateCommand>,
        result_rx: mpsc::Receiver<CheckResult>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            states: Arc::new(StateSet::new()),
            command_rx,
            result_rx,
            shutdown,
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until the shutdown token is cancelled or every command sender is
    /// gone. Queued operations are dropped on shutdown.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting state actor");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    debug!("received shutdown signal");
                    break;
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => {
                            warn!("command channel closed, shutting down");
                            break;
                        }
                    }
                }

                Some(result) = self.result_rx.recv() => {
                    self.apply_result(result);
                }
            }
        }

        debug!("state actor stopped");
    }

    async fn handle_command(&mut self, cmd: StateCommand) {
        match cmd {
            StateCommand::Add { state, respond_to } => {
                trace!("adding state record {}", state.id);
                Arc::make_mut(&mut self.states).add(state);
                let _ = respond_to.send(());
            }

            StateCommand::Delete { id, respond_to } => {
                trace!("deleting state record {id}");
                Arc::make_mut(&mut self.states).delete(id);
                let _ = respond_to.send(());
            }

            StateCommand::Read { respond_to } => {
                let (release_tx, release_rx) = oneshot::channel();
                let guard = StateReadGuard::new(Arc::clone(&self.states), release_tx);

                if respond_to.send(guard).is_err() {
                    trace!("reader went away before receiving the state map");
                    return;
                }

                // nothing else runs until the reader releases the map
                tokio::select! {
                    _ = release_rx => {}
                    _ = self.shutdown.cancelled() => {}
                }
            }
        }
    }

    fn apply_result(&mut self, result: CheckResult) {
        let id = result.id;
        if self.states.get(id).is_none() {
            trace!("discarding result for deleted monitor {id}");
            return;
        }

        let states = Arc::make_mut(&mut self.states);
        states.update(&result);

        if let Some(state) = states.get(id) {
            trace!(
                "monitor {id}: alive={} change={} message={:?}",
                state.alive, state.change, state.message
            );
        }
    }
}

/// Handle for talking to the StateActor
#[derive(Clone)]
pub struct StateHandle {
    sender: mpsc::Sender<StateCommand>,
    results: mpsc::Sender<CheckResult>,
    shutdown: CancellationToken,
}

impl StateHandle {
    /// Spawn a new state actor
    ///
    /// `command_queue_size` bounds handshake and read requests,
    /// `update_queue_size` bounds pending check results.
    pub fn spawn(command_queue_size: usize, update_queue_size: usize) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(command_queue_size);
        let (result_tx, result_rx) = mpsc::channel(update_queue_size);
        let shutdown = CancellationToken::new();

        let actor = StateActor::new(cmd_rx, result_rx, shutdown.clone());

        tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            results: result_tx,
            shutdown,
        }
    }

    /// Insert a state record, returning once it is stored
    pub async fn add(&self, state: MonitorState) -> EngineResult<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(StateCommand::Add { state, respond_to: tx })
            .await
            .map_err(|_| EngineError::StateStopped)?;

        rx.await.map_err(|_| EngineError::StateStopped)
    }

    /// Remove a state record, returning once it is gone
    pub async fn delete(&self, id: MonitorId) -> EngineResult<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(StateCommand::Delete { id, respond_to: tx })
            .await
            .map_err(|_| EngineError::StateStopped)?;

        rx.await.map_err(|_| EngineError::StateStopped)
    }

    /// Borrow the live state map
    pub async fn read(&self) -> EngineResult<StateReadGuard> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(StateCommand::Read { respond_to: tx })
            .await
            .map_err(|_| EngineError::StateStopped)?;

        rx.await.map_err(|_| EngineError::StateStopped)
    }

    /// Copy of the current state map
    pub async fn snapshot(&self) -> EngineResult<StateSet> {
        let guard = self.read().await?;
        Ok(StateSet::clone(&guard))
    }

    /// Queue a check result for the state actor
    pub async fn update(&self, result: CheckResult) -> EngineResult<()> {
        self.results
            .send(result)
            .await
            .map_err(|_| EngineError::StateStopped)
    }

    /// Sender scheduler loops publish their results on
    pub fn results(&self) -> mpsc::Sender<CheckResult> {
        self.results.clone()
    }

    /// Stop the state actor immediately
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled() && !self.sender.is_closed()
    }
}
