//! Scheduler - Periodic execution loop of a single monitor
//!
//! Every registered monitor gets its own scheduler task. The loop checks the
//! target right away, then once per tick, and publishes each [`CheckResult`]
//! on the shared results queue of the state actor.
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → HTTP check → Classify → CheckResult → StateActor
//!     ↑
//!     └─── stop signal (cancelled by the registry on delete)
//! ```
//!
//! The stop signal is only observed between checks. A check already in flight
//! runs to completion (bounded by the monitor timeout) and its result may still
//! reach the state actor after the monitor is gone.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace, warn};

use crate::monitors::{CheckResult, Monitor};

/// Execution loop of one monitor
pub struct Scheduler {
    monitor: Monitor,

    /// HTTP client shared by every scheduler
    client: reqwest::Client,

    /// Results queue consumed by the state actor
    result_tx: mpsc::Sender<CheckResult>,
}

impl Scheduler {
    pub fn new(monitor: Monitor, client: reqwest::Client, result_tx: mpsc::Sender<CheckResult>) -> Self {
        Self {
            monitor,
            client,
            result_tx,
        }
    }

    /// Spawn the loop on the runtime
    ///
    /// The returned handle is only useful to tests; the registry never joins
    /// scheduler tasks.
    pub fn spawn(monitor: Monitor, client: reqwest::Client, result_tx: mpsc::Sender<CheckResult>) -> JoinHandle<()> {
        tokio::spawn(Self::new(monitor, client, result_tx).run())
    }

    /// Run until the monitor's stop signal fires
    #[instrument(skip(self), fields(monitor = self.monitor.id()))]
    pub async fn run(self) {
        debug!(
            "scheduling {} every {:?} (timeout {:?})",
            self.monitor.kind(),
            self.monitor.frequency(),
            self.monitor.timeout()
        );

        let stop = self.monitor.stopper().clone();
        let mut ticker = self.monitor.ticker();

        loop {
            tokio::select! {
                biased;

                _ = stop.cancelled() => {
                    debug!("received stop signal");
                    break;
                }

                // first tick completes immediately
                _ = ticker.tick() => {
                    if !self.launch_check().await {
                        break;
                    }
                }
            }
        }

        debug!("unscheduled");
    }

    /// Execute one check and publish its result
    ///
    /// Returns `false` once the state actor is gone.
    async fn launch_check(&self) -> bool {
        let result = self.monitor.check(&self.client).await;
        trace!("check finished: alive={} message={:?}", result.alive, result.message);

        if self.result_tx.send(result).await.is_err() {
            warn!("results queue closed, stopping");
            return false;
        }

        true
    }
}
