//! Poll loop
//!
//! Drives the monitor on a fixed interval and immediately on platform
//! connectivity signals. Ticks that arrive while a cycle is still running
//! are skipped, never queued.

use super::monitor::ConnectivityMonitor;
use super::signals::ConnectivitySignal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Periodic driver for a [`ConnectivityMonitor`]
pub struct PollLoop {
    monitor: Arc<ConnectivityMonitor>,
    interval: Duration,
}

/// Handle to a running poll loop
///
/// Dropping the handle aborts the loop.
pub struct PollLoopHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollLoop {
    /// Create a poll loop ticking every `interval`
    pub fn new(monitor: Arc<ConnectivityMonitor>, interval: Duration) -> Self {
        Self { monitor, interval }
    }

    /// Spawn the loop onto the current tokio runtime
    pub fn spawn(self, signals: mpsc::Receiver<ConnectivitySignal>) -> PollLoopHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(signals, shutdown_rx));

        PollLoopHandle {
            shutdown,
            task: Some(task),
        }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped
    ///
    /// The first tick fires immediately.
    pub async fn run(
        self,
        mut signals: mpsc::Receiver<ConnectivitySignal>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!("Starting poll loop (interval: {:?})", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }

                Some(signal) = signals.recv() => {
                    debug!("Running cycle for {:?}", signal);
                    self.monitor.run_cycle().await;
                }

                _ = ticker.tick() => {
                    if self.monitor.try_run_cycle().await.is_none() {
                        debug!("Tick skipped: previous probe still outstanding");
                    }
                }
            }
        }

        info!("Poll loop stopped");
    }
}

impl PollLoopHandle {
    /// Whether the loop task has exited
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Stop the loop and wait for it to exit
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Poll loop task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for PollLoopHandle {
    fn drop(&mut self) {
        // Cancel the loop if it was never shut down
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
