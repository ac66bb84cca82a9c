//! Connectivity monitor
//!
//! Runs the probe → classify → dispatch → recover pipeline as one serialized
//! cycle. The working state sits behind an async mutex: cycles never overlap,
//! and a scheduled tick that finds a cycle in flight is skipped.

use super::machine::{ConnectivityState, Transition};
use super::probe::IpProbe;
use super::types::{ConnectivityStatus, NetworkIdentity, ProbeError, ProbeResult};
use crate::notify::Notifier;
use crate::storage::IdentityStore;
use crate::worker::Recoverer;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Read-only view of the monitor for presentation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSnapshot {
    /// Current classification
    pub status: ConnectivityStatus,
    /// Raw value observed by the latest cycle
    pub last_raw_ip: Option<String>,
    /// Saved network at the latest cycle
    pub reference: Option<NetworkIdentity>,
    /// When the latest cycle finished
    pub last_checked_at: Option<DateTime<Utc>>,
}

/// Owns the connectivity state and its collaborators
pub struct ConnectivityMonitor {
    probe: Arc<dyn IpProbe>,
    identity: IdentityStore,
    notifier: Arc<dyn Notifier>,
    recoverer: Arc<dyn Recoverer>,
    state: Mutex<ConnectivityState>,
    snapshot: watch::Sender<MonitorSnapshot>,
}

impl ConnectivityMonitor {
    /// Create a monitor
    ///
    /// The last raw IP recorded by a previous run seeds the state; the gate
    /// starts armed regardless, so the first cycle always notifies.
    pub fn new(
        probe: Arc<dyn IpProbe>,
        identity: IdentityStore,
        notifier: Arc<dyn Notifier>,
        recoverer: Arc<dyn Recoverer>,
    ) -> Self {
        let last_raw_ip = identity.last_raw_ip().unwrap_or_else(|e| {
            warn!("Failed to read last observed IP: {}", e);
            None
        });
        let reference = identity.load().unwrap_or_else(|e| {
            warn!("Failed to read saved network: {}", e);
            None
        });

        let (snapshot, _) = watch::channel(MonitorSnapshot {
            last_raw_ip: last_raw_ip.clone(),
            reference,
            ..MonitorSnapshot::default()
        });

        Self {
            probe,
            identity,
            notifier,
            recoverer,
            state: Mutex::new(ConnectivityState::with_last_raw_ip(last_raw_ip)),
            snapshot,
        }
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshot.subscribe()
    }

    /// Latest snapshot
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Current classification
    pub fn status(&self) -> ConnectivityStatus {
        self.snapshot.borrow().status
    }

    /// Copy of the working state
    pub async fn state(&self) -> ConnectivityState {
        self.state.lock().await.clone()
    }

    /// Run one cycle, waiting for any cycle already in flight
    pub async fn run_cycle(&self) -> Transition {
        let mut state = self.state.lock().await;
        let probe_result = self.probe.probe().await;
        self.apply(&mut state, probe_result).await
    }

    /// Run one cycle unless one is already in flight
    ///
    /// Returns `None` when skipped.
    pub async fn try_run_cycle(&self) -> Option<Transition> {
        let Ok(mut state) = self.state.try_lock() else {
            debug!("Cycle already in flight, skipping");
            return None;
        };
        let probe_result = self.probe.probe().await;
        Some(self.apply(&mut state, probe_result).await)
    }

    /// Save the network the machine is currently attached to
    ///
    /// Probes once; on success stores `(label, ip)` as the reference identity
    /// and classifies that same probe result, which dispatches at most one
    /// notification. On failure the saved identity is left untouched.
    ///
    /// # Errors
    /// Returns the probe error if the current IP could not be determined, or
    /// a storage error if the identity could not be written.
    pub async fn save_current_network(&self, label: &str) -> crate::Result<NetworkIdentity> {
        let mut state = self.state.lock().await;

        let ip = self.probe.probe().await.map_err(|e| {
            warn!("Cannot save current network: {}", e);
            e
        })?;

        let identity = NetworkIdentity::new(label.trim(), ip);
        self.identity.save(&identity)?;

        self.apply(&mut state, Ok(ip)).await;
        Ok(identity)
    }

    /// Forget the saved network
    ///
    /// The next cycle classifies as offline.
    pub async fn forget_network(&self) -> crate::Result<()> {
        let _state = self.state.lock().await;
        self.identity.clear()?;
        self.snapshot.send_modify(|snapshot| snapshot.reference = None);
        Ok(())
    }

    async fn apply(&self, state: &mut ConnectivityState, probe_result: ProbeResult) -> Transition {
        let reference = self.identity.load().unwrap_or_else(|e| {
            warn!("Failed to read saved network, classifying without it: {}", e);
            None
        });

        if let Err(e) = &probe_result {
            log_probe_failure(e);
        }

        let transition = state.advance(&probe_result, reference.as_ref());

        if transition.rearmed {
            debug!("Observed new raw value {}, gate re-armed", transition.raw);
            if let Err(e) = self.identity.record_raw_ip(&transition.raw) {
                warn!("Failed to record observed IP: {}", e);
            }
        }

        if transition.status_changed() {
            info!(
                "Connectivity {} → {} ({:?})",
                transition.previous,
                transition.status(),
                transition.classification
            );
        }

        match &transition.notification {
            Some(request) => self.notifier.dispatch(request).await,
            None => debug!("No notification: {} already notified for {}", transition.status(), transition.raw),
        }

        if transition.recover {
            info!("Attached to a different network, recovering worker");
            self.recoverer.recover().await;
        }

        self.snapshot.send_replace(MonitorSnapshot {
            status: transition.status(),
            last_raw_ip: Some(transition.raw.clone()),
            reference,
            last_checked_at: Some(Utc::now()),
        });

        transition
    }
}

fn log_probe_failure(error: &ProbeError) {
    match error {
        ProbeError::Network(_) => debug!("Probe failed, treating as offline: {}", error),
        ProbeError::Parse(_) => warn!("Probe returned unusable data, treating as offline: {}", error),
    }
}
