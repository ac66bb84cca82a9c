//! Connectivity state machine
//!
//! Turns probe results into an Online/Offline classification and decides
//! when a classification may produce a notification. Gating is keyed on the
//! raw observed value: every change of the probed IP (or a switch between a
//! real IP and the unreachable sentinel) re-arms the gate, and while the raw
//! value stays constant at most one notification per status is emitted.

use super::types::{
    Classification, ConnectivityStatus, NetworkIdentity, NotificationRequest, OfflineReason,
    ProbeResult, UNREACHABLE_SENTINEL,
};

/// Classify a probe result against the saved reference identity
///
/// Total over all inputs: always returns `Online` or `Offline`.
pub fn classify(probe: &ProbeResult, reference: Option<&NetworkIdentity>) -> Classification {
    match (probe, reference) {
        (Err(_), _) => Classification::Offline(OfflineReason::ProbeFailed),
        (Ok(_), None) => Classification::Offline(OfflineReason::NoReference),
        (Ok(ip), Some(identity)) if *ip == identity.reference_ip => Classification::Online,
        (Ok(_), Some(_)) => Classification::Offline(OfflineReason::Mismatch),
    }
}

/// Raw observed value used for re-arming
pub fn raw_value(probe: &ProbeResult) -> String {
    match probe {
        Ok(ip) => ip.to_string(),
        Err(_) => UNREACHABLE_SENTINEL.to_string(),
    }
}

/// Working state of the state machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityState {
    /// Current classification
    pub status: ConnectivityStatus,
    /// Status most recently notified within the current arming cycle
    pub last_notified: Option<ConnectivityStatus>,
    /// Raw value observed by the previous cycle
    pub last_raw_ip: Option<String>,
}

/// Everything one cycle decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Classification of the probe result
    pub classification: Classification,
    /// Status before this cycle
    pub previous: ConnectivityStatus,
    /// Raw value observed this cycle
    pub raw: String,
    /// Whether the gate was re-armed because the raw value changed
    pub rearmed: bool,
    /// Notification to dispatch, if the gate allowed one
    pub notification: Option<NotificationRequest>,
    /// Whether the worker should be re-registered
    pub recover: bool,
}

impl Transition {
    /// Status after this cycle
    pub fn status(&self) -> ConnectivityStatus {
        self.classification.status()
    }

    /// Whether the classification differs from the previous cycle
    pub fn status_changed(&self) -> bool {
        self.previous != self.status()
    }
}

impl ConnectivityState {
    /// Create a fresh state with status `Unknown` and an armed gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh state that remembers a raw value from a previous run
    ///
    /// The gate stays armed: the first cycle always notifies.
    pub fn with_last_raw_ip(last_raw_ip: Option<String>) -> Self {
        Self {
            last_raw_ip,
            ..Self::default()
        }
    }

    /// Whether the gate is armed (next cycle will notify regardless of status)
    pub fn is_armed(&self) -> bool {
        self.last_notified.is_none()
    }

    /// Feed one probe result into the state machine
    ///
    /// The arming state advances as soon as a notification is decided, so
    /// delivery failures downstream never cause a repeat.
    pub fn advance(
        &mut self,
        probe: &ProbeResult,
        reference: Option<&NetworkIdentity>,
    ) -> Transition {
        let classification = classify(probe, reference);
        let target = classification.status();
        let raw = raw_value(probe);
        let previous = self.status;

        let rearmed = self.last_raw_ip.as_deref() != Some(raw.as_str());
        if rearmed {
            self.last_notified = None;
            self.last_raw_ip = Some(raw.clone());
        }

        self.status = target;

        let notification = if self.last_notified != Some(target) {
            self.last_notified = Some(target);
            Some(NotificationRequest::for_status(target, reference))
        } else {
            None
        };

        // Recovery shares the notification gate
        let recover = notification.is_some()
            && classification == Classification::Offline(OfflineReason::Mismatch);

        Transition {
            classification,
            previous,
            raw,
            rearmed,
            notification,
            recover,
        }
    }
}
