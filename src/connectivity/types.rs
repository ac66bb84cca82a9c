//! Common types for connectivity module

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use thiserror::Error;

/// Raw value recorded for a probe that could not determine an IP address
pub const UNREACHABLE_SENTINEL: &str = "<unreachable>";

/// Label used in notification texts when no network has been saved yet
const UNSAVED_NETWORK_LABEL: &str = "your saved network";

/// The user-saved network we care about
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkIdentity {
    /// Human readable name chosen by the user (e.g. "Office")
    pub label: String,
    /// Public IP address observed when the network was saved
    pub reference_ip: IpAddr,
}

impl NetworkIdentity {
    /// Create a new network identity
    pub fn new(label: impl Into<String>, reference_ip: IpAddr) -> Self {
        Self {
            label: label.into(),
            reference_ip,
        }
    }
}

/// Errors that can occur while probing the public IP address
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// Transport failure reaching the endpoint, including timeouts
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with something that is not an IP address
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Outcome of one probe cycle
pub type ProbeResult = std::result::Result<IpAddr, ProbeError>;

/// Online/offline judgment relative to the saved network
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ConnectivityStatus {
    /// No probe has completed yet
    #[default]
    Unknown,
    /// Attached to the saved network
    Online,
    /// Not attached to the saved network (or no network saved, or probe failed)
    Offline,
}

impl ConnectivityStatus {
    /// Short display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a probe was classified as offline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineReason {
    /// The probe itself failed
    ProbeFailed,
    /// No network identity has been saved
    NoReference,
    /// Attached to some network other than the saved one
    Mismatch,
}

/// Classification of a single probe result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Probe IP equals the saved reference IP
    Online,
    /// Anything else
    Offline(OfflineReason),
}

impl Classification {
    /// Status this classification maps to
    pub fn status(&self) -> ConnectivityStatus {
        match self {
            Self::Online => ConnectivityStatus::Online,
            Self::Offline(_) => ConnectivityStatus::Offline,
        }
    }
}

/// A user-visible notification to be shown by the dispatcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Notification title
    pub title: String,
    /// Notification body
    pub body: String,
}

impl NotificationRequest {
    /// Create a notification request
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Build the reminder shown when the status becomes `status`
    pub fn for_status(status: ConnectivityStatus, reference: Option<&NetworkIdentity>) -> Self {
        let label = reference
            .map(|identity| identity.label.as_str())
            .unwrap_or(UNSAVED_NETWORK_LABEL);

        match status {
            ConnectivityStatus::Online => Self::new(
                "✅ Wi-Fi connected",
                format!("Connected to {}. Remember to clock in.", label),
            ),
            ConnectivityStatus::Offline | ConnectivityStatus::Unknown => Self::new(
                "❌ Wi-Fi disconnected",
                format!("Disconnected from {}. Remember to clock out.", label),
            ),
        }
    }
}
