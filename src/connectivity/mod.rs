//! Connectivity module for saved-network detection
//!
//! This module decides whether the machine is attached to the saved network:
//! - `probe` - Public IP lookup over HTTP
//! - `machine` - Online/Offline classification and notification gating
//! - `monitor` - Serialized probe → classify → dispatch → recover cycle
//! - `signals` - Platform "became reachable/unreachable" events
//! - `poll` - Interval and signal driven scheduling of cycles

// Submodules
pub mod machine;
pub mod monitor;
pub mod poll;
pub mod probe;
pub mod signals;
pub mod types;

// Re-export commonly used types
pub use types::{
    Classification, ConnectivityStatus, NetworkIdentity, NotificationRequest, OfflineReason,
    ProbeError, ProbeResult, UNREACHABLE_SENTINEL,
};

// Re-export main functions
pub use machine::{classify, raw_value, ConnectivityState, Transition};
pub use monitor::{ConnectivityMonitor, MonitorSnapshot};
pub use poll::{PollLoop, PollLoopHandle};
pub use probe::{parse_ip_response, HttpIpProbe, IpProbe};
pub use signals::{edge, ConnectivitySignal, LinkProbe, LinkWatcher, UdpRouteProbe};
