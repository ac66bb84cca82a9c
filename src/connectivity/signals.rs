//! Platform connectivity signals
//!
//! Edge-triggered "became reachable" / "became unreachable" events. They
//! only prompt an immediate probe; the poll loop keeps running either way.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Capacity of the signal channel handed to the poll loop
const SIGNAL_CHANNEL_CAPACITY: usize = 8;

/// A connectivity transition reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivitySignal {
    /// The host gained a network route
    BecameReachable,
    /// The host lost its network route
    BecameUnreachable,
}

/// Compute the signal for a new link sample
///
/// The first sample only establishes a baseline and never signals.
pub fn edge(previous: Option<bool>, current: bool) -> Option<ConnectivitySignal> {
    match (previous, current) {
        (Some(false), true) => Some(ConnectivitySignal::BecameReachable),
        (Some(true), false) => Some(ConnectivitySignal::BecameUnreachable),
        _ => None,
    }
}

/// Samples whether the host currently has a usable network route
pub trait LinkProbe: Send + Sync {
    /// `true` if a route exists
    fn has_route(&self) -> bool;
}

/// Route check using an unconnected UDP socket
///
/// `connect` on a UDP socket only consults the routing table; no packet is
/// sent. Without a route the call fails or leaves an unspecified local address.
#[derive(Debug, Clone)]
pub struct UdpRouteProbe {
    target: SocketAddr,
}

impl UdpRouteProbe {
    /// Check routes towards `target`
    pub fn new(target: SocketAddr) -> Self {
        Self { target }
    }
}

impl Default for UdpRouteProbe {
    fn default() -> Self {
        Self::new(SocketAddr::from((Ipv4Addr::new(1, 1, 1, 1), 80)))
    }
}

impl LinkProbe for UdpRouteProbe {
    fn has_route(&self) -> bool {
        let bind_addr = if self.target.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((std::net::Ipv6Addr::UNSPECIFIED, 0))
        };

        UdpSocket::bind(bind_addr)
            .and_then(|socket| {
                socket.connect(self.target)?;
                socket.local_addr()
            })
            .map(|local| !local.ip().is_unspecified())
            .unwrap_or(false)
    }
}

/// Turns periodic link samples into connectivity signals
pub struct LinkWatcher {
    probe: Arc<dyn LinkProbe>,
    interval: Duration,
}

impl LinkWatcher {
    /// Create a watcher sampling `probe` every `interval`
    pub fn new(probe: Arc<dyn LinkProbe>, interval: Duration) -> Self {
        Self { probe, interval }
    }

    /// Start watching
    ///
    /// The task stops by itself once the receiver is dropped; abort the
    /// returned handle to stop it earlier. Requires a tokio runtime context.
    pub fn subscribe(self) -> (mpsc::Receiver<ConnectivitySignal>, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(SIGNAL_CHANNEL_CAPACITY);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            let mut previous = None;

            loop {
                ticker.tick().await;
                if sender.is_closed() {
                    debug!("Signal receiver dropped, stopping link watcher");
                    break;
                }

                let current = self.probe.has_route();
                if let Some(signal) = edge(previous, current) {
                    info!("Platform connectivity signal: {:?}", signal);
                    if sender.send(signal).await.is_err() {
                        debug!("Signal receiver dropped, stopping link watcher");
                        break;
                    }
                }
                previous = Some(current);
            }
        });

        (receiver, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_baseline() {
        assert_eq!(edge(None, true), None);
        assert_eq!(edge(None, false), None);
    }

    #[test]
    fn test_edges() {
        assert_eq!(edge(Some(false), true), Some(ConnectivitySignal::BecameReachable));
        assert_eq!(edge(Some(true), false), Some(ConnectivitySignal::BecameUnreachable));
        assert_eq!(edge(Some(true), true), None);
        assert_eq!(edge(Some(false), false), None);
    }
}
