//! Saved network identity

use crate::connectivity::NetworkIdentity;
use crate::storage::kv::KeyValueStore;
use crate::Result;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Key holding the saved network label
pub const LABEL_KEY: &str = "network_label";
/// Key holding the saved reference IP
pub const REFERENCE_IP_KEY: &str = "network_ip";
/// Key holding the raw value observed by the most recent cycle
pub const LAST_RAW_IP_KEY: &str = "last_raw_ip";

/// Holds the reference network identity and the last observed raw IP
///
/// Only the explicit "save current network" action writes the identity;
/// the monitor records the raw IP after each cycle that observed a new value.
#[derive(Clone)]
pub struct IdentityStore {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityStore {
    /// Wrap a key-value store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the saved identity
    ///
    /// Returns `None` when either key is missing. A stored IP that no longer
    /// parses is treated as missing.
    pub fn load(&self) -> Result<Option<NetworkIdentity>> {
        let label = self.store.get(LABEL_KEY)?;
        let ip = self.store.get(REFERENCE_IP_KEY)?;

        let (Some(label), Some(ip)) = (label, ip) else {
            return Ok(None);
        };

        match ip.parse::<IpAddr>() {
            Ok(reference_ip) => Ok(Some(NetworkIdentity::new(label, reference_ip))),
            Err(_) => {
                warn!("Ignoring saved network {:?}: invalid reference IP {:?}", label, ip);
                Ok(None)
            }
        }
    }

    /// Overwrite the saved identity
    pub fn save(&self, identity: &NetworkIdentity) -> Result<()> {
        let reference_ip = identity.reference_ip.to_string();
        self.store.set_many(&[
            (LABEL_KEY, identity.label.as_str()),
            (REFERENCE_IP_KEY, reference_ip.as_str()),
        ])?;
        info!("Saved network {:?} ({})", identity.label, identity.reference_ip);
        Ok(())
    }

    /// Forget the saved identity
    pub fn clear(&self) -> Result<()> {
        self.store.remove(LABEL_KEY)?;
        self.store.remove(REFERENCE_IP_KEY)?;
        info!("Cleared saved network");
        Ok(())
    }

    /// Raw value observed by the most recent cycle (possibly from a previous run)
    pub fn last_raw_ip(&self) -> Result<Option<String>> {
        self.store.get(LAST_RAW_IP_KEY)
    }

    /// Record the raw value observed by a cycle
    pub fn record_raw_ip(&self, raw: &str) -> Result<()> {
        self.store.set(LAST_RAW_IP_KEY, raw)
    }
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityStore").finish_non_exhaustive()
    }
}
