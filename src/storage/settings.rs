//! Application settings and configuration

use crate::notify::PermissionState;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest poll interval accepted through the settings manager
pub const MIN_POLL_INTERVAL_MS: u64 = 1_000;
/// Largest poll interval accepted through the settings manager
pub const MAX_POLL_INTERVAL_MS: u64 = 30_000;

/// Application settings
///
/// Persistent configuration for Netpresence.
/// Settings are stored in JSON format and can be loaded/saved from disk.
///
/// # Example
/// ```rust,no_run
/// use netpresence::storage::Settings;
///
/// // Load settings (returns default if file doesn't exist)
/// let mut settings = Settings::load("settings.json").expect("Failed to load");
///
/// // Update poll interval and auto-save
/// settings.update_poll_interval(10_000, "settings.json").expect("Failed to update");
///
/// println!("Polling every {} ms", settings.poll_interval_ms);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Interval between scheduled probes in milliseconds
    pub poll_interval_ms: u64,
    /// IP echo endpoint returning `{"ip": "..."}`
    pub endpoint_url: String,
    /// Transport timeout for a single probe in seconds
    pub request_timeout_secs: u64,
    /// Sampling period of the local link watcher in milliseconds
    pub link_check_interval_ms: u64,
    /// Identifier the delivery worker is registered under
    pub worker_script_path: String,
    /// Persisted notification permission
    pub notification_permission: PermissionState,
    /// Key-value file holding the saved network identity
    pub identity_path: String,
    /// Log file used by the terminal front-end
    pub log_path: String,
}

/// Immutable subset of settings injected into the monitor at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Interval between scheduled probes
    pub poll_interval: Duration,
    /// IP echo endpoint
    pub endpoint_url: String,
    /// Transport timeout for a single probe
    pub request_timeout: Duration,
    /// Sampling period of the local link watcher
    pub link_check_interval: Duration,
    /// Identifier the delivery worker is registered under
    pub worker_script_path: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Settings::default().monitor_config()
    }
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the settings file
    ///
    /// # Returns
    /// The loaded settings, or default settings if file doesn't exist
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Storage(format!("Failed to read settings: {}", e)))?;

        // Handle empty file (return defaults)
        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Self = serde_json::from_str(&data)
            .map_err(|e| Error::Storage(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Save settings to a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to save the settings file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create settings directory: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Storage(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, json)
            .map_err(|e| Error::Storage(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    /// Update the poll interval and auto-save
    ///
    /// The value is clamped to `MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS`.
    pub fn update_poll_interval<P: AsRef<std::path::Path>>(&mut self, interval_ms: u64, save_path: P) -> Result<()> {
        self.poll_interval_ms = interval_ms.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        self.save(save_path)
    }

    /// Derive the monitor configuration
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            // A zero interval would make tokio::time::interval panic
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            endpoint_url: self.endpoint_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            link_check_interval: Duration::from_millis(self.link_check_interval_ms.max(1)),
            worker_script_path: self.worker_script_path.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5_000,
            endpoint_url: "https://api64.ipify.org?format=json".to_string(),
            request_timeout_secs: 5,
            link_check_interval_ms: 1_000,
            worker_script_path: "notification-worker".to_string(),
            notification_permission: PermissionState::Default,
            identity_path: "./app_data/identity.json".to_string(),
            log_path: "./app_data/netpresence.log".to_string(),
        }
    }
}
