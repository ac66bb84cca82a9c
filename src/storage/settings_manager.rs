//! Thread-safe settings manager for concurrent access

use crate::notify::PermissionState;
use crate::storage::settings::{MonitorConfig, Settings};
use crate::Result;

/// Thread-safe settings manager shared by the monitor and the UI layer
///
/// Provides shared access to application settings with automatic persistence.
///
/// # Example
/// ```rust,no_run
/// use netpresence::storage::SettingsManager;
///
/// # async fn example() -> netpresence::Result<()> {
/// let manager = SettingsManager::new("settings.json").await?;
///
/// let config = manager.monitor_config().await;
/// println!("Polling {} every {:?}", config.endpoint_url, config.poll_interval);
///
/// // Update settings (auto-saves)
/// manager.set_poll_interval_ms(10_000).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SettingsManager {
    /// Shared settings state
    settings: std::sync::Arc<tokio::sync::RwLock<Settings>>,
    /// Path to settings file for auto-save
    settings_path: std::sync::Arc<String>,
}

impl SettingsManager {
    /// Create a new settings manager
    ///
    /// Loads settings from the specified path, or creates default settings if the file doesn't exist.
    pub async fn new<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let settings = Settings::load(&path)?;

        Ok(Self {
            settings: std::sync::Arc::new(tokio::sync::RwLock::new(settings)),
            settings_path: std::sync::Arc::new(path_str),
        })
    }

    /// Get the poll interval in milliseconds
    pub async fn get_poll_interval_ms(&self) -> u64 {
        let settings = self.settings.read().await;
        settings.poll_interval_ms
    }

    /// Set the poll interval (clamped) and auto-save
    pub async fn set_poll_interval_ms(&self, interval_ms: u64) -> Result<()> {
        let mut settings = self.settings.write().await;
        settings.update_poll_interval(interval_ms, self.settings_path.as_str())
    }

    /// Get the IP echo endpoint
    pub async fn get_endpoint_url(&self) -> String {
        let settings = self.settings.read().await;
        settings.endpoint_url.clone()
    }

    /// Set the IP echo endpoint and auto-save
    pub async fn set_endpoint_url(&self, url: String) -> Result<()> {
        let mut settings = self.settings.write().await;
        settings.endpoint_url = url;
        settings.save(self.settings_path.as_str())
    }

    /// Get the persisted notification permission
    pub async fn get_notification_permission(&self) -> PermissionState {
        let settings = self.settings.read().await;
        settings.notification_permission
    }

    /// Persist the notification permission
    pub async fn set_notification_permission(&self, permission: PermissionState) -> Result<()> {
        let mut settings = self.settings.write().await;
        settings.notification_permission = permission;
        settings.save(self.settings_path.as_str())
    }

    /// Get the identity store path
    pub async fn get_identity_path(&self) -> String {
        let settings = self.settings.read().await;
        settings.identity_path.clone()
    }

    /// Get the log file path
    pub async fn get_log_path(&self) -> String {
        let settings = self.settings.read().await;
        settings.log_path.clone()
    }

    /// Derive the monitor configuration from the current settings
    pub async fn monitor_config(&self) -> MonitorConfig {
        let settings = self.settings.read().await;
        settings.monitor_config()
    }

    /// Get a clone of all settings (for reading multiple values at once)
    pub async fn get_all(&self) -> Settings {
        let settings = self.settings.read().await;
        settings.clone()
    }

    /// Update multiple settings at once and auto-save
    pub async fn update<F>(&self, update_fn: F) -> Result<()>
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        update_fn(&mut settings);
        settings.save(self.settings_path.as_str())
    }

    /// Reload settings from disk
    pub async fn reload(&self) -> Result<()> {
        let loaded = Settings::load(self.settings_path.as_str())?;
        let mut settings = self.settings.write().await;
        *settings = loaded;
        Ok(())
    }

    /// Save current settings to disk
    pub async fn save(&self) -> Result<()> {
        let settings = self.settings.read().await;
        settings.save(self.settings_path.as_str())
    }
}
