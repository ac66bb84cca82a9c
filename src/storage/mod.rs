//! Local storage module
//!
//! This module handles everything that survives a restart:
//! - `settings` - Application settings and monitor configuration
//! - `settings_manager` - Thread-safe settings management
//! - `kv` - Persisted string key-value stores
//! - `identity` - The saved network identity and last observed IP

// Submodules
pub mod identity;
pub mod kv;
pub mod settings;
pub mod settings_manager;

// Re-export commonly used types
pub use identity::IdentityStore;
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use settings::{MonitorConfig, Settings};
pub use settings_manager::SettingsManager;
