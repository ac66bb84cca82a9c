//! Netpresence - saved-network presence tracking
//!
//! This library watches whether the machine is attached to one previously
//! saved network (recognised by its public IP address) and raises a desktop
//! reminder whenever that attachment is gained or lost, so the user remembers
//! to clock in or out of their attendance tool.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod connectivity;
pub mod notify;
pub mod storage;
pub mod tui;
pub mod worker;

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Result type alias for Netpresence operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Netpresence operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Persistent storage error (settings or identity files)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid or unusable configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Background worker control error
    #[error("Worker error: {0}")]
    Worker(String),

    /// Public IP probe error
    #[error("Probe error: {0}")]
    Probe(#[from] connectivity::ProbeError),

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the Netpresence library with logging to stderr
///
/// Honors `RUST_LOG`, defaulting to `info`.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .init();
}

/// Initialize logging into a file instead of the terminal
///
/// Used by the TUI so log lines do not corrupt the alternate screen.
pub fn init_with_log_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install log subscriber: {}", e)))
}

#[cfg(test)]
mod tests;
