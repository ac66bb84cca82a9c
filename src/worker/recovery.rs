//! Worker recovery
//!
//! When the machine shows up on a network other than the saved one, the
//! delivery worker is torn down and registered again so a stale worker
//! cannot swallow the reminders that follow.

use super::host::{WorkerControl, WorkerRegistration};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that can occur while re-registering the worker
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// No registration is controlling the process
    #[error("No active worker registration")]
    NoActiveRegistration,

    /// Unregistering the current worker failed
    #[error("Unregister failed: {0}")]
    Unregister(String),

    /// Registering the fresh worker failed
    #[error("Register failed: {0}")]
    Register(String),
}

/// Something that can be asked to recover the delivery channel
#[async_trait]
pub trait Recoverer: Send + Sync {
    /// Run recovery; failures are absorbed
    async fn recover(&self);
}

/// Forces re-registration of the background worker
pub struct RecoveryAgent {
    worker: Arc<dyn WorkerControl>,
    script_path: String,
}

impl RecoveryAgent {
    /// Create an agent that re-registers workers at `script_path`
    pub fn new(worker: Arc<dyn WorkerControl>, script_path: impl Into<String>) -> Self {
        Self {
            worker,
            script_path: script_path.into(),
        }
    }

    /// Unregister the active worker and register a fresh one
    ///
    /// # Errors
    /// Returns the step that failed. A failed register leaves no worker active.
    pub async fn try_recover(&self) -> Result<WorkerRegistration, RecoveryError> {
        let current = self
            .worker
            .current_registration()
            .await
            .ok_or(RecoveryError::NoActiveRegistration)?;

        debug!("Recovering worker {} ({})", current.id, current.script_path);

        self.worker
            .unregister(&current)
            .await
            .map_err(|e| RecoveryError::Unregister(e.to_string()))?;

        self.worker
            .register(&self.script_path)
            .await
            .map_err(|e| RecoveryError::Register(e.to_string()))
    }
}

#[async_trait]
impl Recoverer for RecoveryAgent {
    async fn recover(&self) {
        match self.try_recover().await {
            Ok(registration) => {
                info!("Worker re-registered as {} at {}", registration.id, registration.script_path);
            }
            Err(RecoveryError::NoActiveRegistration) => {
                debug!("Skipping worker recovery: no active registration");
            }
            Err(e) => {
                error!("Worker recovery failed: {}", e);
            }
        }
    }
}
