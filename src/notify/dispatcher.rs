//! Notification dispatcher

use super::permission::{PermissionBroker, PermissionState};
use crate::connectivity::NotificationRequest;
use crate::worker::WorkerControl;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a notification was not delivered
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// Permission is not in the granted state
    #[error("Notification permission not granted ({0})")]
    PermissionNotGranted(PermissionState),

    /// No worker registration is available to deliver through
    #[error("Delivery channel not ready")]
    ChannelNotReady,

    /// The worker refused the notification
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Something that shows notifications on behalf of the state machine
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Best-effort delivery; never fails the caller
    async fn dispatch(&self, request: &NotificationRequest);
}

/// Routes notifications through the background worker
pub struct NotificationDispatcher {
    permission: Arc<PermissionBroker>,
    worker: Arc<dyn WorkerControl>,
}

impl NotificationDispatcher {
    /// Create a dispatcher
    pub fn new(permission: Arc<PermissionBroker>, worker: Arc<dyn WorkerControl>) -> Self {
        Self { permission, worker }
    }

    /// Deliver a notification, reporting why it could not be shown
    pub async fn try_dispatch(&self, request: &NotificationRequest) -> Result<(), NotificationError> {
        let permission = self.permission.state().await;
        if permission != PermissionState::Granted {
            return Err(NotificationError::PermissionNotGranted(permission));
        }

        let registration = self
            .worker
            .current_registration()
            .await
            .ok_or(NotificationError::ChannelNotReady)?;

        registration.show_notification(request.clone())?;
        debug!("Notification '{}' handed to worker {}", request.title, registration.id);
        Ok(())
    }
}

#[async_trait]
impl Notifier for NotificationDispatcher {
    async fn dispatch(&self, request: &NotificationRequest) {
        if let Err(e) = self.try_dispatch(request).await {
            warn!("Notification '{}' not shown: {}", request.title, e);
        }
    }
}
