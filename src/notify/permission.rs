//! Notification permission
//!
//! Permission is tri-state. Requesting it asks a [`PermissionPrompt`]
//! (the TUI, in practice) and resolves to granted or denied; the outcome is
//! persisted through the settings manager when one is attached.

use crate::storage::SettingsManager;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::{oneshot, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Notification permission state
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// Never asked
    #[default]
    Default,
    /// User allowed notifications
    Granted,
    /// User refused notifications
    Denied,
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("not requested"),
            Self::Granted => f.write_str("granted"),
            Self::Denied => f.write_str("denied"),
        }
    }
}

/// Asks the user whether notifications may be shown
#[async_trait]
pub trait PermissionPrompt: Send + Sync {
    /// Resolve to `true` if the user allowed notifications
    async fn ask(&self) -> bool;
}

/// Owns the permission state
pub struct PermissionBroker {
    state: RwLock<PermissionState>,
    settings: Option<SettingsManager>,
}

impl PermissionBroker {
    /// Create a broker that keeps state in memory only
    pub fn new(initial: PermissionState) -> Self {
        Self {
            state: RwLock::new(initial),
            settings: None,
        }
    }

    /// Create a broker that loads and persists state through `settings`
    pub async fn with_settings(settings: SettingsManager) -> Self {
        let initial = settings.get_notification_permission().await;
        Self {
            state: RwLock::new(initial),
            settings: Some(settings),
        }
    }

    /// Current permission state
    pub async fn state(&self) -> PermissionState {
        *self.state.read().await
    }

    /// Request permission
    ///
    /// Resolves immediately when already granted, otherwise asks `prompt`.
    pub async fn request(&self, prompt: &dyn PermissionPrompt) -> PermissionState {
        if self.state().await == PermissionState::Granted {
            debug!("Notification permission already granted");
            return PermissionState::Granted;
        }

        let outcome = if prompt.ask().await {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };

        *self.state.write().await = outcome;

        if let Some(settings) = &self.settings {
            if let Err(e) = settings.set_notification_permission(outcome).await {
                warn!("Failed to persist notification permission: {}", e);
            }
        }

        match outcome {
            PermissionState::Granted => info!("Notification permission granted"),
            _ => warn!("Notification permission denied"),
        }

        outcome
    }
}

/// Prompt answered from an interactive front-end
///
/// `ask` parks a pending question that the UI picks up through
/// [`InteractivePrompt::is_waiting`] and resolves with
/// [`InteractivePrompt::answer`].
#[derive(Default)]
pub struct InteractivePrompt {
    pending: Mutex<Option<oneshot::Sender<bool>>>,
}

impl InteractivePrompt {
    /// Create a prompt with no pending question
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a question is waiting for an answer
    pub fn is_waiting(&self) -> bool {
        self.pending
            .try_lock()
            .map(|pending| pending.is_some())
            .unwrap_or(false)
    }

    /// Answer the pending question
    ///
    /// Returns `false` if nothing was waiting.
    pub async fn answer(&self, granted: bool) -> bool {
        match self.pending.lock().await.take() {
            Some(sender) => sender.send(granted).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl PermissionPrompt for InteractivePrompt {
    async fn ask(&self) -> bool {
        let (sender, receiver) = oneshot::channel();

        if self.pending.lock().await.replace(sender).is_some() {
            debug!("Superseding an unanswered permission question");
        }

        // A dropped question counts as a refusal
        receiver.await.unwrap_or(false)
    }
}
