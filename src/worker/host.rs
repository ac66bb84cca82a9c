//! Background delivery worker
//!
//! The worker is the durable delivery channel for notifications: a tokio
//! task that keeps running independently of the foreground view and forwards
//! every notification it receives to the outbox read by presentation code.
//! At most one registration is active at a time. Stopping a worker closes
//! its queue and lets it deliver what was already handed to it.

use crate::connectivity::NotificationRequest;
use crate::notify::NotificationError;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle to a registered delivery worker
#[derive(Debug, Clone)]
pub struct WorkerRegistration {
    /// Unique id of this registration
    pub id: u64,
    /// Identifier the worker was registered under
    pub script_path: String,
    sender: mpsc::UnboundedSender<NotificationRequest>,
}

impl WorkerRegistration {
    /// Create a registration that delivers into `sender`
    pub fn new(
        id: u64,
        script_path: impl Into<String>,
        sender: mpsc::UnboundedSender<NotificationRequest>,
    ) -> Self {
        Self {
            id,
            script_path: script_path.into(),
            sender,
        }
    }

    /// Hand a notification to the worker
    ///
    /// # Errors
    /// Returns `NotificationError::Delivery` if the worker has stopped
    pub fn show_notification(&self, request: NotificationRequest) -> std::result::Result<(), NotificationError> {
        self.sender
            .send(request)
            .map_err(|_| NotificationError::Delivery(format!("worker {} has stopped", self.id)))
    }

    /// Whether the worker behind this registration is still receiving
    pub fn is_alive(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Control surface for the background worker
#[async_trait]
pub trait WorkerControl: Send + Sync {
    /// Currently active registration, if any
    async fn current_registration(&self) -> Option<WorkerRegistration>;

    /// Stop the worker behind `registration`
    async fn unregister(&self, registration: &WorkerRegistration) -> Result<()>;

    /// Start a fresh worker under `script_path`, replacing any active one
    async fn register(&self, script_path: &str) -> Result<WorkerRegistration>;
}

/// A notification the worker has shown
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeliveredNotification {
    /// Notification title
    pub title: String,
    /// Notification body
    pub body: String,
    /// Registration that delivered it
    pub worker_id: u64,
    /// Delivery time
    pub delivered_at: DateTime<Utc>,
}

struct ActiveWorker {
    registration: WorkerRegistration,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ActiveWorker {
    /// Close the queue and wait until queued notifications are delivered
    async fn stop(self) {
        let id = self.registration.id;
        // The task may already be gone if its channel closed
        let _ = self.stop.send(());

        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                warn!("Worker {} task failed: {}", id, e);
            }
        }
    }
}

/// In-process worker host
///
/// Spawns one delivery task per registration. Registering requires a tokio
/// runtime context.
pub struct LocalWorkerHost {
    active: Mutex<Option<ActiveWorker>>,
    outbox: mpsc::UnboundedSender<DeliveredNotification>,
    next_id: AtomicU64,
}

impl LocalWorkerHost {
    /// Create a host and the receiving end of its outbox
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DeliveredNotification>) {
        let (outbox, outbox_rx) = mpsc::unbounded_channel();
        let host = Self {
            active: Mutex::new(None),
            outbox,
            next_id: AtomicU64::new(1),
        };
        (host, outbox_rx)
    }

    /// Stop the active worker, if any
    pub async fn shutdown(&self) {
        let worker = self.active.lock().await.take();
        if let Some(worker) = worker {
            let id = worker.registration.id;
            worker.stop().await;
            info!("Worker {} stopped on shutdown", id);
        }
    }

    fn spawn_worker(&self, id: u64, script_path: &str) -> ActiveWorker {
        let (sender, mut receiver) = mpsc::unbounded_channel::<NotificationRequest>();
        let (stop, mut stop_rx) = oneshot::channel::<()>();
        let outbox = self.outbox.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    request = receiver.recv() => match request {
                        Some(request) => deliver(&outbox, id, request),
                        None => break,
                    },
                    _ = &mut stop_rx => {
                        // Refuse new work, then flush the backlog
                        receiver.close();
                        while let Some(request) = receiver.recv().await {
                            deliver(&outbox, id, request);
                        }
                        break;
                    }
                }
            }
            debug!("Worker {} channel closed", id);
        });

        ActiveWorker {
            registration: WorkerRegistration::new(id, script_path, sender),
            stop,
            task,
        }
    }
}

#[async_trait]
impl WorkerControl for LocalWorkerHost {
    async fn current_registration(&self) -> Option<WorkerRegistration> {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|worker| worker.registration.clone())
    }

    async fn unregister(&self, registration: &WorkerRegistration) -> Result<()> {
        let mut active = self.active.lock().await;

        let is_active = active
            .as_ref()
            .is_some_and(|worker| worker.registration.id == registration.id);
        if !is_active {
            return Err(Error::Worker(format!(
                "Registration {} is not active",
                registration.id
            )));
        }

        if let Some(worker) = active.take() {
            worker.stop().await;
        }
        info!("Unregistered worker {} ({})", registration.id, registration.script_path);
        Ok(())
    }

    async fn register(&self, script_path: &str) -> Result<WorkerRegistration> {
        if script_path.trim().is_empty() {
            return Err(Error::Worker("Worker script path is empty".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let worker = self.spawn_worker(id, script_path);
        let registration = worker.registration.clone();

        let previous = self.active.lock().await.replace(worker);
        if let Some(previous) = previous {
            warn!("Replacing active worker {}", previous.registration.id);
            previous.stop().await;
        }

        info!("Registered worker {} at {}", id, script_path);
        Ok(registration)
    }
}

fn deliver(outbox: &mpsc::UnboundedSender<DeliveredNotification>, id: u64, request: NotificationRequest) {
    info!("🔔 {}: {}", request.title, request.body);
    let delivered = DeliveredNotification {
        title: request.title,
        body: request.body,
        worker_id: id,
        delivered_at: Utc::now(),
    };
    if outbox.send(delivered).is_err() {
        debug!("Outbox closed, worker {} dropping notification", id);
    }
}

impl Drop for LocalWorkerHost {
    fn drop(&mut self) {
        // Cancel the delivery task on drop
        if let Some(worker) = self.active.try_lock().ok().and_then(|mut guard| guard.take()) {
            worker.task.abort();
        }
    }
}
