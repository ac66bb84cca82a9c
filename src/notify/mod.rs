//! Notification module
//!
//! - `permission` - Tri-state permission and the request flow
//! - `dispatcher` - Best-effort delivery through the background worker

pub mod dispatcher;
pub mod permission;

pub use dispatcher::{NotificationDispatcher, NotificationError, Notifier};
pub use permission::{InteractivePrompt, PermissionBroker, PermissionPrompt, PermissionState};
