//! Background worker module
//!
//! - `host` - Worker control surface and the in-process delivery worker
//! - `recovery` - Forced re-registration of the worker

pub mod host;
pub mod recovery;

pub use host::{DeliveredNotification, LocalWorkerHost, WorkerControl, WorkerRegistration};
pub use recovery::{Recoverer, RecoveryAgent, RecoveryError};
