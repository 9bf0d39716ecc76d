//! Background GitHub synchronization

pub mod sync;

pub use sync::{FailureNotifier, SyncJob, SyncReport};
