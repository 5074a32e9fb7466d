//! # Sync
//!
//! The write pipeline: every incoming revision is identified, authorized,
//! validated, and then assigned channels and access grants. The first step
//! to refuse stops the write.

mod actions;
mod errors;
mod pipeline;
mod resolver;

pub use actions::{ActionMetadata, CustomActionFn, CustomActions, LifecycleEvent};
pub use errors::{SyncError, SyncResult};
pub use pipeline::{SyncPipeline, WriteOutcome};
pub use resolver::resolve_type;
