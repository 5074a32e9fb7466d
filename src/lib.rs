//! syncguard - validation and access control for replicated document writes
//!
//! Every write to a synchronized document store passes through
//! [`sync::SyncPipeline`]: the document's type is identified, the caller is
//! authorized, the content is validated, and the accepted write is assigned
//! channels and access grants.

pub mod access;
pub mod cli;
pub mod config;
pub mod observability;
pub mod schema;
pub mod sync;
pub mod validation;
