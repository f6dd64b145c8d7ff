//! Reconciliation engine.
//!
//! Consumes the collaborator capability traits and drives one of four
//! mutually exclusive execution modes to completion: webhook relay,
//! append-description-only, create-issue, and full sync.

mod engine;
mod types;

pub use engine::Reconciler;
pub use types::{ResolvedTicket, SyncError, SyncOutcome};
