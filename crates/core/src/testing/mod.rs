//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of the external collaborator
//! traits, allowing the reconciliation engine to be exercised end-to-end
//! without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use prsync_core::testing::{MockNotifier, MockRepoHost, MockTracker};
//!
//! let repo_host = MockRepoHost::new("Fix login bug AB-42", Some("body"));
//! let tracker = MockTracker::new();
//!
//! // Configure mock responses
//! tracker.set_summary("Login broken").await;
//!
//! // Wire into a Reconciler...
//! ```

mod mock_notifier;
mod mock_repo_host;
mod mock_tracker;

pub use mock_notifier::MockNotifier;
pub use mock_repo_host::MockRepoHost;
pub use mock_tracker::MockTracker;
