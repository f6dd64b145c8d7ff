//! Issue tracker abstraction.
//!
//! This module provides a `Tracker` trait for the issue-tracker operations
//! the engine performs (summary reads, creation, transitions, assignment,
//! comments, fix versions, sprints) and a Jira implementation.

pub mod comment;
mod jira;
mod types;

pub use jira::JiraTracker;
pub use types::*;
