//! Repository host abstraction.
//!
//! This module provides a `RepoHost` trait for reading and updating pull
//! requests on the hosting platform (GitHub, etc.).

mod github;
mod types;

pub use github::GithubRepoHost;
pub use types::*;
