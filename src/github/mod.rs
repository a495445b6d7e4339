// GitHub API module.
// Provides the client, typed endpoints, and response types.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{Fetch, GitHubClient};
pub use endpoints::{GitHubSource, UserActivity};
pub use types::*;
