//! GitHub user and repository cards for static sites.
//!
//! Cards are rendered at build time from the GitHub REST API. Responses go
//! through a [`cache::ResponseCache`] with per-entry TTL, optionally mirrored
//! to disk so later builds can reuse them.

pub mod cache;
pub mod card;
pub mod config;
pub mod error;
pub mod github;
pub mod inject;

pub use cache::{CacheKey, ResponseCache};
pub use card::CardRenderer;
pub use config::CardConfig;
pub use error::{CardError, Result};
