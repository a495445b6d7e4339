// Cache module for GitHub API responses.
// In-memory TTL store with an optional on-disk mirror shared across builds.

pub mod clock;
pub mod disk;
pub mod key;
pub mod paths;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use disk::DiskCache;
pub use key::CacheKey;
pub use paths::CACHE_DIR_NAME;
pub use store::{CacheEntry, ResponseCache};
