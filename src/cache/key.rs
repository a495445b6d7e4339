// Cache key construction.
// Keys mirror the GitHub object a request targets.

use std::fmt;

/// Identity of one cached API response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// A user's profile.
    pub fn user(login: &str) -> Self {
        Self(format!("user:{}", login))
    }

    /// A user's repository list.
    pub fn user_repos(login: &str) -> Self {
        Self(format!("user:{}/repos", login))
    }

    /// A user's public events.
    pub fn user_events(login: &str) -> Self {
        Self(format!("user:{}/events", login))
    }

    /// A single repository.
    pub fn repo(login: &str, name: &str) -> Self {
        Self(format!("user:{}/repo:{}", login, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
