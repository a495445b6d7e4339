// GitHub API endpoint functions.
// Typed, cache-aware fetches for the data each card needs.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheKey, ResponseCache};
use crate::error::Result;

use super::client::Fetch;
use super::types::{Event, Repository, User};

/// Page size for list endpoints.
const PER_PAGE: u32 = 100;

pub fn repo_endpoint(user: &str, repo: &str) -> String {
    format!("/repos/{}/{}", user, repo)
}

pub fn user_endpoint(user: &str) -> String {
    format!("/users/{}", user)
}

pub fn user_repos_endpoint(user: &str) -> String {
    format!("/users/{}/repos?per_page={}", user, PER_PAGE)
}

pub fn user_events_endpoint(user: &str) -> String {
    format!("/users/{}/events/public?per_page={}", user, PER_PAGE)
}

/// Everything a user card shows.
#[derive(Debug, Clone)]
pub struct UserActivity {
    pub user: User,
    pub repos: Vec<Repository>,
    pub events: Vec<Event>,
}

/// Fetches GitHub data, consulting a response cache first when one is attached.
///
/// Each request checks the cache, fetches on a miss or expiry, then stores
/// the raw response. Concurrent misses on the same key each fetch.
pub struct GitHubSource<F> {
    fetcher: F,
    cache: Option<ResponseCache>,
    ttl: Duration,
}

impl<F: Fetch> GitHubSource<F> {
    /// Uncached source: every request reaches the fetcher.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: None,
            ttl: Duration::ZERO,
        }
    }

    /// Cache responses for `ttl`.
    pub fn with_cache(mut self, cache: ResponseCache, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.ttl = ttl;
        self
    }

    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_ref()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    async fn fetch_cached(&self, key: CacheKey, endpoint: &str) -> Result<Value> {
        if let Some(value) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            debug!(%key, "cache hit");
            return Ok(value);
        }

        let value = self.fetcher.fetch_json(endpoint).await?;

        if let Some(cache) = &self.cache {
            debug!(%key, ttl_secs = self.ttl.as_secs(), "caching response");
            cache.put(key, value.clone(), self.ttl);
        }
        Ok(value)
    }

    async fn fetch_typed<T: DeserializeOwned>(&self, key: CacheKey, endpoint: &str) -> Result<T> {
        let value = self.fetch_cached(key, endpoint).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Get a specific repository.
    pub async fn get_repo(&self, user: &str, repo: &str) -> Result<Repository> {
        self.fetch_typed(CacheKey::repo(user, repo), &repo_endpoint(user, repo))
            .await
    }

    /// Get a user's profile.
    pub async fn get_user(&self, user: &str) -> Result<User> {
        self.fetch_typed(CacheKey::user(user), &user_endpoint(user))
            .await
    }

    /// Get a user's public repositories (first page).
    pub async fn get_user_repos(&self, user: &str) -> Result<Vec<Repository>> {
        self.fetch_typed(CacheKey::user_repos(user), &user_repos_endpoint(user))
            .await
    }

    /// Get a user's public events (first page).
    pub async fn get_user_events(&self, user: &str) -> Result<Vec<Event>> {
        self.fetch_typed(CacheKey::user_events(user), &user_events_endpoint(user))
            .await
    }

    /// Profile, repositories, and events, requested concurrently.
    pub async fn get_user_activity(&self, user: &str) -> Result<UserActivity> {
        let (user, repos, events) = tokio::try_join!(
            self.get_user(user),
            self.get_user_repos(user),
            self.get_user_events(user),
        )?;

        Ok(UserActivity {
            user,
            repos,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CardError;
    use parking_lot::Mutex;
    use serde_json::json;

    /// Serves canned JSON by endpoint and records every request.
    struct StubFetch {
        calls: Mutex<Vec<String>>,
    }

    impl StubFetch {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl Fetch for StubFetch {
        async fn fetch_json(&self, endpoint: &str) -> Result<Value> {
            self.calls.lock().push(endpoint.to_string());
            match endpoint {
                "/users/octocat" => Ok(json!({"login": "octocat", "followers": 3})),
                "/users/octocat/repos?per_page=100" => {
                    Ok(json!([{"name": "a", "stargazers_count": 2, "language": "Rust"}]))
                }
                "/users/octocat/events/public?per_page=100" => Ok(json!([{"type": "PushEvent"}])),
                "/repos/octocat/hello" => Ok(json!({"full_name": "octocat/hello"})),
                other => Err(CardError::NotFound(other.to_string())),
            }
        }
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(repo_endpoint("a", "b"), "/repos/a/b");
        assert_eq!(user_endpoint("a"), "/users/a");
        assert_eq!(user_repos_endpoint("a"), "/users/a/repos?per_page=100");
        assert_eq!(user_events_endpoint("a"), "/users/a/events/public?per_page=100");
    }

    #[tokio::test]
    async fn test_user_activity_issues_three_requests() {
        let source = GitHubSource::new(StubFetch::new());

        let activity = source.get_user_activity("octocat").await.unwrap();

        assert_eq!(activity.user.login, "octocat");
        assert_eq!(activity.repos.len(), 1);
        assert_eq!(activity.events.len(), 1);
        assert_eq!(source.fetcher().calls().len(), 3);
    }

    #[tokio::test]
    async fn test_uncached_source_always_fetches() {
        let source = GitHubSource::new(StubFetch::new());

        source.get_repo("octocat", "hello").await.unwrap();
        source.get_repo("octocat", "hello").await.unwrap();

        assert_eq!(source.fetcher().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_cached_source_reuses_response() {
        let source = GitHubSource::new(StubFetch::new())
            .with_cache(ResponseCache::new(), Duration::from_secs(60));

        let first = source.get_repo("octocat", "hello").await.unwrap();
        let second = source.get_repo("octocat", "hello").await.unwrap();

        assert_eq!(first.full_name, second.full_name);
        assert_eq!(source.fetcher().calls(), vec!["/repos/octocat/hello"]);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let source = GitHubSource::new(StubFetch::new())
            .with_cache(ResponseCache::new(), Duration::from_secs(60));

        let err = source.get_repo("octocat", "missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(source.cache().unwrap().is_empty());
    }
}
