//! Integration tests for rendering cards through the response cache
//!
//! Drives `CardRenderer` with an in-process fetcher that counts requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use ghcard::cache::{CACHE_DIR_NAME, Clock};
use ghcard::github::{Fetch, GitHubSource};
use ghcard::{CardConfig, CardError, CardRenderer, ResponseCache, Result};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Canned GitHub responses, with a request counter.
#[derive(Default)]
struct CountingFetch {
    calls: AtomicUsize,
    fail_with: Option<fn(&str) -> CardError>,
}

impl CountingFetch {
    fn failing(fail_with: fn(&str) -> CardError) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(fail_with),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Fetch for CountingFetch {
    async fn fetch_json(&self, endpoint: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fail_with) = self.fail_with {
            return Err(fail_with(endpoint));
        }

        let value = match endpoint {
            "/repos/neoalienson/test-repo" => json!({
                "full_name": "neoalienson/test-repo",
                "html_url": "https://github.com/neoalienson/test-repo",
                "description": "Test repository",
                "stargazers_count": 10,
                "forks_count": 5,
                "language": "JavaScript"
            }),
            "/users/neoalienson" => json!({
                "login": "neoalienson",
                "name": "Neo Alienson",
                "avatar_url": "https://github.com/avatar.jpg",
                "html_url": "https://github.com/neoalienson",
                "bio": "Developer",
                "followers": 100,
                "public_repos": 25
            }),
            "/users/neoalienson/repos?per_page=100" => json!([
                {"language": "JavaScript", "stargazers_count": 5},
                {"language": "JavaScript", "stargazers_count": 3},
                {"language": "Python", "stargazers_count": 2},
                {"language": "TypeScript", "stargazers_count": 1},
                {"language": null, "stargazers_count": 0}
            ]),
            "/users/neoalienson/events/public?per_page=100" => json!([
                {"type": "PushEvent", "created_at": Utc::now().to_rfc3339()},
                {"type": "PullRequestEvent", "created_at": Utc::now().to_rfc3339()}
            ]),
            other => return Err(CardError::NotFound(other.to_string())),
        };
        Ok(value)
    }
}

/// Clock that only moves when told to.
struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn new() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Utc::now())))
    }

    fn advance(&self, by: TimeDelta) {
        *self.0.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock()
    }
}

const REPO_TAG: [&str; 2] = ["user:neoalienson", "repo:test-repo"];

#[tokio::test]
async fn test_repo_card_fetched_once_within_ttl() {
    let clock = ManualClock::new();
    let cache = ResponseCache::new().with_clock(clock.clone());
    let renderer = CardRenderer::new(
        GitHubSource::new(CountingFetch::default()).with_cache(cache, Duration::from_secs(60)),
    );

    let first = renderer.render(&REPO_TAG).await;
    let second = renderer.render(&REPO_TAG).await;
    assert_eq!(first, second);
    assert!(first.contains("neoalienson/test-repo"));
    assert_eq!(renderer.source().fetcher().calls(), 1);

    clock.advance(TimeDelta::seconds(61));
    renderer.render(&REPO_TAG).await;
    assert_eq!(renderer.source().fetcher().calls(), 2);
}

#[tokio::test]
async fn test_batch_shares_one_cache() {
    let temp_dir = TempDir::new().unwrap();
    let config = CardConfig {
        cache_enabled: true,
        ..Default::default()
    };
    let renderer = CardRenderer::with_config(CountingFetch::default(), &config, temp_dir.path());

    let batch = "user:neoalienson repo:test-repo\n\nuser:neoalienson   repo:test-repo\n";
    let fragments = renderer.render_batch(batch.lines()).await;

    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0], fragments[1]);
    assert!(fragments[0].contains("neoalienson/test-repo"));
    assert_eq!(renderer.source().fetcher().calls(), 1);
}

#[tokio::test]
async fn test_repo_card_fetched_every_time_without_cache() {
    let temp_dir = TempDir::new().unwrap();
    let renderer = CardRenderer::with_config(
        CountingFetch::default(),
        &CardConfig::default(),
        temp_dir.path(),
    );

    renderer.render(&REPO_TAG).await;
    renderer.render(&REPO_TAG).await;

    assert_eq!(renderer.source().fetcher().calls(), 2);
    assert!(!temp_dir.path().join(CACHE_DIR_NAME).exists());
}

#[tokio::test]
async fn test_user_card_cached() {
    let renderer = CardRenderer::new(
        GitHubSource::new(CountingFetch::default())
            .with_cache(ResponseCache::new(), Duration::from_secs(60)),
    );

    let html = renderer.render(&["user:neoalienson"]).await;
    assert!(html.contains("Neo Alienson"));
    assert!(html.contains("Developer"));
    assert!(html.contains("👥 100"));
    assert!(html.contains("⭐ 11"));
    assert!(html.contains("📈 1"));
    assert!(html.contains("JavaScript 50.0%"));
    assert!(html.contains("Python 25.0%"));
    assert!(html.contains("#f1e05a"));
    assert_eq!(renderer.source().fetcher().calls(), 3);

    renderer.render(&["user:neoalienson"]).await;
    assert_eq!(renderer.source().fetcher().calls(), 3);
}

#[tokio::test]
async fn test_persisted_cache_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let config = CardConfig {
        cache_enabled: true,
        cache_persist: true,
        cache_ttl: 3600,
        ..Default::default()
    };

    let first_build = CardRenderer::with_config(CountingFetch::default(), &config, temp_dir.path());
    let html = first_build.render(&REPO_TAG).await;
    assert_eq!(first_build.source().fetcher().calls(), 1);
    assert!(temp_dir.path().join(CACHE_DIR_NAME).is_dir());

    let second_build = CardRenderer::with_config(CountingFetch::default(), &config, temp_dir.path());
    assert_eq!(second_build.render(&REPO_TAG).await, html);
    assert_eq!(second_build.source().fetcher().calls(), 0);
}

#[tokio::test]
async fn test_network_error_renders_error_card() {
    let renderer = CardRenderer::new(GitHubSource::new(CountingFetch::failing(|_| {
        CardError::Other("connection reset".to_string())
    })));

    let html = renderer.render(&["user:invalid"]).await;
    assert!(html.contains("github-card-error"));
    assert!(html.contains("Error loading GitHub data for invalid"));
}

#[tokio::test]
async fn test_not_found_renders_error_card_and_is_not_cached() {
    let renderer = CardRenderer::new(
        GitHubSource::new(CountingFetch::failing(|endpoint| {
            CardError::NotFound(endpoint.to_string())
        }))
        .with_cache(ResponseCache::new(), Duration::from_secs(60)),
    );

    let html = renderer.render(&["user:ghost", "repo:nothing"]).await;
    assert!(html.contains("github-card-error"));
    assert!(html.contains("ghost/nothing"));

    renderer.render(&["user:ghost", "repo:nothing"]).await;
    assert_eq!(renderer.source().fetcher().calls(), 2);
}
