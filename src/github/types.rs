// GitHub API response types.
// Only the fields the cards display are modelled; everything else is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GitHub user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub public_repos: u64,
}

impl User {
    /// Name shown on the card: the profile name, else the login.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.login)
    }
}

/// GitHub repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub language: Option<String>,
}

/// Public activity event kind. Only the kinds the card counts are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    PushEvent,
    PullRequestEvent,
    IssuesEvent,
    #[serde(other)]
    Other,
}

/// Entry from a user's public event feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub created_at: Option<DateTime<Utc>>,
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}
