// GitHub API HTTP client.
// Handles authentication, rate limiting, and request/response processing.

use std::future::Future;

use parking_lot::Mutex;
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;
use tracing::debug;

use crate::error::{CardError, Result};

use super::types::RateLimit;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Source of raw JSON documents from the GitHub REST API.
pub trait Fetch: Send + Sync {
    /// GET `endpoint` (a path such as `/users/octocat`) and return the JSON body.
    fn fetch_json(&self, endpoint: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// GitHub API client with optional authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    rate_limit: Mutex<RateLimit>,
}

impl GitHubClient {
    /// Create a client, authenticating with `token` when one is given.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("token {}", token))
                    .map_err(|e| CardError::Other(e.to_string()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("ghcard"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(CardError::Api)?;

        Ok(Self {
            client,
            base_url: GITHUB_API_BASE.to_string(),
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Point the client at a different API host (GitHub Enterprise, mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the most recent rate limit information.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit.lock().clone()
    }

    /// Make a GET request to the GitHub API.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "GitHub API request");
        let response = self.client.get(&url).send().await.map_err(CardError::Api)?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        let mut rate_limit = self.rate_limit.lock();
        if let Some(limit) = header("x-ratelimit-limit") {
            rate_limit.limit = limit;
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            rate_limit.remaining = remaining;
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            rate_limit.reset = reset;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(CardError::Unauthorized),
            StatusCode::NOT_FOUND => {
                let url = response.url().to_string();
                Err(CardError::NotFound(url))
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                let rate_limit = self.rate_limit();
                if rate_limit.remaining == 0 && rate_limit.reset > 0 {
                    let reset_at = chrono::DateTime::from_timestamp(rate_limit.reset as i64, 0)
                        .map(|dt| dt.format("%H:%M:%S").to_string())
                        .unwrap_or_else(|| "unknown".to_string());
                    Err(CardError::RateLimited { reset_at })
                } else {
                    Err(CardError::Other(format!(
                        "Forbidden: {}",
                        response.text().await.unwrap_or_default()
                    )))
                }
            }
            status => Err(CardError::Other(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            ))),
        }
    }
}

impl Fetch for GitHubClient {
    async fn fetch_json(&self, endpoint: &str) -> Result<Value> {
        let response = self.get(endpoint).await?;
        let value: Value = response.json().await?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_without_token() {
        let client = GitHubClient::new(None).unwrap();
        assert_eq!(client.base_url, GITHUB_API_BASE);
        assert_eq!(client.rate_limit().remaining, 0);
    }

    #[test]
    fn test_client_rejects_invalid_token() {
        assert!(GitHubClient::new(Some("bad\ntoken")).is_err());
    }

    #[test]
    fn test_base_url_override() {
        let client = GitHubClient::new(Some("abc"))
            .unwrap()
            .with_base_url("https://ghe.example.com/api/v3/");
        assert_eq!(client.base_url, "https://ghe.example.com/api/v3");
    }
}
