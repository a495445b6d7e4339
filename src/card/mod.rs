// Card rendering.
// Turns tag arguments into HTML, absorbing every fetch failure into an error card.

pub mod args;
pub mod colors;
pub mod render;
pub mod stats;

use std::path::Path;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::cache::ResponseCache;
use crate::config::CardConfig;
use crate::error::Result;
use crate::github::{Fetch, GitHubClient, GitHubSource};

pub use args::{Align, CardArgs};
pub use render::{escape_html, render_error_card, render_repo_card, render_user_card};
pub use stats::{LanguageShare, UserStats};

/// Renders card tags for one site build.
pub struct CardRenderer<F> {
    source: GitHubSource<F>,
}

impl CardRenderer<GitHubClient> {
    /// Renderer backed by the GitHub API, configured for a site rooted at `root`.
    pub fn from_config(config: &CardConfig, root: &Path) -> Result<Self> {
        if config.token_in_config_file() {
            warn!("API token set in the configuration file; make sure it is not committed to your repository");
        }
        let mut client = GitHubClient::new(config.api_token.as_deref())?;
        if let Some(api_url) = &config.api_url {
            client = client.with_base_url(api_url.as_str());
        }
        Ok(Self::with_config(client, config, root))
    }
}

impl<F: Fetch> CardRenderer<F> {
    pub fn new(source: GitHubSource<F>) -> Self {
        Self { source }
    }

    /// Attach a response cache when `config` enables one.
    pub fn with_config(fetcher: F, config: &CardConfig, root: &Path) -> Self {
        let mut source = GitHubSource::new(fetcher);
        if config.cache_enabled {
            let cache = ResponseCache::open(root, config.cache_persist);
            source = source.with_cache(cache, config.ttl());
        }
        Self::new(source)
    }

    pub fn source(&self) -> &GitHubSource<F> {
        &self.source
    }

    /// Render one tag. Never fails: a missing `user` gives an empty string and
    /// any fetch error gives an error card.
    pub async fn render<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        let Some(args) = CardArgs::parse(tokens) else {
            debug!("card tag without a user parameter");
            return String::new();
        };

        debug!(user = %args.user, repo = ?args.repo, "rendering card");

        match self.try_render(&args).await {
            Ok(html) => html,
            Err(e) if e.is_not_found() => {
                warn!(card = %args.target(), error = %e, "GitHub user or repository not found");
                render_error_card(&args)
            }
            Err(e) => {
                error!(card = %args.target(), error = %e, "GitHub API error");
                render_error_card(&args)
            }
        }
    }

    /// Render a batch of tags, one per line, through this renderer's cache.
    ///
    /// Each line holds whitespace-separated tokens. Blank lines are skipped.
    pub async fn render_batch<I, S>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fragments = Vec::new();
        for line in lines {
            let tokens: Vec<&str> = line.as_ref().split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            fragments.push(self.render(tokens.as_slice()).await);
        }
        fragments
    }

    async fn try_render(&self, args: &CardArgs) -> Result<String> {
        match &args.repo {
            Some(repo) => {
                let repository = self.source.get_repo(&args.user, repo).await?;
                debug!(full_name = %repository.full_name, "fetched repository");
                Ok(render_repo_card(&repository, args))
            }
            None => {
                let activity = self.source.get_user_activity(&args.user).await?;
                let stats = UserStats::compute(&activity.repos, &activity.events, Utc::now());
                debug!(
                    login = %activity.user.login,
                    total_stars = stats.total_stars,
                    repos = activity.repos.len(),
                    "fetched user"
                );
                Ok(render_user_card(&activity.user, &stats, args))
            }
        }
    }
}
