// Plugin configuration.
// Reads the `[github_card]` table from a TOML file and the environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::Result;

/// Default cache TTL: one hour.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// File name looked up in the working directory before the user config dir.
pub const CONFIG_FILE_NAME: &str = "ghcard.toml";

/// Settings consumed by the renderer, the cache, and the CSS injector.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Whether API responses are cached at all.
    pub cache_enabled: bool,
    /// Time-to-live for cached responses, in seconds.
    pub cache_ttl: u64,
    /// Whether cached responses are mirrored to disk across builds.
    pub cache_persist: bool,
    /// GitHub token passed through as the request credential.
    pub api_token: Option<String>,
    /// Set when `api_token` came from `GITHUB_TOKEN` rather than the file.
    #[serde(skip)]
    pub token_from_env: bool,
    /// API host override, e.g. `https://github.example.com/api/v3`.
    pub api_url: Option<String>,
    /// Whether the stylesheet is injected into generated pages.
    pub inject_css: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            cache_enabled: false,
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            cache_persist: false,
            api_token: None,
            token_from_env: false,
            api_url: None,
            inject_css: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    github_card: CardConfig,
}

impl CardConfig {
    /// Cache TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.github_card)
    }

    /// Load configuration from a file. A missing file yields defaults.
    /// `GITHUB_TOKEN` fills in the token when the file leaves it unset.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_toml(&fs::read_to_string(path)?)?
        } else {
            Self::default()
        };

        if config.api_token.is_none() {
            config.api_token = std::env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.is_empty());
            config.token_from_env = config.api_token.is_some();
        }

        Ok(config)
    }

    /// Whether the token was written into the configuration file itself.
    pub fn token_in_config_file(&self) -> bool {
        self.api_token.is_some() && !self.token_from_env
    }
}

/// Resolve the config file: `./ghcard.toml` if present, else the per-user config dir.
pub fn default_config_path() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }

    ProjectDirs::from("", "", "ghcard")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .unwrap_or(local)
}
