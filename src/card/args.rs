// Tag argument parsing.
// Turns `key:value` tokens into card options.

use std::collections::HashMap;

const DEFAULT_HEIGHT: &str = "100";
const DEFAULT_WIDTH: &str = "400";

/// Horizontal text alignment of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
    /// Any other value is passed through to the style attribute as given.
    Custom(String),
}

impl Align {
    fn parse(value: &str) -> Self {
        match value {
            "left" => Align::Left,
            "center" => Align::Center,
            "right" => Align::Right,
            other => Align::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::Custom(value) => value,
        }
    }
}

/// Options for one card tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardArgs {
    pub user: String,
    pub repo: Option<String>,
    pub height: String,
    /// Explicit width. `None` renders a responsive card.
    pub width: Option<String>,
    pub align: Align,
}

impl CardArgs {
    /// Parse tag tokens. Returns `None` when no `user` is given.
    ///
    /// A token's key is the text before its first `:` and its value the text
    /// up to the next `:`, so `user:a:b` names user `a`. Tokens missing either
    /// side are ignored.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Option<Self> {
        let mut params: HashMap<&str, &str> = HashMap::new();
        for token in tokens {
            let mut parts = token.as_ref().split(':');
            if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
                if !key.is_empty() && !value.is_empty() {
                    params.insert(key, value);
                }
            }
        }

        let user = params.get("user")?.to_string();
        let repo = params.get("repo").map(|r| r.to_string());

        let align = match params.get("align") {
            Some(value) => Align::parse(value),
            None if repo.is_some() => Align::Left,
            None => Align::Center,
        };

        Some(Self {
            user,
            repo,
            height: params
                .get("height")
                .copied()
                .unwrap_or(DEFAULT_HEIGHT)
                .to_string(),
            width: params.get("width").map(|w| w.to_string()),
            align,
        })
    }

    pub fn is_responsive(&self) -> bool {
        self.width.is_none()
    }

    /// Width actually used when one is rendered.
    pub fn width_or_default(&self) -> &str {
        self.width.as_deref().unwrap_or(DEFAULT_WIDTH)
    }

    /// `user` or `user/repo`, for messages.
    pub fn target(&self) -> String {
        match &self.repo {
            Some(repo) => format!("{}/{}", self.user, repo),
            None => self.user.clone(),
        }
    }
}
