//! Configuration loading.
//!
//! The on-disk format mirrors the `config.toml` used by the video pipeline
//! (`[reddit.creds]`, `[reddit.thread]`, `[ai]`, `[settings]`). It is parsed
//! into [`Settings`] and then validated into the immutable [`SelectionConfig`]
//! and [`RedditCredentials`] that the rest of the workspace consumes.

use crate::error::ConfigError;
use crate::types::SortOrder;
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_SUBREDDIT: &str = "askreddit";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub reddit: RedditSection,
    #[serde(default)]
    pub ai: AiSection,
    #[serde(default)]
    pub settings: GeneralSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditSection {
    pub creds: CredentialsSection,
    #[serde(default)]
    pub thread: ThreadSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsSection {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "2fa", default)]
    pub two_factor: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThreadSection {
    pub subreddit: String,
    pub post_id: String,
    pub sort_type: SortOrder,
    pub min_upvotes: i64,
    pub min_comments: u64,
    pub min_comment_length: usize,
    pub max_comment_length: usize,
    pub min_comment_upvotes: i64,
}

impl Default for ThreadSection {
    fn default() -> Self {
        Self {
            subreddit: String::new(),
            post_id: String::new(),
            sort_type: SortOrder::Hot,
            min_upvotes: 0,
            min_comments: 20,
            min_comment_length: 1,
            max_comment_length: 500,
            min_comment_upvotes: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiSection {
    pub ai_similarity_enabled: bool,
    pub ai_similarity_keywords: String,
    pub model_dir: PathBuf,
}

impl Default for AiSection {
    fn default() -> Self {
        Self {
            ai_similarity_enabled: false,
            ai_similarity_keywords: String::new(),
            model_dir: PathBuf::from("models/all-MiniLM-L6-v2"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralSection {
    pub allow_nsfw: bool,
    pub storymode: bool,
    pub storymodemethod: u8,
    pub storymode_max_length: usize,
    pub no_emojis: bool,
    pub max_selection_attempts: u32,
    pub database_url: String,
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            allow_nsfw: false,
            storymode: false,
            storymodemethod: 1,
            storymode_max_length: 1000,
            no_emojis: false,
            max_selection_attempts: 20,
            database_url: "sqlite://threadpick.db".to_string(),
        }
    }
}

/// Credentials for the password grant against Reddit.
#[derive(Debug, Clone, PartialEq)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub two_factor: bool,
}

/// How story text is handed to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationMode {
    /// The body text as posted.
    Raw,
    /// The body text split into narration sentences.
    Sentences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    Comments,
    Story(NarrationMode),
}

impl ContentMode {
    pub fn is_story(&self) -> bool {
        matches!(self, ContentMode::Story(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceConfig {
    pub keywords: Vec<String>,
    pub model_dir: PathBuf,
}

/// Validated, read-only settings for one selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// `None` means the subreddit is asked for interactively.
    pub subreddit: Option<String>,
    /// Configured thread ids, split on `+`.
    pub post_ids: Vec<String>,
    pub sort_order: SortOrder,
    pub relevance: Option<RelevanceConfig>,
    pub min_upvotes: i64,
    pub min_comments: u64,
    pub comment_length: RangeInclusive<usize>,
    pub min_comment_upvotes: i64,
    pub mode: ContentMode,
    pub allow_nsfw: bool,
    pub story_max_length: usize,
    pub no_emojis: bool,
    pub max_attempts: u32,
}

impl SelectionConfig {
    /// The configured thread id when exactly one was given.
    pub fn single_post_id(&self) -> Option<&str> {
        match self.post_ids.as_slice() {
            [id] => Some(id.as_str()),
            _ => None,
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            subreddit: Some(DEFAULT_SUBREDDIT.to_string()),
            post_ids: Vec::new(),
            sort_order: SortOrder::Hot,
            relevance: None,
            min_upvotes: 0,
            min_comments: 20,
            comment_length: 1..=500,
            min_comment_upvotes: 0,
            mode: ContentMode::Comments,
            allow_nsfw: false,
            story_max_length: 1000,
            no_emojis: false,
            max_attempts: 20,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let mut settings = Self::from_toml(&raw)?;
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        debug!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Credentials from the environment win over the file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let creds = &mut self.reddit.creds;
        let overrides: [(&str, &mut String); 4] = [
            ("REDDIT_CLIENT_ID", &mut creds.client_id),
            ("REDDIT_CLIENT_SECRET", &mut creds.client_secret),
            ("REDDIT_USERNAME", &mut creds.username),
            ("REDDIT_PASSWORD", &mut creds.password),
        ];
        for (key, slot) in overrides {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                debug!("Using {} from the environment", key);
                *slot = value;
            }
        }
    }

    pub fn credentials(&self) -> Result<RedditCredentials, ConfigError> {
        let creds = &self.reddit.creds;
        for (field, value) in [
            ("reddit.creds.client_id", &creds.client_id),
            ("reddit.creds.client_secret", &creds.client_secret),
            ("reddit.creds.username", &creds.username),
            ("reddit.creds.password", &creds.password),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        Ok(RedditCredentials {
            client_id: creds.client_id.trim().to_string(),
            client_secret: creds.client_secret.trim().to_string(),
            username: strip_user_prefix(creds.username.trim()).to_string(),
            password: creds.password.clone(),
            two_factor: creds.two_factor,
        })
    }

    pub fn selection_config(&self) -> Result<SelectionConfig, ConfigError> {
        let thread = &self.reddit.thread;
        let general = &self.settings;

        if thread.min_comment_length > thread.max_comment_length {
            return Err(ConfigError::ValidationFailed {
                reason: format!(
                    "min_comment_length ({}) is greater than max_comment_length ({})",
                    thread.min_comment_length, thread.max_comment_length
                ),
            });
        }

        if general.max_selection_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "settings.max_selection_attempts".to_string(),
                value: "0".to_string(),
            });
        }

        let mode = if general.storymode {
            match general.storymodemethod {
                0 => ContentMode::Story(NarrationMode::Raw),
                1 => ContentMode::Story(NarrationMode::Sentences),
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: "settings.storymodemethod".to_string(),
                        value: other.to_string(),
                    })
                }
            }
        } else {
            ContentMode::Comments
        };

        let relevance = if self.ai.ai_similarity_enabled {
            let keywords = parse_keywords(&self.ai.ai_similarity_keywords);
            if keywords.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    reason: "ai_similarity_enabled is set but ai_similarity_keywords is empty"
                        .to_string(),
                });
            }
            Some(RelevanceConfig {
                keywords,
                model_dir: self.ai.model_dir.clone(),
            })
        } else {
            None
        };

        let subreddit = Some(strip_subreddit_prefix(thread.subreddit.trim()))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(SelectionConfig {
            subreddit,
            post_ids: split_post_ids(&thread.post_id),
            sort_order: thread.sort_type,
            relevance,
            min_upvotes: thread.min_upvotes,
            min_comments: thread.min_comments,
            comment_length: thread.min_comment_length..=thread.max_comment_length,
            min_comment_upvotes: thread.min_comment_upvotes,
            mode,
            allow_nsfw: general.allow_nsfw,
            story_max_length: general.storymode_max_length,
            no_emojis: general.no_emojis,
            max_attempts: general.max_selection_attempts,
        })
    }
}

/// Comma-separated keywords, trimmed, empties dropped.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn split_post_ids(raw: &str) -> Vec<String> {
    raw.split('+')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn strip_subreddit_prefix(name: &str) -> &str {
    strip_prefix_ignore_case(name, "r/")
}

pub fn strip_user_prefix(name: &str) -> &str {
    strip_prefix_ignore_case(name, "u/")
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> &'a str {
    match value.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &value[prefix.len()..],
        _ => value,
    }
}
