use crate::error::*;
use std::fmt::Display;
use std::time::Duration;
use tracing::{error, info};

/// Classification and reporting helpers shared by every error type.
pub trait ErrorExt: Display {
    fn error_code(&self) -> &'static str;

    fn user_friendly_message(&self) -> String;

    fn is_retryable(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }

    fn log_error(&self) -> &Self {
        error!("[{}] {}", self.error_code(), self);
        self
    }
}

impl ErrorExt for CoreError {
    fn error_code(&self) -> &'static str {
        match self {
            CoreError::RedditApi(_) => "REDDIT_API",
            CoreError::Database(_) => "DATABASE",
            CoreError::Embedding(_) => "EMBEDDING",
            CoreError::Config(_) => "CONFIG",
            CoreError::Selection(_) => "SELECTION",
            CoreError::Io(_) => "IO",
            CoreError::Serialization(_) => "SERIALIZATION",
            CoreError::Network(_) => "NETWORK",
            CoreError::InvalidInput { .. } => "INVALID_INPUT",
            CoreError::Internal { .. } => "INTERNAL",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::RedditApi(e) => e.user_friendly_message(),
            CoreError::Database(e) => e.user_friendly_message(),
            CoreError::Embedding(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Selection(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Could not reach Reddit. Please check your internet connection.".to_string()
            }
            CoreError::Io(e) => format!("Could not read or write a file: {}", e),
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            _ => "An unexpected error occurred.".to_string(),
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            CoreError::RedditApi(e) => e.is_retryable(),
            CoreError::Database(e) => e.is_retryable(),
            CoreError::Network(_) => true,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            CoreError::RedditApi(e) => e.retry_after(),
            CoreError::Database(e) => e.retry_after(),
            CoreError::Network(_) => Some(Duration::from_secs(5)),
            _ => None,
        }
    }

    fn log_error(&self) -> &Self {
        error!("[{}] {}", self.error_code(), self);
        match self {
            CoreError::RedditApi(e) => error!("Reddit API error details: {:?}", e),
            CoreError::Database(e) => error!("Database error details: {:?}", e),
            CoreError::Embedding(e) => error!("Embedding error details: {:?}", e),
            _ => {}
        }
        self
    }
}

impl CoreError {
    /// True for failures where the run must stop and credentials need fixing.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            CoreError::RedditApi(
                RedditApiError::AuthenticationFailed { .. } | RedditApiError::InvalidToken
            )
        )
    }
}

impl ErrorExt for RedditApiError {
    fn error_code(&self) -> &'static str {
        match self {
            RedditApiError::AuthenticationFailed { .. } => "REDDIT_AUTH_FAILED",
            RedditApiError::RateLimitExceeded { .. } => "REDDIT_RATE_LIMIT",
            RedditApiError::Forbidden { .. } => "REDDIT_FORBIDDEN",
            RedditApiError::SubredditNotFound { .. } => "REDDIT_SUBREDDIT_NOT_FOUND",
            RedditApiError::PostNotFound { .. } => "REDDIT_POST_NOT_FOUND",
            RedditApiError::InvalidToken => "REDDIT_INVALID_TOKEN",
            RedditApiError::RequestTimeout => "REDDIT_TIMEOUT",
            RedditApiError::InvalidResponse { .. } => "REDDIT_INVALID_RESPONSE",
            RedditApiError::ServerError { .. } => "REDDIT_SERVER_ERROR",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            RedditApiError::AuthenticationFailed { .. } => {
                "Invalid credentials - please check them in config.toml".to_string()
            }
            RedditApiError::RateLimitExceeded { retry_after } => {
                format!("Reddit is rate limiting requests. Wait {} seconds.", retry_after)
            }
            RedditApiError::Forbidden { resource } => {
                format!("Reddit refused access to {}. It may be private or quarantined.", resource)
            }
            RedditApiError::SubredditNotFound { subreddit } => {
                format!("Subreddit r/{} does not exist or is private.", subreddit)
            }
            RedditApiError::PostNotFound { post_id } => {
                format!("Thread {} could not be found.", post_id)
            }
            RedditApiError::InvalidToken => {
                "The Reddit session expired or was revoked. Run again to log in.".to_string()
            }
            RedditApiError::RequestTimeout => "Reddit did not answer in time.".to_string(),
            RedditApiError::InvalidResponse { .. } | RedditApiError::ServerError { .. } => {
                "Reddit returned an unexpected response. Try again later.".to_string()
            }
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            RedditApiError::RateLimitExceeded { .. } | RedditApiError::RequestTimeout => true,
            RedditApiError::ServerError { status_code } => *status_code >= 500,
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            RedditApiError::RateLimitExceeded { retry_after } => {
                Some(Duration::from_secs(*retry_after))
            }
            _ if self.is_retryable() => Some(Duration::from_secs(30)),
            _ => None,
        }
    }
}

impl ErrorExt for DatabaseError {
    fn error_code(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed { .. } => "DB_CONNECTION_FAILED",
            DatabaseError::MigrationFailed { .. } => "DB_MIGRATION_FAILED",
            DatabaseError::NotConnected => "DB_NOT_CONNECTED",
            DatabaseError::DatabaseLocked => "DB_LOCKED",
            DatabaseError::Sql(_) => "DB_SQL_ERROR",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            DatabaseError::ConnectionFailed { .. } | DatabaseError::NotConnected => {
                "Could not open the processed-threads database. Check settings.database_url."
                    .to_string()
            }
            DatabaseError::DatabaseLocked => {
                "The processed-threads database is busy. Try again.".to_string()
            }
            _ => "The processed-threads database failed.".to_string(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, DatabaseError::DatabaseLocked)
    }

    fn retry_after(&self) -> Option<Duration> {
        self.is_retryable().then(|| Duration::from_millis(100))
    }
}

impl ErrorExt for EmbeddingError {
    fn error_code(&self) -> &'static str {
        match self {
            EmbeddingError::ModelLoadingFailed { .. } => "EMBED_MODEL_LOAD_FAILED",
            EmbeddingError::ModelNotFound { .. } => "EMBED_MODEL_NOT_FOUND",
            EmbeddingError::ModelNotLoaded => "EMBED_MODEL_NOT_LOADED",
            EmbeddingError::TokenizationFailed { .. } => "EMBED_TOKENIZATION_FAILED",
            EmbeddingError::InferenceFailed { .. } => "EMBED_INFERENCE_FAILED",
            EmbeddingError::DimensionMismatch { .. } => "EMBED_DIMENSION_MISMATCH",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            EmbeddingError::ModelNotFound { model_name } => {
                format!("Similarity model directory {} does not exist.", model_name)
            }
            EmbeddingError::ModelLoadingFailed { .. } | EmbeddingError::ModelNotLoaded => {
                "Failed to load the similarity model. Check ai.model_dir in config.toml."
                    .to_string()
            }
            _ => "Similarity ranking failed. Try again with ai_similarity_enabled = false."
                .to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED",
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => format!("Configuration file {} not found.", path),
            ConfigError::MissingField { field } => {
                format!("{} must be set in config.toml.", field)
            }
            ConfigError::InvalidValue { field, value } => {
                format!("{} = {} is not allowed.", field, value)
            }
            ConfigError::ValidationFailed { reason } => format!("Invalid configuration: {}", reason),
            ConfigError::Parse(e) => format!("config.toml could not be parsed: {}", e),
        }
    }
}

impl ErrorExt for SelectionError {
    fn error_code(&self) -> &'static str {
        match self {
            SelectionError::NoComments { .. } => "SELECTION_NO_COMMENTS",
            SelectionError::DirectThreadRejected { .. } => "SELECTION_DIRECT_REJECTED",
            SelectionError::AttemptsExhausted { .. } => "SELECTION_EXHAUSTED",
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            SelectionError::NoComments { .. } => "No comments found. Skipping.".to_string(),
            SelectionError::DirectThreadRejected { score, minimum, .. } => format!(
                "Thread has {} upvotes which is below the minimum threshold of {}.",
                score, minimum
            ),
            SelectionError::AttemptsExhausted { attempts } => format!(
                "No usable thread found after {} attempts. Try another subreddit or lower the thresholds.",
                attempts
            ),
        }
    }
}

/// Logs errors the way the binary reports them.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        if let Some(retry_after) = error.retry_after() {
            info!("This may succeed if retried in {:?}", retry_after);
        }
    }
}
