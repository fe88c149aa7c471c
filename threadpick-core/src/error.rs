use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("reddit: {0}")]
    RedditApi(#[from] RedditApiError),

    #[error("processed-thread store: {0}")]
    Database(#[from] DatabaseError),

    #[error("similarity model: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("selection: {0}")]
    Selection(#[from] SelectionError),

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("http: {0}")]
    Network(#[from] reqwest::Error),

    #[error("bad input: {message}")]
    InvalidInput { message: String },

    #[error("internal: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum RedditApiError {
    #[error("login rejected: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("throttled by reddit for {retry_after}s")]
    RateLimitExceeded { retry_after: u64 },

    #[error("access to {resource} refused")]
    Forbidden { resource: String },

    #[error("r/{subreddit} does not exist")]
    SubredditNotFound { subreddit: String },

    #[error("thread {post_id} does not exist")]
    PostNotFound { post_id: String },

    #[error("access token expired or revoked")]
    InvalidToken,

    #[error("request timed out")]
    RequestTimeout,

    #[error("unexpected response body: {details}")]
    InvalidResponse { details: String },

    #[error("reddit answered with HTTP {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("cannot open store: {reason}")]
    ConnectionFailed { reason: String },

    #[error("schema setup failed: {migration}")]
    MigrationFailed { migration: String },

    #[error("store used before connect")]
    NotConnected,

    #[error("store is busy")]
    DatabaseLocked,

    #[error("sqlite: {0}")]
    Sql(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("cannot load model from {model_path}")]
    ModelLoadingFailed { model_path: String },

    #[error("no model at {model_name}")]
    ModelNotFound { model_name: String },

    #[error("model used before load")]
    ModelNotLoaded,

    #[error("cannot tokenize {text_length}-char input")]
    TokenizationFailed { text_length: usize },

    #[error("forward pass failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("embedding width {actual} does not match {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{path} does not exist")]
    FileNotFound { path: String },

    #[error("{field} is not set")]
    MissingField { field: String },

    #[error("{field} cannot be {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("{reason}")]
    ValidationFailed { reason: String },

    #[error("malformed toml: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Thread {thread_id} has no comments")]
    NoComments { thread_id: String },

    #[error("Thread {thread_id} has {score} upvotes, below the minimum of {minimum}")]
    DirectThreadRejected {
        thread_id: String,
        score: i64,
        minimum: i64,
    },

    #[error("No usable thread found after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}
