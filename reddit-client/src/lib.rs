pub mod api;
pub mod auth;
pub mod rate_limiter;


pub use auth::{AuthState, RedditOAuth2Config, RedditToken};

use api::RedditApiClient;
use oauth2::basic::BasicClient;
use std::sync::RwLock;
use std::time::Duration;
use threadpick_core::{
    CommentNode, CoreError, RedditApiError, RedditPost, SortOrder, ThreadSource, TimeWindow,
};
use tracing::info;

/// Authenticated access to Reddit, used as the pipeline's thread source.
pub struct RedditClient {
    config: RedditOAuth2Config,
    oauth_client: BasicClient,
    http: reqwest::Client,
    api: RedditApiClient,
    auth_state: RwLock<AuthState>,
}

impl RedditClient {
    pub fn new(config: RedditOAuth2Config) -> Result<Self, CoreError> {
        let oauth_client = auth::build_oauth_client(&config)?;
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;
        let api = RedditApiClient::new(config.user_agent.clone(), &config.api_base)?;

        Ok(Self {
            config,
            oauth_client,
            http,
            api,
            auth_state: RwLock::new(AuthState::NotAuthenticated),
        })
    }

    pub async fn authenticate(&self) -> Result<(), CoreError> {
        let token =
            auth::exchange_password(&self.oauth_client, &self.http, &self.config).await?;
        info!("Logged into Reddit as {}", self.config.username);
        self.set_token(token);
        Ok(())
    }

    pub fn set_token(&self, token: RedditToken) {
        let state = if token.is_expired() {
            AuthState::TokenExpired { token }
        } else {
            AuthState::Authenticated { token }
        };
        match self.auth_state.write() {
            Ok(mut guard) => *guard = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }

    pub fn get_auth_state(&self) -> AuthState {
        match self.auth_state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns a usable access token, logging in again when the current one expired.
    pub async fn ensure_authenticated(&self) -> Result<String, CoreError> {
        match self.get_auth_state() {
            AuthState::Authenticated { token } if !token.is_expired() => {
                return Ok(token.access_token)
            }
            AuthState::NotAuthenticated => {
                return Err(CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                    reason: "Not authenticated. Call authenticate() first".to_string(),
                }))
            }
            _ => {}
        }

        info!("Reddit access token expired, logging in again");
        self.authenticate().await?;
        match self.get_auth_state() {
            AuthState::Authenticated { token } => Ok(token.access_token),
            _ => Err(CoreError::RedditApi(RedditApiError::InvalidToken)),
        }
    }
}

impl ThreadSource for RedditClient {
    async fn fetch_by_id(&self, id: &str) -> Result<RedditPost, CoreError> {
        let token = self.ensure_authenticated().await?;
        Ok(self.api.get_post(&token, id).await?.into())
    }

    async fn fetch_listing(
        &self,
        subreddit: &str,
        sort: SortOrder,
        limit: u32,
    ) -> Result<Vec<RedditPost>, CoreError> {
        let token = self.ensure_authenticated().await?;
        let posts = self
            .api
            .get_subreddit_posts(&token, subreddit, sort, limit, None)
            .await?;
        Ok(posts.into_iter().map(RedditPost::from).collect())
    }

    async fn fetch_top(
        &self,
        subreddit: &str,
        window: TimeWindow,
        limit: u32,
    ) -> Result<Vec<RedditPost>, CoreError> {
        let token = self.ensure_authenticated().await?;
        let posts = self
            .api
            .get_subreddit_posts(&token, subreddit, SortOrder::Top, limit, Some(window))
            .await?;
        Ok(posts.into_iter().map(RedditPost::from).collect())
    }

    async fn fetch_replies(&self, thread_id: &str) -> Result<Vec<CommentNode>, CoreError> {
        let token = self.ensure_authenticated().await?;
        let things = self.api.get_comments(&token, thread_id).await?;
        Ok(things.into_iter().map(CommentNode::from).collect())
    }
}
