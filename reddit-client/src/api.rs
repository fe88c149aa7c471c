use crate::rate_limiter::{RateLimitConfig, RateLimiter};
use reqwest::{Client, Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use threadpick_core::{
    CommentNode, CoreError, RedditApiError, RedditComment, RedditPost, SortOrder, TimeWindow,
};
use tracing::{debug, error, info, warn};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListing<C> {
    pub kind: String,
    pub data: RedditListingData<C>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingData<C> {
    pub children: Vec<C>,
    pub after: Option<String>,
    pub before: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

pub type PostListing = RedditListing<RedditListingChild<RedditPostData>>;
pub type CommentListing = RedditListing<RedditCommentThing>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditPostData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subreddit: String,
    pub permalink: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub over_18: bool,
    #[serde(default)]
    pub stickied: bool,
    pub upvote_ratio: Option<f64>,
    #[serde(default)]
    pub is_self: bool,
}

/// Children of a comment listing: real comments (`t1`) or "load more" stubs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum RedditCommentThing {
    #[serde(rename = "t1")]
    Comment(RedditCommentData),
    #[serde(rename = "more")]
    More(RedditMoreData),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditCommentData {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub stickied: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditMoreData {
    #[serde(default)]
    pub count: u64,
}

/// Reddit keeps the name of deleted accounts as a placeholder string.
const DELETED_AUTHOR: &str = "[deleted]";

#[derive(Debug)]
pub struct RedditApiClient {
    http_client: Client,
    rate_limiter: Arc<RateLimiter>,
    base_url: Url,
}

impl RedditApiClient {
    pub fn new(user_agent: String, base_url: &str) -> Result<Self, CoreError> {
        let base_url = Url::parse(base_url).map_err(|e| CoreError::InvalidInput {
            message: format!("invalid Reddit API base url '{}': {}", base_url, e),
        })?;

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(Duration::from_secs(30))
            // Unknown subreddits answer with a redirect to the search page.
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RateLimitConfig::reddit_oauth())),
            base_url,
        })
    }

    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        access_token: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Response, CoreError> {
        let url = self.base_url.join(endpoint).map_err(|e| CoreError::InvalidInput {
            message: format!("invalid endpoint '{}': {}", endpoint, e),
        })?;

        self.rate_limiter.acquire_permit().await;
        debug!("Acquired rate limit permit for {} {}", method, endpoint);

        info!("Making Reddit API request: {} {}", method, endpoint);
        let response = self
            .http_client
            .request(method.clone(), url)
            .bearer_auth(access_token)
            .query(&[("raw_json", "1")])
            .query(query_params)
            .send()
            .await
            .map_err(|e| {
                error!("Network error for {} {}: {}", method, endpoint, e);
                if e.is_timeout() {
                    CoreError::RedditApi(RedditApiError::RequestTimeout)
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        if status.is_success() {
            debug!("Request successful: {} {}", status, endpoint);
            return Ok(response);
        }

        error!("Request failed with status: {} for {}", status, endpoint);
        Err(CoreError::RedditApi(status_error(&response, endpoint)))
    }

    pub async fn get_subreddit_posts(
        &self,
        access_token: &str,
        subreddit: &str,
        sort: SortOrder,
        limit: u32,
        window: Option<TimeWindow>,
    ) -> Result<Vec<RedditPostData>, CoreError> {
        let endpoint = format!("/r/{}/{}", subreddit, sort.as_str());
        let limit_str = limit.to_string();
        let mut params = vec![("limit", limit_str.as_str())];
        if let Some(window) = window {
            params.push(("t", window.as_str()));
        }

        let response = self
            .make_request(Method::GET, &endpoint, access_token, &params)
            .await
            .map_err(|e| subreddit_error(e, subreddit))?;

        let listing: PostListing = response.json().await.map_err(|e| {
            error!("Failed to parse subreddit posts: {}", e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse posts for r/{}", subreddit),
            })
        })?;

        info!(
            "Retrieved {} posts from r/{} ({})",
            listing.data.children.len(),
            subreddit,
            sort
        );
        Ok(listing.data.children.into_iter().map(|c| c.data).collect())
    }

    pub async fn get_post(
        &self,
        access_token: &str,
        post_id: &str,
    ) -> Result<RedditPostData, CoreError> {
        let endpoint = format!("/by_id/t3_{}", post_id);
        let response = self
            .make_request(Method::GET, &endpoint, access_token, &[])
            .await?;

        let listing: PostListing = response.json().await.map_err(|e| {
            error!("Failed to parse post {}: {}", post_id, e);
            CoreError::RedditApi(RedditApiError::InvalidResponse {
                details: format!("Failed to parse post {}", post_id),
            })
        })?;

        listing
            .data
            .children
            .into_iter()
            .next()
            .map(|c| c.data)
            .ok_or_else(|| {
                CoreError::RedditApi(RedditApiError::PostNotFound {
                    post_id: post_id.to_string(),
                })
            })
    }

    pub async fn get_comments(
        &self,
        access_token: &str,
        post_id: &str,
    ) -> Result<Vec<RedditCommentThing>, CoreError> {
        let endpoint = format!("/comments/{}", post_id);
        let response = self
            .make_request(
                Method::GET,
                &endpoint,
                access_token,
                &[("sort", "confidence")],
            )
            .await?;

        // The endpoint returns `[post listing, comment listing]`.
        let (_post, comments): (PostListing, CommentListing) =
            response.json().await.map_err(|e| {
                error!("Failed to parse comments for {}: {}", post_id, e);
                CoreError::RedditApi(RedditApiError::InvalidResponse {
                    details: format!("Failed to parse comments for {}", post_id),
                })
            })?;

        debug!(
            "Retrieved {} top-level comment entries for {}",
            comments.data.children.len(),
            post_id
        );
        Ok(comments.data.children)
    }
}

fn status_error(response: &Response, endpoint: &str) -> RedditApiError {
    let status = response.status();
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            warn!("Rate limited, retry after {} seconds", retry_after);
            RedditApiError::RateLimitExceeded { retry_after }
        }
        StatusCode::UNAUTHORIZED => RedditApiError::InvalidToken,
        StatusCode::FORBIDDEN => RedditApiError::Forbidden {
            resource: endpoint.to_string(),
        },
        s if s.is_server_error() => RedditApiError::ServerError {
            status_code: s.as_u16(),
        },
        s if s.is_redirection() || s == StatusCode::NOT_FOUND => {
            RedditApiError::InvalidResponse {
                details: format!("Resource not found: {}", endpoint),
            }
        }
        s => RedditApiError::InvalidResponse {
            details: format!("Unexpected status {} for {}", s, endpoint),
        },
    }
}

fn subreddit_error(error: CoreError, subreddit: &str) -> CoreError {
    match error {
        CoreError::RedditApi(RedditApiError::InvalidResponse { details })
            if details.starts_with("Resource not found") =>
        {
            CoreError::RedditApi(RedditApiError::SubredditNotFound {
                subreddit: subreddit.to_string(),
            })
        }
        other => other,
    }
}

impl From<RedditPostData> for RedditPost {
    fn from(post_data: RedditPostData) -> Self {
        Self {
            id: post_data.id,
            title: post_data.title,
            permalink: post_data.permalink,
            selftext: post_data.selftext,
            score: post_data.score,
            upvote_ratio: post_data.upvote_ratio.unwrap_or(0.0),
            num_comments: post_data.num_comments,
            over_18: post_data.over_18,
            stickied: post_data.stickied,
            is_self: post_data.is_self,
        }
    }
}

impl From<RedditCommentThing> for CommentNode {
    fn from(thing: RedditCommentThing) -> Self {
        match thing {
            RedditCommentThing::Comment(data) => CommentNode::Comment(RedditComment {
                id: data.id,
                body: data.body,
                permalink: data.permalink,
                score: data.score,
                author: data.author.filter(|a| a != DELETED_AUTHOR),
                stickied: data.stickied,
            }),
            RedditCommentThing::More(more) => CommentNode::More { count: more.count },
        }
    }
}
