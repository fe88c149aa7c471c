use oauth2::basic::{BasicClient, BasicErrorResponseType};
use oauth2::{
    AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, RequestTokenError,
    ResourceOwnerPassword, ResourceOwnerUsername, Scope, StandardErrorResponse, TokenResponse,
    TokenUrl,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use threadpick_core::{ConfigError, CoreError, RedditApiError, RedditCredentials};
use tracing::{debug, info, warn};

pub const REDDIT_AUTHORIZE_URL: &str = "https://www.reddit.com/api/v1/authorize";
pub const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const REDDIT_API_BASE: &str = "https://oauth.reddit.com";

/// Reddit tokens live for an hour when `expires_in` is missing.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);
/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct RedditOAuth2Config {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
    pub token_url: String,
    pub api_base: String,
}

impl RedditOAuth2Config {
    pub fn new(
        client_id: String,
        client_secret: String,
        username: String,
        password: String,
        user_agent: String,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            username,
            password,
            user_agent,
            token_url: REDDIT_TOKEN_URL.to_string(),
            api_base: REDDIT_API_BASE.to_string(),
        }
    }

    pub fn from_credentials(credentials: &RedditCredentials, user_agent: String) -> Self {
        Self::new(
            credentials.client_id.clone(),
            credentials.client_secret.clone(),
            credentials.username.clone(),
            credentials.password.clone(),
            user_agent,
        )
    }

    /// Reddit accepts `password:code` as the password of 2FA-protected accounts.
    pub fn with_two_factor_code(mut self, code: &str) -> Self {
        self.password = format!("{}:{}", self.password, code.trim());
        self
    }

    pub fn with_endpoints(mut self, token_url: String, api_base: String) -> Self {
        self.token_url = token_url;
        self.api_base = api_base;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: SystemTime,
    pub scope: Vec<String>,
}

impl RedditToken {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() + EXPIRY_MARGIN >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub enum AuthState {
    NotAuthenticated,
    Authenticated { token: RedditToken },
    TokenExpired { token: RedditToken },
}

pub(crate) fn build_oauth_client(config: &RedditOAuth2Config) -> Result<BasicClient, CoreError> {
    let auth_url = AuthUrl::new(REDDIT_AUTHORIZE_URL.to_string()).map_err(|e| {
        ConfigError::InvalidValue {
            field: "authorize_url".to_string(),
            value: e.to_string(),
        }
    })?;
    let token_url = TokenUrl::new(config.token_url.clone()).map_err(|e| {
        ConfigError::InvalidValue {
            field: "token_url".to_string(),
            value: e.to_string(),
        }
    })?;

    Ok(BasicClient::new(
        ClientId::new(config.client_id.clone()),
        Some(ClientSecret::new(config.client_secret.clone())),
        auth_url,
        Some(token_url),
    ))
}

pub fn required_scopes() -> Vec<&'static str> {
    vec!["read"]
}

/// Resource-owner password grant. Any rejection from Reddit is reported as
/// an authentication failure.
pub(crate) async fn exchange_password(
    oauth_client: &BasicClient,
    http: &reqwest::Client,
    config: &RedditOAuth2Config,
) -> Result<RedditToken, CoreError> {
    info!("Logging into Reddit as {}", config.username);

    let username = ResourceOwnerUsername::new(config.username.clone());
    let password = ResourceOwnerPassword::new(config.password.clone());
    let mut request = oauth_client.exchange_password(&username, &password);
    for scope in required_scopes() {
        request = request.add_scope(Scope::new(scope.to_string()));
    }

    let response = request
        .request_async(|req| send_oauth_request(http, req))
        .await
        .map_err(token_error)?;

    let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
    let scope = response
        .scopes()
        .map(|scopes| scopes.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();

    debug!("Received Reddit access token valid for {:?}", lifetime);
    Ok(RedditToken {
        access_token: response.access_token().secret().clone(),
        refresh_token: response.refresh_token().map(|t| t.secret().clone()),
        expires_at: SystemTime::now() + lifetime,
        scope,
    })
}

async fn send_oauth_request(
    http: &reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, reqwest::Error> {
    let response = http
        .request(request.method, request.url.as_str())
        .headers(request.headers)
        .body(request.body)
        .send()
        .await?;

    let status_code = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

fn token_error(
    error: RequestTokenError<reqwest::Error, StandardErrorResponse<BasicErrorResponseType>>,
) -> CoreError {
    match error {
        RequestTokenError::Request(e) => {
            warn!("Token request failed before reaching Reddit: {}", e);
            CoreError::Network(e)
        }
        RequestTokenError::ServerResponse(response) => {
            CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                reason: response.error().to_string(),
            })
        }
        // Reddit answers bad credentials with HTTP 200 and `{"error": "invalid_grant"}`,
        // which does not parse as a token response.
        RequestTokenError::Parse(_, body) => {
            CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                reason: String::from_utf8_lossy(&body).into_owned(),
            })
        }
        RequestTokenError::Other(message) => {
            CoreError::RedditApi(RedditApiError::AuthenticationFailed { reason: message })
        }
    }
}
