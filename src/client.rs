//! HTTP client for the GraphQL post lookup, authenticated as a guest.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::{
    GRAPHQL_FEATURES, GRAPHQL_FIELD_TOGGLES, GRAPHQL_OPERATION, GUEST_ACTIVATE_PATH,
};
use crate::error::{Error, Result, UpstreamKind};
use crate::id::extract_post_id;
use crate::raw::{RawPost, TweetResultResponse};
use crate::source::PostSource;

#[derive(Debug, Deserialize)]
struct GuestActivation {
    guest_token: String,
}

/// Client for the post lookup API.
///
/// A guest token is activated on first use and shared by later requests.
/// When the API rejects it, the token is dropped and the request is retried
/// once with a fresh one.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    query_id: String,
    bearer_token: String,
    guest_token: Mutex<Option<String>>,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::transport("Failed to build HTTP client", e))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            query_id: config.graphql_query_id.clone(),
            bearer_token: config.bearer_token.clone(),
            guest_token: Mutex::new(None),
        })
    }

    /// Fetch the raw payload for a post ID or URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] before any request is made when no
    /// post ID can be extracted, and upstream or payload errors otherwise.
    pub async fn get_raw_post(&self, id_or_url: &str) -> Result<Option<RawPost>> {
        let id = extract_post_id(id_or_url)?;
        self.fetch_raw_post(&id).await
    }

    async fn guest_token(&self) -> Result<String> {
        let mut cached = self.guest_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.activate_guest().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn invalidate_guest_token(&self) {
        self.guest_token.lock().await.take();
    }

    async fn activate_guest(&self) -> Result<String> {
        let url = format!("{}{GUEST_ACTIVATE_PATH}", self.base_url);
        debug!(url = %url, "Activating guest session");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| Error::transport("Failed to activate guest session", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let kind = if status == StatusCode::TOO_MANY_REQUESTS {
                UpstreamKind::RateLimited
            } else {
                UpstreamKind::Auth
            };
            return Err(Error::upstream(
                kind,
                format!("guest activation failed: {status} - {body}"),
            ));
        }

        let activation: GuestActivation = response.json().await.map_err(|e| {
            Error::upstream(
                UpstreamKind::Auth,
                format!("guest activation returned no token: {e}"),
            )
        })?;
        Ok(activation.guest_token)
    }

    async fn fetch_with_token(&self, id: &str, guest_token: &str) -> Result<Option<RawPost>> {
        let variables = serde_json::json!({
            "tweetId": id,
            "withCommunity": false,
            "includePromotedContent": false,
            "withVoice": false,
        })
        .to_string();
        let url = format!(
            "{}/graphql/{}/{GRAPHQL_OPERATION}?variables={}&features={}&fieldToggles={}",
            self.base_url,
            self.query_id,
            urlencoding::encode(&variables),
            urlencoding::encode(GRAPHQL_FEATURES),
            urlencoding::encode(GRAPHQL_FIELD_TOGGLES),
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .header("x-guest-token", guest_token)
            .header("x-twitter-active-user", "yes")
            .header("x-twitter-client-language", "en")
            .send()
            .await
            .map_err(|e| Error::transport(format!("Failed to fetch post {id}"), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(id, status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response for post {id}"), e))?;
        let parsed: TweetResultResponse = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(format!("unexpected response for post {id}: {e}")))?;

        let post = parsed.into_post();
        if post.is_none() {
            debug!(post_id = %id, "Lookup returned no post");
        }
        Ok(post)
    }
}

#[async_trait]
impl PostSource for ApiClient {
    async fn fetch_raw_post(&self, id: &str) -> Result<Option<RawPost>> {
        let token = self.guest_token().await?;
        match self.fetch_with_token(id, &token).await {
            Err(e) if e.upstream_kind() == Some(UpstreamKind::Auth) => {
                warn!(post_id = %id, error = %e, "Guest token rejected, retrying with a new one");
                self.invalidate_guest_token().await;
                let token = self.guest_token().await?;
                self.fetch_with_token(id, &token).await
            }
            result => result,
        }
    }
}

fn status_error(id: &str, status: StatusCode, body: &str) -> Error {
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamKind::Auth,
        StatusCode::NOT_FOUND => UpstreamKind::NotFound,
        StatusCode::TOO_MANY_REQUESTS => UpstreamKind::RateLimited,
        _ => UpstreamKind::Transport,
    };
    Error::upstream(kind, format!("post {id}: {status} - {body}"))
}
