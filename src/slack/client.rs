//! Slack Web API client for the star feed.
//!
//! Wire envelopes mirror the `stars.list` / `users.info` /
//! `conversations.info` / `stars.remove` responses: an `ok` flag plus an
//! `error` string on failure. A transport failure and an `ok: false`
//! answer are reported as distinct errors so the cycle log can tell
//! unreachable apart from rejected.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::gateway::StarSource;
use crate::models::author::Author;
use crate::models::context::{Context, ContextKind};
use crate::models::item::StarredItem;
use crate::{AppError, Result};

const API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Deserialize)]
struct StarsListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    items: Vec<StarredItem>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<Author>,
}

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channel: Option<WireChannel>,
}

/// Conversation payload as the API ships it: kind as exclusive booleans.
// Wire mirror — the flags collapse into `ContextKind` right after
// deserialization.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Deserialize)]
struct WireChannel {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    is_channel: bool,
    #[serde(default)]
    is_group: bool,
    #[serde(default)]
    is_im: bool,
    #[serde(default)]
    is_mpim: bool,
    #[serde(default)]
    purpose: Option<WirePurpose>,
}

#[derive(Debug, Deserialize)]
struct WirePurpose {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct SimpleResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct RemoveStarRequest {
    channel: String,
    timestamp: String,
}

/// Star-feed client over a shared HTTP connection pool.
///
/// Holds the user token and a bounded-timeout `reqwest` client; every
/// method is a single request with no internal retry.
pub struct SlackClient {
    http: reqwest::Client,
    token: String,
}

impl SlackClient {
    /// Build a client with a bounded per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if the HTTP client cannot be built.
    pub fn new(token: String, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| AppError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self { http, token })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .http
            .get(format!("{API_BASE}/{method}"))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Protocol(format!("{method}: malformed response: {err}")))
    }

    fn rejected(method: &str, error: Option<String>) -> AppError {
        AppError::Protocol(format!(
            "{method}: {}",
            error.unwrap_or_else(|| "unknown error".to_owned())
        ))
    }
}

impl StarSource for SlackClient {
    fn list_starred(&self) -> Pin<Box<dyn Future<Output = Result<Vec<StarredItem>>> + Send + '_>> {
        Box::pin(async move {
            let response: StarsListResponse = self.get_json("stars.list", &[]).await?;
            if !response.ok {
                return Err(Self::rejected("stars.list", response.error));
            }

            debug!(count = response.items.len(), "listed starred items");
            Ok(response.items)
        })
    }

    fn resolve_author(
        &self,
        user_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Author>> + Send + '_>> {
        let user_id = user_id.to_owned();
        Box::pin(async move {
            let response: UserResponse = self
                .get_json("users.info", &[("user", user_id.as_str())])
                .await?;
            if !response.ok {
                return Err(Self::rejected("users.info", response.error));
            }

            response
                .user
                .ok_or_else(|| AppError::Protocol("users.info: missing user in response".into()))
        })
    }

    fn resolve_context(
        &self,
        channel_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Context>> + Send + '_>> {
        let channel_id = channel_id.to_owned();
        Box::pin(async move {
            let response: ChannelResponse = self
                .get_json("conversations.info", &[("channel", channel_id.as_str())])
                .await?;
            if !response.ok {
                return Err(Self::rejected("conversations.info", response.error));
            }

            let wire = response.channel.ok_or_else(|| {
                AppError::Protocol("conversations.info: missing channel in response".into())
            })?;
            let kind =
                ContextKind::from_flags(wire.is_im, wire.is_mpim, wire.is_channel, wire.is_group)?;

            Ok(Context {
                id: wire.id,
                name: wire.name,
                purpose: wire.purpose.map_or_else(String::new, |p| p.value),
                kind,
            })
        })
    }

    fn acknowledge(
        &self,
        channel: &str,
        ts: &str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let body = RemoveStarRequest {
            channel: channel.to_owned(),
            timestamp: ts.to_owned(),
        };
        Box::pin(async move {
            let response = self
                .http
                .post(format!("{API_BASE}/stars.remove"))
                .bearer_auth(&self.token)
                .json(&body)
                .send()
                .await?;

            let envelope: SimpleResponse = response.json().await.map_err(|err| {
                AppError::Protocol(format!("stars.remove: malformed response: {err}"))
            })?;
            if !envelope.ok {
                return Err(Self::rejected("stars.remove", envelope.error));
            }

            debug!(channel = %body.channel, ts = %body.timestamp, "star removed");
            Ok(())
        })
    }
}
