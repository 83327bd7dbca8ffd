//! Minimal Slack Web API client (channel list, user list, channel history).

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const SLACK_API_URL: &str = "https://slack.com/api";

/// Slack `ok: false` error codes that indicate a bad or expired token.
const AUTH_ERRORS: &[&str] = &[
    "invalid_auth",
    "not_authed",
    "token_revoked",
    "account_inactive",
];

/// A channel record. Only `id` and `name` are inspected; everything else the
/// API returns rides along in `extra` and is written back out verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// A workspace member record, keyed by `name` on export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// A single message. `ts` doubles as the pagination cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub ts: String,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// One page of channel history, newest message first.
#[derive(Debug, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelsListResponse {
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct UsersListResponse {
    #[serde(default)]
    members: Vec<User>,
}

#[derive(Debug, Clone)]
pub struct SlackClient {
    http: Client,
    token: String,
    base_url: String,
}

impl SlackClient {
    /// Create client with the provided bearer token.
    pub fn new<S: Into<String>>(token: S) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::InvalidArgument("Slack token is empty".to_string()));
        }

        let http = Client::builder()
            .user_agent(format!("slack_export/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            token,
            base_url: SLACK_API_URL.to_string(),
        })
    }

    /// Create client with a custom base url (primarily for tests).
    pub fn with_base_url<S1: Into<String>, S2: Into<String>>(
        token: S1,
        base_url: S2,
    ) -> Result<Self> {
        let mut client = Self::new(token)?;
        client.base_url = base_url.into();
        Ok(client)
    }

    async fn get<D: for<'de> Deserialize<'de>>(
        &self,
        method: &'static str,
        query: &[(&str, String)],
    ) -> Result<D> {
        let url = format!("{}/{}", self.base_url, method);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Failed to call {}: {}", method, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read {} response: {}", method, e)))?;

        if status != StatusCode::OK {
            return Err(Error::SlackApi(format!(
                "{} returned HTTP {}: {}",
                method,
                status.as_u16(),
                text
            )));
        }

        let envelope: ApiEnvelope = serde_json::from_str(&text).map_err(|e| {
            Error::SlackApi(format!("{} returned non-JSON body: {} ({})", method, text, e))
        })?;

        if !envelope.ok {
            let reason = envelope.error.unwrap_or_else(|| "unknown_error".to_string());
            if AUTH_ERRORS.contains(&reason.as_str()) {
                return Err(Error::AuthFailed(reason));
            }
            return Err(Error::SlackApi(format!("{} failed: {}", method, reason)));
        }

        serde_json::from_str(&text).map_err(|e| {
            Error::SlackApi(format!("{} returned unexpected payload: {}", method, e))
        })
    }

    /// List all channels in the workspace.
    pub async fn list_channels(&self) -> Result<Vec<Channel>> {
        let response: ChannelsListResponse = self.get("channels.list", &[]).await?;
        Ok(response.channels)
    }

    /// List all members of the workspace.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let response: UsersListResponse = self.get("users.list", &[]).await?;
        Ok(response.members)
    }

    /// Fetch one page of channel history: up to `count` messages older than
    /// `latest`, or the most recent messages when `latest` is `None`.
    pub async fn history_page(
        &self,
        channel_id: &str,
        count: u32,
        latest: Option<&str>,
    ) -> Result<HistoryPage> {
        let mut query = vec![
            ("channel", channel_id.to_string()),
            ("count", count.to_string()),
        ];
        if let Some(ts) = latest {
            query.push(("latest", ts.to_string()));
        }

        self.get("channels.history", &query).await
    }
}
