//! Slack plumbing: slash-command payloads, token verification, and
//! `chat.postMessage` notifications.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use nebo_shared::{NeboError, Result};

/// User-Agent string for Slack API requests.
const USER_AGENT: &str = concat!("Nebo/", env!("CARGO_PKG_VERSION"));

/// Timeout in seconds for Slack API calls.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ---------------------------------------------------------------------------
// Slash commands
// ---------------------------------------------------------------------------

/// A slash-command invocation, as Slack posts it (form-encoded).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub token: String,
    pub command: String,
    /// Everything after the command name.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub response_url: String,
}

/// The app's verification token, compared in constant time.
#[derive(Clone)]
pub struct VerificationToken(String);

impl VerificationToken {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(NeboError::validation("verification token must be non-empty"));
        }
        Ok(Self(token))
    }

    /// Whether `candidate` is this token.
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(candidate.trim(), &self.0)
    }
}

impl std::fmt::Debug for VerificationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VerificationToken(..)")
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ---------------------------------------------------------------------------
// Web API client
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}

/// Minimal Slack Web API client authenticated with a bot token.
#[derive(Clone)]
pub struct SlackClient {
    http: Client,
    api_base: String,
    oauth_token: String,
}

impl SlackClient {
    pub fn new(api_base: impl Into<String>, oauth_token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| NeboError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            oauth_token: oauth_token.into(),
        })
    }

    /// Post `text` to `channel`. Returns the message timestamp.
    #[instrument(skip(self, text))]
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<String> {
        let url = format!("{}/chat.postMessage", self.api_base);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.oauth_token)
            .json(&PostMessageRequest { channel, text })
            .send()
            .await
            .map_err(|e| NeboError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NeboError::upstream(format!("chat.postMessage: HTTP {status}")));
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| NeboError::upstream(format!("chat.postMessage: invalid response: {e}")))?;

        if !body.ok {
            return Err(NeboError::upstream(format!(
                "chat.postMessage: {}",
                body.error.as_deref().unwrap_or("unknown error")
            )));
        }

        let ts = body.ts.unwrap_or_default();
        info!(
            channel = body.channel.as_deref().unwrap_or(channel),
            %ts,
            "message posted"
        );
        Ok(ts)
    }
}
