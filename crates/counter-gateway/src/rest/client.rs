//! Platform REST API client
//!
//! Implements [`ChatPlatform`] on top of the platform's HTTP API. Rate limited
//! requests are retried once when the platform asks for a short wait.

use std::time::Duration;

use async_trait::async_trait;
use counter_common::PlatformConfig;
use counter_core::Snowflake;
use counter_service::{ChatPlatform, Embed, PlatformError, PlatformResult};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, warn};

/// Header carrying the audit log reason of a moderation action
const AUDIT_LOG_REASON: &str = "X-Audit-Log-Reason";

const USER_AGENT: &str = concat!("DiscordBot (counter-bot, ", env!("CARGO_PKG_VERSION"), ")");

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest rate limit wait we sit out before giving up
const MAX_RETRY_WAIT: Duration = Duration::from_secs(5);

const MAX_RATE_LIMIT_RETRIES: u32 = 1;

/// Wait assumed when a 429 carries no usable `retry_after`
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Channel object, reduced to what the bot reads
#[derive(Debug, Deserialize)]
struct ChannelResponse {
    #[serde(default)]
    name: Option<String>,
}

/// Platform REST API client
#[derive(Clone)]
pub struct RestClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestClient {
    /// Create a client for the configured API base URL
    pub fn new(config: &PlatformConfig) -> PlatformResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PlatformError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request built by `build`, retrying once on a short rate limit
    async fn execute<F>(&self, what: &str, build: F) -> PlatformResult<Response>
    where
        F: Fn(&reqwest::Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let response = build(&self.http_client)
                .header(AUTHORIZATION, format!("Bot {}", self.token))
                .send()
                .await
                .map_err(|e| PlatformError::Http(format!("{what}: {e}")))?;

            match check_response(response, what).await {
                Err(PlatformError::RateLimited { retry_after })
                    if attempt < MAX_RATE_LIMIT_RETRIES && retry_after <= MAX_RETRY_WAIT =>
                {
                    attempt += 1;
                    warn!(
                        what,
                        retry_after_ms = retry_after.as_millis() as u64,
                        "Rate limited, retrying"
                    );
                    tokio::time::sleep(retry_after).await;
                }
                other => return other,
            }
        }
    }
}

/// Turn non-success responses into platform errors
async fn check_response(response: Response, what: &str) -> PlatformResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify(status, &body, what))
}

/// Map an error status to a [`PlatformError`]
fn classify(status: StatusCode, body: &str, what: &str) -> PlatformError {
    match status {
        StatusCode::FORBIDDEN => PlatformError::Forbidden(what.to_string()),
        StatusCode::NOT_FOUND => PlatformError::NotFound(what.to_string()),
        StatusCode::TOO_MANY_REQUESTS => PlatformError::RateLimited {
            retry_after: parse_retry_after(body),
        },
        _ => PlatformError::Http(format!("{what}: {status} {body}")),
    }
}

/// Read `retry_after` (seconds, fractional) from a 429 body
fn parse_retry_after(body: &str) -> Duration {
    #[derive(Deserialize)]
    struct RateLimitBody {
        retry_after: f64,
    }

    serde_json::from_str::<RateLimitBody>(body)
        .ok()
        .and_then(|b| Duration::try_from_secs_f64(b.retry_after).ok())
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

/// Audit log reasons travel in a header and must be valid header text
fn audit_reason(reason: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(reason).ok()
}

#[async_trait]
impl ChatPlatform for RestClient {
    #[instrument(skip(self, content))]
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        let url = self.url(&format!("/channels/{channel_id}/messages"));
        let body = json!({ "content": content });

        self.execute("send message", |http| http.post(&url).json(&body)).await?;
        debug!("Message sent");
        Ok(())
    }

    #[instrument(skip(self, embed), fields(title = %embed.title))]
    async fn send_embed(&self, channel_id: Snowflake, embed: &Embed) -> PlatformResult<()> {
        let url = self.url(&format!("/channels/{channel_id}/messages"));
        let body = json!({ "embeds": [embed] });

        self.execute("send embed", |http| http.post(&url).json(&body)).await?;
        debug!("Embed sent");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<()> {
        let url = self.url(&format!("/channels/{channel_id}/messages/{message_id}"));

        self.execute("delete message", |http| http.delete(&url)).await?;
        debug!("Message deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_slowmode(
        &self,
        channel_id: Snowflake,
        seconds: u32,
        reason: &str,
    ) -> PlatformResult<()> {
        let url = self.url(&format!("/channels/{channel_id}"));
        let body = json!({ "rate_limit_per_user": seconds });
        let reason = audit_reason(reason);

        self.execute("edit channel", |http| {
            let request = http.patch(&url).json(&body);
            match &reason {
                Some(reason) => request.header(AUDIT_LOG_REASON, reason.clone()),
                None => request,
            }
        })
        .await?;
        debug!("Slowmode updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn channel_name(&self, channel_id: Snowflake) -> PlatformResult<String> {
        let url = self.url(&format!("/channels/{channel_id}"));

        let channel: ChannelResponse = self
            .execute("get channel", |http| http.get(&url))
            .await?
            .json()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))?;

        // Direct message channels have no name
        Ok(channel.name.unwrap_or_else(|| channel_id.to_string()))
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> PlatformConfig {
        PlatformConfig {
            token: "secret".to_string(),
            application_id: 1,
            api_base_url: base.to_string(),
            gateway_url: "wss://gateway.example".to_string(),
        }
    }

    #[test]
    fn test_url_building() {
        let client = RestClient::new(&config("https://discord.com/api/v10/")).unwrap();
        assert_eq!(
            client.url("/channels/1/messages"),
            "https://discord.com/api/v10/channels/1/messages"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = RestClient::new(&config("https://discord.com/api/v10")).unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[test]
    fn test_classify_statuses() {
        assert!(classify(StatusCode::FORBIDDEN, "", "delete message").is_forbidden());
        assert!(classify(StatusCode::NOT_FOUND, "", "get channel").is_not_found());
        assert!(matches!(
            classify(StatusCode::TOO_MANY_REQUESTS, r#"{"retry_after": 0.25}"#, "x"),
            PlatformError::RateLimited { retry_after } if retry_after == Duration::from_millis(250)
        ));

        let err = classify(StatusCode::BAD_GATEWAY, "upstream", "send message");
        assert!(!err.is_rejection());
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_retry_after_fallback() {
        assert_eq!(parse_retry_after("not json"), DEFAULT_RETRY_AFTER);
        assert_eq!(parse_retry_after(r#"{"retry_after": -1.0}"#), DEFAULT_RETRY_AFTER);
        assert_eq!(
            parse_retry_after(r#"{"message": "slow down", "retry_after": 2, "global": false}"#),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn test_audit_reason() {
        assert!(audit_reason("Counting game started").is_some());
        assert!(audit_reason("line\nbreak").is_none());
    }
}
