//! Handshake payload definitions
//!
//! Payloads exchanged while opening or resuming a session.

use serde::{Deserialize, Serialize};

use super::Intents;

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Heartbeat interval as a duration
    #[must_use]
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.heartbeat_interval)
    }
}

/// Payload for op 2 (Identify)
///
/// Sent by the bot to start a new session.
#[derive(Clone, Serialize)]
pub struct IdentifyPayload {
    /// Bot token, without the `Bot ` prefix
    pub token: String,

    pub intents: Intents,

    pub properties: IdentifyProperties,
}

impl IdentifyPayload {
    /// Identify as the counting bot with the default properties
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            intents: Intents::counting_bot(),
            properties: IdentifyProperties::default(),
        }
    }
}

// Keep the token out of logs
impl std::fmt::Debug for IdentifyPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifyPayload")
            .field("token", &"<redacted>")
            .field("intents", &self.intents)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Client connection properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyProperties {
    /// Operating system
    pub os: String,

    /// Library name
    pub browser: String,

    /// Library name, again
    pub device: String,
}

impl IdentifyProperties {
    /// Library name reported to the gateway
    pub const LIBRARY: &'static str = "counter-bot";
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: Self::LIBRARY.to_string(),
            device: Self::LIBRARY.to_string(),
        }
    }
}

/// Payload for op 6 (Resume)
///
/// Sent by the bot to resume a disconnected session.
#[derive(Clone, Serialize)]
pub struct ResumePayload {
    /// Bot token
    pub token: String,

    /// Session ID to resume
    pub session_id: String,

    /// Last received sequence number
    pub seq: u64,
}

impl std::fmt::Debug for ResumePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResumePayload")
            .field("token", &"<redacted>")
            .field("session_id", &self.session_id)
            .field("seq", &self.seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_payload() {
        let hello: HelloPayload =
            serde_json::from_str(r#"{"heartbeat_interval":41250,"_trace":["gateway-prd"]}"#)
                .unwrap();
        assert_eq!(hello.heartbeat_interval, 41_250);
        assert_eq!(hello.interval().as_millis(), 41_250);
    }

    #[test]
    fn test_identify_payload_serialization() {
        let payload = IdentifyPayload::new("token123");
        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["token"], "token123");
        assert_eq!(json["intents"], 33283);
        assert_eq!(json["properties"]["browser"], "counter-bot");
        assert!(json["properties"]["os"].is_string());
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let identify = format!("{:?}", IdentifyPayload::new("secret"));
        assert!(!identify.contains("secret"));

        let resume = ResumePayload {
            token: "secret".to_string(),
            session_id: "abc".to_string(),
            seq: 7,
        };
        let resume = format!("{resume:?}");
        assert!(!resume.contains("secret"));
        assert!(resume.contains("abc"));
    }

    #[test]
    fn test_resume_payload_serialization() {
        let payload = ResumePayload {
            token: "t".to_string(),
            session_id: "abc".to_string(),
            seq: 42,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"token":"t","session_id":"abc","seq":42}"#);
    }
}
