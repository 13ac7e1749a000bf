//! Session state
//!
//! What the bot remembers across connections in order to resume a session
//! instead of identifying again.

use crate::protocol::ResumePayload;

/// Resumable gateway session
#[derive(Debug, Clone, Default)]
pub struct Session {
    session_id: Option<String>,
    resume_gateway_url: Option<String>,
    sequence: Option<u64>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the session announced by READY
    pub fn start(&mut self, session_id: String, resume_gateway_url: Option<String>) {
        tracing::debug!(session_id = %session_id, "Gateway session started");
        self.session_id = Some(session_id);
        self.resume_gateway_url = resume_gateway_url;
    }

    /// Record the sequence number of a dispatch
    pub fn record_sequence(&mut self, sequence: u64) {
        self.sequence = Some(sequence);
    }

    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Whether the next connection can resume
    #[must_use]
    pub fn can_resume(&self) -> bool {
        self.session_id.is_some() && self.sequence.is_some()
    }

    /// Forget the session; the next connection identifies from scratch
    pub fn invalidate(&mut self) {
        if let Some(session_id) = self.session_id.take() {
            tracing::debug!(session_id = %session_id, "Gateway session invalidated");
        }
        self.resume_gateway_url = None;
        self.sequence = None;
    }

    /// Resume payload, if the session can be resumed
    #[must_use]
    pub fn resume_payload(&self, token: &str) -> Option<ResumePayload> {
        Some(ResumePayload {
            token: token.to_string(),
            session_id: self.session_id.clone()?,
            seq: self.sequence?,
        })
    }

    /// URL for the next connection
    ///
    /// Resuming goes to the URL READY handed out, keeping the query string
    /// (API version, encoding) of `default_url`.
    #[must_use]
    pub fn connect_url(&self, default_url: &str) -> String {
        match (&self.resume_gateway_url, self.can_resume()) {
            (Some(resume_url), true) => match default_url.split_once('?') {
                Some((_, query)) => format!("{}/?{query}", resume_url.trim_end_matches('/')),
                None => resume_url.clone(),
            },
            _ => default_url.to_string(),
        }
    }
}
