//! Chat relay: one user utterance in, one responder reply out.
//!
//! The relay validates locally and talks to the backend; it never touches
//! the transcript or the conversation state. Callers append the turns.

use std::sync::Arc;

use sy_client::{ChatRequest, SynergyBackend};
use sy_domain::error::{Error, Result};
use sy_domain::RelayResult;
use sy_sessions::SessionId;

pub struct ChatRelay {
    backend: Arc<dyn SynergyBackend>,
    max_chars: usize,
}

impl ChatRelay {
    pub fn new(backend: Arc<dyn SynergyBackend>, max_chars: usize) -> Self {
        Self { backend, max_chars }
    }

    /// Trim `text` and check it is sendable. Blank or over-long input is an
    /// `Error::Validation` and never reaches the network.
    pub fn validate(&self, text: &str) -> Result<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("message is empty".into()));
        }
        let chars = trimmed.chars().count();
        if chars > self.max_chars {
            return Err(Error::Validation(format!(
                "message is {chars} characters (max {})",
                self.max_chars
            )));
        }
        Ok(trimmed.to_owned())
    }

    pub async fn send(&self, session_id: &SessionId, text: &str) -> Result<RelayResult> {
        let message = self.validate(text)?;
        tracing::debug!(session_id = %session_id, chars = message.len(), "relaying utterance");
        self.backend
            .chat(ChatRequest {
                session_id: session_id.to_string(),
                message,
            })
            .await
    }
}
