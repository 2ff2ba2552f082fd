//! Match orchestrator: transcript in, ranked collaborators out.
//!
//! The remote call often returns in well under a second, which reads as
//! "nothing happened". [`MatchOrchestrator::run`] therefore holds its
//! result until at least `min_visible` has passed since the call started.
//! The hold only delays the return (and so the state transition out of
//! `matching`); the network call itself is never delayed, and the hold is
//! never longer than the floor.

use std::sync::Arc;
use std::time::Duration;

use sy_client::{FindCollaboratorsRequest, SynergyBackend};
use sy_domain::error::{Error, Result};
use sy_domain::trace::TraceEvent;
use sy_domain::MatchResult;
use sy_sessions::SessionId;
use tokio::time::Instant;

pub struct MatchOrchestrator {
    backend: Arc<dyn SynergyBackend>,
    min_visible: Duration,
}

impl MatchOrchestrator {
    pub fn new(backend: Arc<dyn SynergyBackend>, min_visible: Duration) -> Self {
        Self {
            backend,
            min_visible,
        }
    }

    pub fn min_visible(&self) -> Duration {
        self.min_visible
    }

    /// Run one matching cycle against the rendered transcript.
    pub async fn run(&self, session_id: &SessionId, transcript: &str) -> Result<MatchResult> {
        if transcript.trim().is_empty() {
            return Err(Error::Validation("transcript is empty".into()));
        }

        TraceEvent::MatchingStarted {
            session_id: session_id.to_string(),
            transcript_chars: transcript.len(),
        }
        .emit();

        let started = Instant::now();
        let outcome = self
            .backend
            .find_collaborators(FindCollaboratorsRequest {
                session_id: session_id.to_string(),
                chat_transcript: transcript.to_owned(),
            })
            .await;
        let remote = started.elapsed();

        let hold = self.min_visible.saturating_sub(remote);
        if !hold.is_zero() {
            tokio::time::sleep(hold).await;
        }

        let remote_ms = remote.as_millis() as u64;
        let held_ms = hold.as_millis() as u64;
        match &outcome {
            Ok(result) => TraceEvent::MatchingCompleted {
                session_id: session_id.to_string(),
                matches: result.matches.len(),
                suggestions: result.suggestions.len(),
                remote_ms,
                held_ms,
            }
            .emit(),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "matching cycle failed");
                TraceEvent::MatchingFailed {
                    session_id: session_id.to_string(),
                    error: e.to_string(),
                    remote_ms,
                    held_ms,
                }
                .emit()
            }
        }

        outcome
    }
}
