//! The `SynergyBackend` trait defines the remote contract consumed by the
//! conversation core (REST in production, in-memory doubles in tests).

use async_trait::async_trait;
use sy_domain::error::Result;
use sy_domain::{MatchCandidate, MatchResult, RelayResult};

use crate::types::{ChatRequest, FindCollaboratorsRequest};

/// Abstraction over the Synergy backend API surface.
///
/// All methods return `sy_domain::error::Result`. Transport failures map to
/// `Error::Network` / `Error::Timeout`; non-2xx statuses and malformed
/// bodies map to `Error::Protocol`.
#[async_trait]
pub trait SynergyBackend: Send + Sync {
    /// Relay one user utterance (POST /chat).
    async fn chat(&self, req: ChatRequest) -> Result<RelayResult>;

    /// Extract a profile from the transcript and rank collaborators
    /// (POST /find-collaborators).
    async fn find_collaborators(&self, req: FindCollaboratorsRequest) -> Result<MatchResult>;

    /// Liveness check (GET /health). `Ok(false)` means the backend answered
    /// with a status other than `"ok"`.
    async fn health(&self) -> Result<bool>;

    /// Reference list of collaborators, optionally filtered by role
    /// (GET /collaborators?role=).
    async fn collaborators(&self, role: Option<&str>) -> Result<Vec<MatchCandidate>>;
}
