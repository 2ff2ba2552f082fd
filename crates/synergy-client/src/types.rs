//! Wire DTOs for the Synergy backend.
//!
//! Field names are `snake_case` on the wire and must not be renamed: the
//! backend reads `session_id`, `message` and `chat_transcript` verbatim.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sy_domain::error::{Error, Result};
use sy_domain::{parse_trigger, MatchCandidate, MatchResult, Profile, RelayResult, TeamSuggestion};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// POST /chat: request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// POST /chat: response body.
///
/// Both fields are kept loose so a malformed reply surfaces as a protocol
/// error instead of a generic JSON failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub is_trigger: Option<Value>,
}

impl ChatResponse {
    pub fn into_relay_result(self) -> Result<RelayResult> {
        let reply_text = match self.response {
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(Error::malformed(format!(
                    "chat response text is not a string: {other}"
                )))
            }
            None => return Err(Error::malformed("chat response is missing `response`")),
        };
        Ok(RelayResult {
            reply_text,
            triggered: parse_trigger(self.is_trigger.as_ref()),
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Matching
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// POST /find-collaborators: request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindCollaboratorsRequest {
    pub session_id: String,
    pub chat_transcript: String,
}

/// POST /find-collaborators: response body. Absent or `null` lists are
/// treated as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindCollaboratorsResponse {
    #[serde(default)]
    pub your_profile: Option<Profile>,
    #[serde(default)]
    pub matches: Option<Vec<MatchCandidate>>,
    #[serde(default)]
    pub team_suggestions: Option<Vec<TeamSuggestion>>,
    #[serde(default)]
    pub user_id: Option<Value>,
}

impl From<FindCollaboratorsResponse> for MatchResult {
    fn from(resp: FindCollaboratorsResponse) -> Self {
        let user_id = match resp.user_id {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        MatchResult {
            profile: resp.your_profile,
            matches: resp.matches.unwrap_or_default(),
            suggestions: resp.team_suggestions.unwrap_or_default(),
            user_id,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Reference endpoints
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// GET /health: response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: Option<String>,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}

/// GET /collaborators: either a bare list or `{ "collaborators": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CollaboratorsResponse {
    List(Vec<MatchCandidate>),
    Wrapped { collaborators: Vec<MatchCandidate> },
}

impl From<CollaboratorsResponse> for Vec<MatchCandidate> {
    fn from(resp: CollaboratorsResponse) -> Self {
        match resp {
            CollaboratorsResponse::List(list) => list,
            CollaboratorsResponse::Wrapped { collaborators } => collaborators,
        }
    }
}

/// Error body: `{ "error": "..." }`, every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract the `error` string from a raw body, if it is JSON and has one.
    pub fn parse(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|e| !e.trim().is_empty())
    }
}
