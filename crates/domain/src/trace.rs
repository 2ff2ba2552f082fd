use serde::Serialize;

/// Structured trace events emitted across all Synergy crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    BackendCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    TriggerDetected {
        session_id: String,
    },
    MatchingStarted {
        session_id: String,
        transcript_chars: usize,
    },
    MatchingCompleted {
        session_id: String,
        matches: usize,
        suggestions: usize,
        remote_ms: u64,
        held_ms: u64,
    },
    MatchingFailed {
        session_id: String,
        error: String,
        remote_ms: u64,
        held_ms: u64,
    },
    SessionRotated {
        old_session_id: String,
        new_session_id: String,
    },
    TranscriptAppend {
        session_id: String,
        speaker: String,
        turns: usize,
    },
    TurnDeduplicated {
        session_id: String,
        speaker: String,
    },
    WidgetDeliveryRetry {
        attempt: u32,
        max_attempts: u32,
    },
    WidgetUnavailable {
        attempts: u32,
    },
    StateChanged {
        from: String,
        to: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "sy_event");
    }
}
