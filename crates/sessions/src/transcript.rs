//! Append-only transcript of one session.
//!
//! The log is the single source of truth for what was said: rendered chat
//! output and the text blob sent to the matching service both derive from
//! it. Turns are never edited or removed.
//!
//! Turns are grouped into *exchanges* (one user submission and everything
//! it produced). A turn whose speaker and text already appear in the
//! current exchange is dropped, which collapses an optimistic client echo
//! and the server-confirmed copy of the same message into one line. A turn
//! equal to the last one is dropped as well, so the rendered log never
//! repeats a line.

use serde::Serialize;
use sy_domain::trace::TraceEvent;
use sy_domain::Turn;

use crate::identity::SessionId;

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptLog {
    session_id: SessionId,
    turns: Vec<Turn>,
    /// Index of the first turn of the current exchange.
    #[serde(skip)]
    exchange_start: usize,
}

impl TranscriptLog {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            turns: Vec::new(),
            exchange_start: 0,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Start a new logical exchange. Duplicate detection only looks at
    /// turns appended after this call (plus the immediately preceding
    /// turn).
    pub fn begin_exchange(&mut self) {
        self.exchange_start = self.turns.len();
    }

    /// Append a turn. Returns `false` when it was dropped as a duplicate.
    pub fn append(&mut self, turn: Turn) -> bool {
        if self.is_duplicate(&turn) {
            tracing::debug!(
                session_id = %self.session_id,
                speaker = %turn.speaker,
                "dropping duplicate turn"
            );
            TraceEvent::TurnDeduplicated {
                session_id: self.session_id.to_string(),
                speaker: turn.speaker.label().to_owned(),
            }
            .emit();
            return false;
        }

        let speaker = turn.speaker;
        self.turns.push(turn);

        TraceEvent::TranscriptAppend {
            session_id: self.session_id.to_string(),
            speaker: speaker.label().to_owned(),
            turns: self.turns.len(),
        }
        .emit();
        true
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// `"User: ..."` / `"Assistant: ..."` lines in insertion order, joined
    /// by `\n`.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(Turn::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn is_duplicate(&self, turn: &Turn) -> bool {
        if self.turns.last() == Some(turn) {
            return true;
        }
        self.turns[self.exchange_start..].iter().any(|t| t == turn)
    }
}
