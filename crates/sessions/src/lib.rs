//! Session state for a Synergy conversation.
//!
//! A session is one visit: an opaque [`SessionId`] that correlates every
//! backend request, and the append-only [`TranscriptLog`] of what was said.

pub mod identity;
pub mod transcript;

pub use identity::SessionId;
pub use transcript::TranscriptLog;
