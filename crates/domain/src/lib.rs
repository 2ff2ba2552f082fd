//! `sy-domain`: shared types for the Synergy conversational matcher.
//!
//! Holds the error type, the configuration tree, structured trace events,
//! and the conversation / match result model every other crate speaks.

pub mod config;
pub mod conversation;
pub mod error;
pub mod matching;
pub mod trace;

pub use conversation::{parse_trigger, ConversationState, RelayResult, Speaker, Turn};
pub use error::{Error, Result};
pub use matching::{
    format_team_suggestion, normalize_list, split_list, MatchCandidate, MatchResult, Profile,
    ScoreBand, TeamMember, TeamSuggestion,
};
