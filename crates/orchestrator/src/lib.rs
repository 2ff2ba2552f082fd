//! `sy-orchestrator`: the conversation core.
//!
//! Drives one user's conversation from first utterance to a ranked list of
//! collaborators: relays chat turns, detects the matching trigger, runs one
//! matching cycle at a time, and publishes the conversation state for the
//! presentation layer.

pub mod conversation;
pub mod matcher;
pub mod relay;
pub mod state;
pub mod widget;

pub use conversation::{Conversation, SharedConversation, TurnOutcome};
pub use matcher::MatchOrchestrator;
pub use relay::ChatRelay;
pub use state::ConversationMachine;
pub use widget::{DeliveryOptions, MessageHandler, WidgetReadinessAdapter, INITIALIZING_MESSAGE};
