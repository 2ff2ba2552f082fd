use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Conversation surface
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// First assistant turn of every session. Empty disables it.
    #[serde(default = "d_greeting")]
    pub greeting: String,
    #[serde(default = "d_1000")]
    pub max_message_chars: usize,
    /// Assistant turn appended when the user submits blank input.
    #[serde(default = "d_empty_nudge")]
    pub empty_input_nudge: String,
    /// Assistant turn appended when the input exceeds `max_message_chars`.
    #[serde(default = "d_long_nudge")]
    pub long_input_nudge: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            greeting: d_greeting(),
            max_message_chars: d_1000(),
            empty_input_nudge: d_empty_nudge(),
            long_input_nudge: d_long_nudge(),
        }
    }
}

fn d_greeting() -> String {
    "Hi! I'm Synergy AI. I'll help you find the perfect collaborator. \
     Let's start - what's your name?"
        .into()
}
fn d_1000() -> usize {
    1000
}
fn d_empty_nudge() -> String {
    "I didn't catch that. Could you share a bit more?".into()
}
fn d_long_nudge() -> String {
    "That's a lot to take in at once. Could you keep it a little shorter?".into()
}
