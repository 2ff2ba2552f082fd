//! Conversation state machine.
//!
//! ```text
//!   idle ──send──▶ awaiting-response ──reply──▶ idle
//!                         │
//!                      trigger
//!                         ▼
//!                     matching ──ok──▶ ready
//!                         │
//!                        err──▶ failed
//!
//!   ready / failed ──next utterance──▶ awaiting-response
//! ```
//!
//! The current state is published on a `tokio::sync::watch` channel so the
//! presentation layer can follow transitions while network calls are in
//! flight. Every transition is a single `send_if_modified` call, so the
//! check and the set happen together and two trigger events can never both
//! move the machine into `matching`.

use std::sync::Arc;

use sy_domain::trace::TraceEvent;
use sy_domain::ConversationState;
use tokio::sync::watch;

/// Shared handle to one conversation's state. Clones observe and drive the
/// same machine.
#[derive(Debug, Clone)]
pub struct ConversationMachine {
    tx: Arc<watch::Sender<ConversationState>>,
}

impl Default for ConversationMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationMachine {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ConversationState::Idle);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> ConversationState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.tx.subscribe()
    }

    /// A user utterance is about to be relayed.
    ///
    /// Refused (returns `false`) while a relay or a matching cycle is
    /// already in flight. From `ready`/`failed` the conversation starts
    /// over.
    pub fn begin_relay(&self) -> bool {
        self.transition(|state| match state {
            ConversationState::AwaitingResponse | ConversationState::Matching => None,
            _ => Some(ConversationState::AwaitingResponse),
        })
    }

    /// The relay answered. Returns `true` when this call moved the machine
    /// into `matching`; the caller then owns the matching cycle.
    pub fn relay_settled(&self, triggered: bool) -> bool {
        let mut started = false;
        self.transition(|state| match state {
            ConversationState::AwaitingResponse if triggered => {
                started = true;
                Some(ConversationState::Matching)
            }
            ConversationState::AwaitingResponse => Some(ConversationState::Idle),
            _ => None,
        });
        started
    }

    /// The relay failed; the conversation can continue.
    pub fn relay_failed(&self) {
        self.transition(|state| match state {
            ConversationState::AwaitingResponse => Some(ConversationState::Idle),
            _ => None,
        });
    }

    /// Enter `matching` from any other state. Returns `false` if a cycle is
    /// already in flight.
    pub fn begin_matching(&self) -> bool {
        self.transition(|state| match state {
            ConversationState::Matching => None,
            _ => Some(ConversationState::Matching),
        })
    }

    /// Leave `matching` with the cycle's outcome. Ignored outside
    /// `matching`.
    pub fn finish_matching(&self, outcome: std::result::Result<(), String>) {
        let applied = self.transition(|state| match state {
            ConversationState::Matching => Some(match outcome {
                Ok(()) => ConversationState::Ready,
                Err(message) => ConversationState::Failed { message },
            }),
            _ => None,
        });
        if !applied {
            tracing::warn!("finish_matching called outside of a matching cycle");
        }
    }

    /// Report a recoverable failure outside a matching cycle (e.g. the chat
    /// widget is still initializing). Never interrupts `matching`.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        self.transition(|state| match state {
            ConversationState::Matching => None,
            _ => Some(ConversationState::Failed { message }),
        });
    }

    /// Back to `idle`, unconditionally.
    pub fn reset(&self) {
        self.transition(|_| Some(ConversationState::Idle));
    }

    fn transition(
        &self,
        decide: impl FnOnce(&ConversationState) -> Option<ConversationState>,
    ) -> bool {
        let mut change = None;
        let modified = self.tx.send_if_modified(|state| match decide(state) {
            Some(next) if next != *state => {
                change = Some((state.name(), next.name()));
                *state = next;
                true
            }
            _ => false,
        });

        if let Some((from, to)) = change {
            tracing::debug!(from, to, "conversation state changed");
            TraceEvent::StateChanged {
                from: from.to_owned(),
                to: to.to_owned(),
            }
            .emit();
        }
        modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        assert_eq!(ConversationMachine::new().state(), ConversationState::Idle);
    }

    #[test]
    fn untriggered_reply_returns_to_idle() {
        let m = ConversationMachine::new();
        assert!(m.begin_relay());
        assert_eq!(m.state(), ConversationState::AwaitingResponse);
        assert!(!m.relay_settled(false));
        assert_eq!(m.state(), ConversationState::Idle);
    }

    #[test]
    fn trigger_enters_matching_then_ready() {
        let m = ConversationMachine::new();
        m.begin_relay();
        assert!(m.relay_settled(true));
        assert!(m.state().is_matching());
        m.finish_matching(Ok(()));
        assert_eq!(m.state(), ConversationState::Ready);
    }

    #[test]
    fn matching_failure_carries_message() {
        let m = ConversationMachine::new();
        m.begin_relay();
        m.relay_settled(true);
        m.finish_matching(Err("vector store offline".into()));
        assert_eq!(m.state().error(), Some("vector store offline"));
    }

    #[test]
    fn second_trigger_cannot_start_another_cycle() {
        let m = ConversationMachine::new();
        assert!(m.begin_matching());
        let other = m.clone();
        assert!(!other.begin_matching());
        assert!(!other.begin_relay());
        assert!(!other.relay_settled(true));
        assert!(m.state().is_matching());
    }

    #[test]
    fn relay_is_not_pipelined() {
        let m = ConversationMachine::new();
        assert!(m.begin_relay());
        assert!(!m.begin_relay());
    }

    #[test]
    fn settled_states_restart_on_next_utterance() {
        let m = ConversationMachine::new();
        m.begin_matching();
        m.finish_matching(Ok(()));
        assert!(m.begin_relay());
        assert_eq!(m.state(), ConversationState::AwaitingResponse);

        m.relay_settled(true);
        m.finish_matching(Err("nope".into()));
        assert!(m.begin_relay());
    }

    #[test]
    fn fail_does_not_interrupt_matching() {
        let m = ConversationMachine::new();
        m.begin_matching();
        m.fail("still initializing");
        assert!(m.state().is_matching());

        m.finish_matching(Ok(()));
        m.fail("still initializing");
        assert_eq!(m.state().error(), Some("still initializing"));
    }

    #[test]
    fn finish_outside_matching_is_ignored() {
        let m = ConversationMachine::new();
        m.finish_matching(Ok(()));
        assert_eq!(m.state(), ConversationState::Idle);
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let m = ConversationMachine::new();
        let mut rx = m.subscribe();

        m.begin_relay();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), ConversationState::AwaitingResponse);

        m.relay_settled(true);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_matching());
    }
}
