//! Top-level orchestration context.
//!
//! [`Conversation`] owns the session identity, the transcript and the latest
//! match result, and is their only writer. One user submission flows
//! through [`Conversation::handle_user_message`]:
//!
//! 1. local validation (blank / over-long input becomes a nudge turn),
//! 2. the chat relay,
//! 3. on a trigger, one matching cycle, then session rotation on success.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sy_client::SynergyBackend;
use sy_domain::config::{Config, ConversationConfig};
use sy_domain::error::{Error, Result};
use sy_domain::trace::TraceEvent;
use sy_domain::{ConversationState, MatchResult, Turn};
use sy_sessions::{SessionId, TranscriptLog};
use tokio::sync::{watch, Mutex};

use crate::matcher::MatchOrchestrator;
use crate::relay::ChatRelay;
use crate::state::ConversationMachine;
use crate::widget::{DeliveryOptions, MessageHandler};

const RELAY_CONNECT_APOLOGY: &str =
    "I'm having trouble connecting. Check the backend and try again.";
const RELAY_GENERIC_APOLOGY: &str = "Something went wrong. Try again in a moment.";
const MATCH_CONNECT_FAILURE: &str =
    "Unable to reach Synergy right now. Check your connection and try again.";
const MATCH_GENERIC_FAILURE: &str = "Unable to find collaborators right now.";

/// What a single submission ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank or over-long input; a nudge turn was appended locally.
    Nudged,
    /// The responder replied without triggering matching.
    Replied,
    /// The relay failed; an apology turn was appended.
    RelayFailed,
    /// A matching cycle ran and the result is available.
    Matched,
    /// A matching cycle ran and failed; the session was kept for a retry.
    MatchFailed,
    /// Another relay or matching cycle was in flight; nothing was sent.
    Busy,
}

pub struct Conversation {
    transcript: TranscriptLog,
    result: Option<MatchResult>,
    /// Transcript of the session that produced `result`.
    matched: Option<TranscriptLog>,
    /// The last matching cycle failed and nothing has been said since.
    retryable: bool,
    machine: ConversationMachine,
    relay: ChatRelay,
    matcher: MatchOrchestrator,
    settings: ConversationConfig,
}

impl Conversation {
    pub fn new(backend: Arc<dyn SynergyBackend>, config: &Config) -> Self {
        Self::with_machine(backend, config, ConversationMachine::new())
    }

    /// Build around an existing machine, e.g. one already shared with a
    /// [`WidgetReadinessAdapter`](crate::WidgetReadinessAdapter).
    pub fn with_machine(
        backend: Arc<dyn SynergyBackend>,
        config: &Config,
        machine: ConversationMachine,
    ) -> Self {
        let settings = config.conversation.clone();
        let relay = ChatRelay::new(backend.clone(), settings.max_message_chars);
        let matcher = MatchOrchestrator::new(
            backend,
            Duration::from_millis(config.matching.min_visible_ms),
        );
        let transcript = start_transcript(SessionId::create(), &settings.greeting);
        tracing::info!(session_id = %transcript.session_id(), "conversation started");

        Self {
            transcript,
            result: None,
            matched: None,
            retryable: false,
            machine,
            relay,
            matcher,
            settings,
        }
    }

    // ── accessors ───────────────────────────────────────────────────

    pub fn state(&self) -> ConversationState {
        self.machine.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.machine.subscribe()
    }

    pub fn machine(&self) -> &ConversationMachine {
        &self.machine
    }

    pub fn session_id(&self) -> &SessionId {
        self.transcript.session_id()
    }

    pub fn transcript(&self) -> &TranscriptLog {
        &self.transcript
    }

    /// The latest match result. Kept while `ready`; cleared by the next
    /// utterance or by [`reset`](Self::reset).
    pub fn result(&self) -> Option<&MatchResult> {
        self.result.as_ref()
    }

    /// The retired transcript that `result` was computed from. The live
    /// transcript belongs to the rotated session.
    pub fn matched_transcript(&self) -> Option<&TranscriptLog> {
        self.matched.as_ref()
    }

    // ── turn handling ───────────────────────────────────────────────

    pub async fn handle_user_message(
        &mut self,
        text: &str,
        options: DeliveryOptions,
    ) -> TurnOutcome {
        self.transcript.begin_exchange();

        let message = match self.relay.validate(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "input rejected locally");
                let nudge = if text.trim().is_empty() {
                    &self.settings.empty_input_nudge
                } else {
                    &self.settings.long_input_nudge
                };
                self.transcript.append(Turn::assistant(nudge.clone()));
                return TurnOutcome::Nudged;
            }
        };

        let restarting = self.state().is_settled();
        if !self.machine.begin_relay() {
            tracing::debug!(state = self.state().name(), "submission while busy, ignored");
            return TurnOutcome::Busy;
        }
        self.retryable = false;
        if restarting {
            self.result = None;
            self.matched = None;
        }

        if options.add_client_message {
            self.transcript.append(Turn::user(message.clone()));
        }

        let session_id = self.session_id().clone();
        let reply = match self.relay.send(&session_id, &message).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "chat relay failed");
                self.machine.relay_failed();
                self.transcript.append(Turn::user(message));
                self.transcript.append(Turn::assistant(relay_apology(&e)));
                return TurnOutcome::RelayFailed;
            }
        };

        self.transcript.append(Turn::user(message));
        self.transcript.append(Turn::assistant(reply.reply_text));

        if !self.machine.relay_settled(reply.triggered) {
            return TurnOutcome::Replied;
        }

        TraceEvent::TriggerDetected {
            session_id: session_id.to_string(),
        }
        .emit();
        self.run_matching_cycle().await
    }

    /// Re-run matching against the preserved transcript after a failed
    /// matching cycle. Any other `failed` state (e.g. the widget still
    /// initializing) has nothing to retry.
    pub async fn retry_matching(&mut self) -> Result<TurnOutcome> {
        match self.state() {
            ConversationState::Failed { .. } if self.retryable => {}
            ConversationState::Matching => {
                return Err(Error::MatchingInFlight(self.session_id().to_string()))
            }
            other => {
                return Err(Error::Validation(format!(
                    "no failed matching cycle to retry while {}",
                    other.name()
                )))
            }
        }

        if !self.machine.begin_matching() {
            return Err(Error::MatchingInFlight(self.session_id().to_string()));
        }
        Ok(self.run_matching_cycle().await)
    }

    /// Drop the result and start over with a fresh session.
    pub fn reset(&mut self) {
        self.result = None;
        self.matched = None;
        self.retryable = false;
        self.rotate_session();
        self.machine.reset();
    }

    /// Caller must have moved the machine into `matching`.
    async fn run_matching_cycle(&mut self) -> TurnOutcome {
        let session_id = self.session_id().clone();
        let transcript = self.transcript.render();

        match self.matcher.run(&session_id, &transcript).await {
            Ok(result) => {
                tracing::info!(
                    session_id = %session_id,
                    matches = result.matches.len(),
                    "matching cycle completed"
                );
                self.result = Some(result);
                self.retryable = false;
                self.machine.finish_matching(Ok(()));
                self.matched = Some(self.rotate_session());
                TurnOutcome::Matched
            }
            Err(e) => {
                self.retryable = true;
                self.machine.finish_matching(Err(match_failure(&e)));
                TurnOutcome::MatchFailed
            }
        }
    }

    /// Swap in a fresh, greeted session and return the retired transcript.
    fn rotate_session(&mut self) -> TranscriptLog {
        let next = start_transcript(self.session_id().rotate(), &self.settings.greeting);
        std::mem::replace(&mut self.transcript, next)
    }
}

fn start_transcript(session_id: SessionId, greeting: &str) -> TranscriptLog {
    let mut transcript = TranscriptLog::new(session_id);
    if !greeting.trim().is_empty() {
        transcript.append(Turn::assistant(greeting));
    }
    transcript
}

fn relay_apology(e: &Error) -> String {
    if e.is_network() {
        RELAY_CONNECT_APOLOGY.to_owned()
    } else {
        e.user_message(RELAY_GENERIC_APOLOGY)
    }
}

fn match_failure(e: &Error) -> String {
    if e.is_network() {
        MATCH_CONNECT_FAILURE.to_owned()
    } else {
        e.user_message(MATCH_GENERIC_FAILURE)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Shared handle
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A [`Conversation`] shared between the submit path and the presentation
/// layer. Submissions never queue: one arriving while another is being
/// handled gets [`TurnOutcome::Busy`].
#[derive(Clone)]
pub struct SharedConversation {
    inner: Arc<Mutex<Conversation>>,
}

impl SharedConversation {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(conversation)),
        }
    }

    /// Lock the conversation, waiting for an in-flight submission.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Conversation> {
        self.inner.lock().await
    }

    pub async fn retry_matching(&self) -> Result<TurnOutcome> {
        let mut conversation = self
            .inner
            .try_lock()
            .map_err(|_| Error::MatchingInFlight("conversation is busy".into()))?;
        conversation.retry_matching().await
    }
}

#[async_trait]
impl MessageHandler for SharedConversation {
    async fn on_user_message(&self, text: &str, options: DeliveryOptions) -> TurnOutcome {
        match self.inner.try_lock() {
            Ok(mut conversation) => conversation.handle_user_message(text, options).await,
            Err(_) => {
                tracing::debug!("conversation busy, submission dropped");
                TurnOutcome::Busy
            }
        }
    }
}
