//! Widget readiness adapter.
//!
//! The chat input ("widget") and the conversation core start up
//! independently and in no particular order. The widget publishes its
//! message handler through [`WidgetReadinessAdapter::register`] once it is
//! ready; the submit path calls [`WidgetReadinessAdapter::deliver`] and does
//! not need to know whether that has happened yet.
//!
//! `deliver` waits for the readiness notification, re-checking at least
//! every `retry_interval`, for at most `max_attempts` waits. If no handler
//! shows up it reports a recoverable `failed` state and gives up.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use sy_domain::config::WidgetConfig;
use sy_domain::error::{Error, Result};
use sy_domain::trace::TraceEvent;
use tokio::sync::Notify;

use crate::conversation::TurnOutcome;
use crate::state::ConversationMachine;

/// Shown while the widget has not registered a handler yet.
pub const INITIALIZING_MESSAGE: &str = "Synergy is still initializing. Try again in a moment.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryOptions {
    /// Echo the user's message into the transcript before the relay
    /// confirms it.
    pub add_client_message: bool,
}

/// Callback contract a chat widget exposes for user submissions.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn on_user_message(&self, text: &str, options: DeliveryOptions) -> TurnOutcome;
}

struct Inner {
    handler: RwLock<Option<Arc<dyn MessageHandler>>>,
    ready: Notify,
}

/// Cheap to clone; clones share the same handler slot.
#[derive(Clone)]
pub struct WidgetReadinessAdapter {
    inner: Arc<Inner>,
    machine: ConversationMachine,
    retry_interval: Duration,
    max_attempts: u32,
}

impl WidgetReadinessAdapter {
    pub fn new(config: &WidgetConfig, machine: ConversationMachine) -> Self {
        Self {
            inner: Arc::new(Inner {
                handler: RwLock::new(None),
                ready: Notify::new(),
            }),
            machine,
            retry_interval: Duration::from_millis(config.retry_interval_ms),
            max_attempts: config.max_attempts,
        }
    }

    /// Publish the widget's handler and wake every pending delivery.
    pub fn register(&self, handler: Arc<dyn MessageHandler>) {
        *self.inner.handler.write() = Some(handler);
        self.inner.ready.notify_waiters();
        tracing::debug!("chat widget handler registered");
    }

    pub fn is_ready(&self) -> bool {
        self.inner.handler.read().is_some()
    }

    /// Hand `message` to the widget's handler, waiting for it to register
    /// if necessary.
    ///
    /// Fails with `Error::Initialization` after `max_attempts` waits; the
    /// conversation state is set to a recoverable `failed` first.
    pub async fn deliver(&self, message: &str, options: DeliveryOptions) -> Result<TurnOutcome> {
        let mut attempt = 0;
        loop {
            // Created before the check so a registration racing with it
            // still wakes us.
            let ready = self.inner.ready.notified();

            let handler = self.inner.handler.read().clone();
            if let Some(handler) = handler {
                return Ok(handler.on_user_message(message, options).await);
            }

            if attempt >= self.max_attempts {
                tracing::warn!(attempts = attempt, "chat widget never became ready");
                TraceEvent::WidgetUnavailable { attempts: attempt }.emit();
                self.machine.fail(INITIALIZING_MESSAGE);
                return Err(Error::Initialization(format!(
                    "no message handler after {attempt} attempts"
                )));
            }

            attempt += 1;
            TraceEvent::WidgetDeliveryRetry {
                attempt,
                max_attempts: self.max_attempts,
            }
            .emit();
            let _ = tokio::time::timeout(self.retry_interval, ready).await;
        }
    }
}
