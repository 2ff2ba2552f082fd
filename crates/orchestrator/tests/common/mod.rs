//! Scripted in-memory backend shared by the orchestration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sy_client::{ChatRequest, FindCollaboratorsRequest, SynergyBackend};
use sy_domain::error::{Error, Result};
use sy_domain::{MatchCandidate, MatchResult, RelayResult};

/// Replies are consumed in order; an empty queue answers chat with a plain
/// untriggered reply and matching with an empty result.
#[derive(Default)]
pub struct ScriptedBackend {
    chat_replies: Mutex<VecDeque<Result<RelayResult>>>,
    match_replies: Mutex<VecDeque<Result<MatchResult>>>,
    pub chat_latency: Mutex<Duration>,
    pub match_latency: Mutex<Duration>,
    pub chats: Mutex<Vec<ChatRequest>>,
    pub finds: Mutex<Vec<FindCollaboratorsRequest>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl ScriptedBackend {
    pub fn reply(&self, text: &str, triggered: bool) -> &Self {
        self.chat_replies.lock().push_back(Ok(RelayResult {
            reply_text: text.to_owned(),
            triggered,
        }));
        self
    }

    pub fn chat_error(&self, err: Error) -> &Self {
        self.chat_replies.lock().push_back(Err(err));
        self
    }

    pub fn matches(&self, names: &[&str]) -> &Self {
        let matches = names
            .iter()
            .map(|name| MatchCandidate {
                name: (*name).to_owned(),
                ..Default::default()
            })
            .collect();
        self.match_replies.lock().push_back(Ok(MatchResult {
            matches,
            ..Default::default()
        }));
        self
    }

    pub fn match_error(&self, err: Error) -> &Self {
        self.match_replies.lock().push_back(Err(err));
        self
    }

    pub fn chat_count(&self) -> usize {
        self.chats.lock().len()
    }

    pub fn find_count(&self) -> usize {
        self.finds.lock().len()
    }
}

#[async_trait]
impl SynergyBackend for ScriptedBackend {
    async fn chat(&self, req: ChatRequest) -> Result<RelayResult> {
        self.chats.lock().push(req);
        let latency = *self.chat_latency.lock();
        tokio::time::sleep(latency).await;
        self.chat_replies.lock().pop_front().unwrap_or_else(|| {
            Ok(RelayResult {
                reply_text: "Tell me more.".into(),
                triggered: false,
            })
        })
    }

    async fn find_collaborators(&self, req: FindCollaboratorsRequest) -> Result<MatchResult> {
        self.finds.lock().push(req);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = *self.match_latency.lock();
        tokio::time::sleep(latency).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.match_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(MatchResult::default()))
    }

    async fn health(&self) -> Result<bool> {
        Ok(true)
    }

    async fn collaborators(&self, _role: Option<&str>) -> Result<Vec<MatchCandidate>> {
        Ok(Vec::new())
    }
}

pub fn server_error(status: u16, error: Option<&str>) -> Error {
    Error::Protocol {
        status: Some(status),
        server_error: error.map(str::to_owned),
        detail: format!("POST /find-collaborators returned {status}"),
    }
}
