//! REST implementation of [`SynergyBackend`].
//!
//! `RestSynergyClient` wraps a `reqwest::Client` and translates every trait
//! method into the corresponding HTTP call. Every request carries its own
//! timeout. Idempotent GETs are retried with exponential back-off on
//! transient (5xx / transport) failures; POSTs are sent exactly once.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use sy_domain::config::BackendConfig;
use sy_domain::error::{Error, Result};
use sy_domain::trace::TraceEvent;
use sy_domain::{MatchCandidate, MatchResult, RelayResult};
use uuid::Uuid;

use crate::provider::SynergyBackend;
use crate::types::{
    ChatRequest, ChatResponse, CollaboratorsResponse, ErrorBody, FindCollaboratorsRequest,
    FindCollaboratorsResponse, HealthResponse,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST-based client for the Synergy backend.
///
/// Created once and reused for the lifetime of the process.
/// The underlying `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestSynergyClient {
    http: Client,
    base_url: String,
    client_type: String,
    chat_timeout: Duration,
    match_timeout: Duration,
    max_retries: u32,
}

impl RestSynergyClient {
    /// Build a new client from the shared `BackendConfig`.
    pub fn new(cfg: &BackendConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            client_type: cfg.client_type.clone(),
            chat_timeout: Duration::from_millis(cfg.chat_timeout_ms),
            match_timeout: Duration::from_millis(cfg.match_timeout_ms),
            max_retries: cfg.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Decorate a `RequestBuilder` with the standard Synergy headers.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        let trace_id = Uuid::new_v4().to_string();
        rb.header("X-Client-Type", &self.client_type)
            .header("X-Trace-Id", trace_id)
    }

    /// Build the full URL for a path like `/chat`.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ── execution ────────────────────────────────────────────────────

    /// Send a request once. Non-2xx statuses become `Error::Protocol`
    /// carrying the server's `error` string when the body has one.
    async fn execute_once(&self, endpoint: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                TraceEvent::BackendCall {
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();
                return Err(from_reqwest(e));
            }
        };

        let status = resp.status().as_u16();
        TraceEvent::BackendCall {
            endpoint: endpoint.to_owned(),
            status,
            duration_ms,
        }
        .emit();

        if resp.status().is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::Protocol {
            status: Some(status),
            server_error: ErrorBody::parse(&body),
            detail: format!("{endpoint} returned {status}: {body}"),
        })
    }

    /// Execute an idempotent request with retry + exponential back-off.
    ///
    /// * Retries on 5xx status codes, timeouts and connection errors.
    /// * Does **not** retry on 4xx (client errors are permanent).
    async fn execute_with_retry(
        &self,
        endpoint: &str,
        build_request: impl Fn() -> RequestBuilder,
    ) -> Result<Response> {
        let mut last_err: Option<Error> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(backoff).await;
            }

            match self.execute_once(endpoint, build_request()).await {
                Ok(resp) => return Ok(resp),
                Err(e) if is_transient(&e) => {
                    tracing::debug!(endpoint, attempt, error = %e, "transient failure, retrying");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Network(format!("{endpoint}: all retries exhausted"))))
    }

    /// Read and decode a 2xx body. Unparseable bodies are protocol errors.
    async fn decode<T: DeserializeOwned>(&self, endpoint: &str, resp: Response) -> Result<T> {
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| Error::Protocol {
            status: Some(status),
            server_error: None,
            detail: format!("failed to parse {endpoint} response: {e}: {body}"),
        })
    }
}

fn is_transient(e: &Error) -> bool {
    match e {
        Error::Protocol {
            status: Some(status),
            ..
        } => *status >= 500,
        other => other.is_network(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl SynergyBackend for RestSynergyClient {
    async fn chat(&self, req: ChatRequest) -> Result<RelayResult> {
        const ENDPOINT: &str = "POST /chat";
        let rb = self
            .http
            .post(self.url("/chat"))
            .timeout(self.chat_timeout)
            .json(&req);
        let resp = self.execute_once(ENDPOINT, rb).await?;
        let body: ChatResponse = self.decode(ENDPOINT, resp).await?;
        body.into_relay_result()
    }

    async fn find_collaborators(&self, req: FindCollaboratorsRequest) -> Result<MatchResult> {
        const ENDPOINT: &str = "POST /find-collaborators";
        let rb = self
            .http
            .post(self.url("/find-collaborators"))
            .timeout(self.match_timeout)
            .json(&req);
        let resp = self.execute_once(ENDPOINT, rb).await?;
        let body: FindCollaboratorsResponse = self.decode(ENDPOINT, resp).await?;
        Ok(body.into())
    }

    async fn health(&self) -> Result<bool> {
        const ENDPOINT: &str = "GET /health";
        let url = self.url("/health");
        let resp = self
            .execute_with_retry(ENDPOINT, || self.http.get(&url).timeout(self.chat_timeout))
            .await?;
        let body: HealthResponse = self.decode(ENDPOINT, resp).await?;
        Ok(body.is_ok())
    }

    async fn collaborators(&self, role: Option<&str>) -> Result<Vec<MatchCandidate>> {
        const ENDPOINT: &str = "GET /collaborators";
        let url = self.url("/collaborators");
        let resp = self
            .execute_with_retry(ENDPOINT, || {
                let rb = self.http.get(&url).timeout(self.chat_timeout);
                match role {
                    Some(role) => rb.query(&[("role", role)]),
                    None => rb,
                }
            })
            .await?;
        let body: CollaboratorsResponse = self.decode(ENDPOINT, resp).await?;
        Ok(body.into())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Network`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Network(e.to_string())
    }
}
