//! `sy-client`: Synergy backend client.
//!
//! Provides the [`SynergyBackend`] trait that abstracts over the backend's
//! HTTP contract, a production REST implementation
//! ([`RestSynergyClient`]), and typed DTOs matching the wire format.
//!
//! | Call                        | Method                              |
//! |-----------------------------|-------------------------------------|
//! | `POST /chat`                | [`SynergyBackend::chat`]            |
//! | `POST /find-collaborators`  | [`SynergyBackend::find_collaborators`] |
//! | `GET /health`               | [`SynergyBackend::health`]          |
//! | `GET /collaborators?role=`  | [`SynergyBackend::collaborators`]   |
//!
//! # Quick start
//!
//! ```rust,no_run
//! use sy_client::{ChatRequest, RestSynergyClient, SynergyBackend};
//! use sy_domain::config::BackendConfig;
//!
//! # async fn example() -> sy_domain::Result<()> {
//! let client = RestSynergyClient::new(&BackendConfig::default())?;
//!
//! let reply = client
//!     .chat(ChatRequest {
//!         session_id: "session_demo".into(),
//!         message: "Hi, I'm Ada and I write Rust".into(),
//!     })
//!     .await?;
//!
//! println!("{} (trigger: {})", reply.reply_text, reply.triggered);
//! # Ok(())
//! # }
//! ```

pub mod provider;
pub mod rest;
pub mod types;

pub use provider::SynergyBackend;
pub use rest::{from_reqwest, RestSynergyClient};
pub use types::{
    ChatRequest, ChatResponse, CollaboratorsResponse, ErrorBody, FindCollaboratorsRequest,
    FindCollaboratorsResponse, HealthResponse,
};

use std::sync::Arc;

use sy_domain::config::BackendConfig;
use sy_domain::error::Result;

/// Build the production backend as a shared trait object.
pub fn create_backend(cfg: &BackendConfig) -> Result<Arc<dyn SynergyBackend>> {
    let client = RestSynergyClient::new(cfg)?;
    tracing::info!(base_url = %client.base_url(), "using REST transport for Synergy backend");
    Ok(Arc::new(client))
}
