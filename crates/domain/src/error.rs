/// Shared error type used across all Synergy crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected locally; never reaches the network.
    #[error("validation: {0}")]
    Validation(String),

    /// The transport could not reach the remote service.
    #[error("network: {0}")]
    Network(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// Non-2xx status, or a body that is not the documented shape.
    #[error("protocol: {detail}")]
    Protocol {
        status: Option<u16>,
        /// The `error` field of a JSON error body, verbatim.
        server_error: Option<String>,
        detail: String,
    },

    /// The chat widget never registered a message handler.
    #[error("initialization: {0}")]
    Initialization(String),

    #[error("matching already in flight for session {0}")]
    MatchingInFlight(String),

    /// A config file that exists but does not parse.
    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a protocol error raised while decoding a 2xx body.
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::Protocol {
            status: None,
            server_error: None,
            detail: detail.into(),
        }
    }

    /// True for failures where the remote service was never reached
    /// (including timeouts).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }

    /// The server-supplied `error` string, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Protocol {
                server_error: Some(msg),
                ..
            } if !msg.trim().is_empty() => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Message suitable for showing to the user: the server's own error
    /// text when present, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_owned()
    }
}
