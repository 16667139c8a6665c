//! Errors raised while talking to the directory and the ledger.

use rollcall_core::{FailureCode, Outcome};
use thiserror::Error;

/// Errors that can occur during a directory lookup or ledger submission.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The directory has no holder for the credential.
    #[error("No holder found for credential {credential}")]
    NotFound { credential: String },

    /// The service answered with an unexpected status.
    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    /// The request could not be sent or the response not received.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The HTTP client could not be built.
    #[error("Client setup failed: {0}")]
    Setup(String),
}

impl NetworkError {
    /// Code reported for a failed request, `None` for a clean "not found".
    pub fn failure_code(&self) -> Option<FailureCode> {
        match self {
            Self::NotFound { .. } => None,
            Self::Status { status } => Some(FailureCode::Status(*status)),
            Self::Transport(_) | Self::Setup(_) => Some(FailureCode::Transport),
            Self::Malformed(_) => Some(FailureCode::MalformedResponse),
        }
    }

    /// Cycle outcome this error maps to.
    pub fn outcome(&self) -> Outcome {
        match self.failure_code() {
            None => Outcome::NotFound,
            Some(code) => Outcome::RequestFailed(code),
        }
    }
}

/// Result type alias for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
