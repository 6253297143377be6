//! Unified error handling for fusionctl-core.
//!
//! API-semantic backend errors keep their own type ([`ApiError`]) so callers
//! can still match on them; transport-level failures and operation outcomes
//! get their own variants. Nothing is ever downgraded to a silent no-op.

use std::time::Duration;

use thiserror::Error;

use crate::client::{ApiError, ClientError};
use crate::operation::Operation;

/// Core error type for client calls and operation awaiting.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Structured error from the Fusion API, passed through untouched.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The awaited operation resolved to `Failed`.
    #[error("operation '{}' failed: {}", .operation.id, .operation.error_message())]
    OperationFailed { operation: Operation },

    /// Polling was interrupted by a transport failure; the operation's real
    /// outcome is unknown. Carries the last state observed before the
    /// failure, or a pending placeholder when nothing was observed.
    #[error("operation '{}' could not be confirmed: {source}", .operation.id)]
    OperationUnconfirmed {
        operation: Operation,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// The operation did not reach a terminal state within the allowed time.
    #[error("operation '{id}' timed out after {timeout:?}")]
    OperationTimeout { id: String, timeout: Duration },

    /// A request failed before any operation handle was obtained.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Invalid input or an unusable response payload.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl From<ClientError> for CoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api(e) => CoreError::Api(e),
            ClientError::Transport(source) => CoreError::Transport(source),
            ClientError::InvalidConfig(msg) => CoreError::Config(msg),
        }
    }
}

impl CoreError {
    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::Api(e) if e.is_not_found())
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoreError::Api(e) if e.is_unauthorized())
    }

    /// Returns true if the await gave up on time rather than on outcome
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoreError::OperationTimeout { .. })
    }

    /// Returns true if this error is potentially retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_server_error(),
            // The operation may well still resolve; only the observation failed.
            CoreError::OperationTimeout { .. } | CoreError::OperationUnconfirmed { .. } => true,
            CoreError::Transport(_) => true,
            _ => false,
        }
    }
}
