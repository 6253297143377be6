//! Typed model of the Fusion `Operation` resource.
//!
//! Every mutating call against the control plane (create, update, delete)
//! is accepted asynchronously: the backend answers with an `Operation`
//! record that the client observes via `GET /operations/{id}` until it
//! settles. The record is owned entirely by the backend; clients never
//! modify it.

use serde::{Deserialize, Serialize};

/// Lifecycle states reported by the operations endpoint.
///
/// `Pending` and `Aborting` are in flight; `Succeeded` and `Failed` are
/// terminal and never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    Pending,
    Aborting,
    Succeeded,
    Failed,
}

impl OperationStatus {
    /// Whether the operation has settled and will no longer change.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Succeeded | OperationStatus::Failed)
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Pending => write!(f, "Pending"),
            OperationStatus::Aborting => write!(f, "Aborting"),
            OperationStatus::Succeeded => write!(f, "Succeeded"),
            OperationStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// Diagnostic payload attached to a failed operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pure_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_code: Option<u16>,
}

/// One asynchronous mutation tracked by the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub status: OperationStatus,
    /// What the operation is doing, e.g. `CreateVolume`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    /// Server hint for when to poll again, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_in: Option<u64>,
    /// Present only once the operation has failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Operation {
    /// Stand-in used when a transport failure prevents observing any state.
    #[must_use]
    pub fn placeholder(id: &str) -> Self {
        Operation {
            id: id.to_string(),
            status: OperationStatus::Pending,
            request_type: None,
            retry_in: None,
            error: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Best-effort human-readable failure description.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| format!("operation resolved to {}", self.status))
    }
}
