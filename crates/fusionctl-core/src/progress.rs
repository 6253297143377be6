//! Progress tracking and operation polling.
//!
//! Mutating Fusion calls return an [`Operation`] which must be polled until
//! it reaches a terminal state. This module provides that polling with
//! optional progress callbacks for UI updates.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::client::{ClientError, OperationsClient};
use crate::error::{CoreError, Result};
use crate::operation::{Operation, OperationStatus};

/// Progress events emitted while awaiting an operation
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The await has started
    Started { operation_id: String },
    /// Polling iteration with current status
    Polling {
        operation_id: String,
        status: OperationStatus,
        elapsed: Duration,
    },
    /// Operation completed successfully
    Completed { operation_id: String },
    /// Operation failed
    Failed { operation_id: String, error: String },
}

/// Callback type for progress updates
///
/// The CLI uses this to update spinners; library callers usually pass `None`.
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Await a Fusion operation until it reaches a terminal state.
///
/// Polls `GET /operations/{id}` through the given client. The delay between
/// polls is the backend's `retry_in` hint when present, otherwise the given
/// `interval`. One poll is issued per non-terminal observation plus one
/// final terminal observation.
///
/// # Arguments
///
/// * `client` - Anything that can fetch operations
/// * `operation_id` - The operation to await
/// * `timeout` - Maximum time to wait; `None` polls until a terminal state
/// * `interval` - Fallback delay between polls when the backend gives no hint
/// * `on_progress` - Optional callback for progress updates
///
/// # Returns
///
/// The resolved operation on success. A `Failed` operation becomes
/// [`CoreError::OperationFailed`]; a structured API error while polling
/// propagates as [`CoreError::Api`] unchanged; a transport failure becomes
/// [`CoreError::OperationUnconfirmed`] wrapping the cause and the last
/// observed state.
///
/// # Example
///
/// ```rust,ignore
/// use fusionctl_core::await_operation;
/// use std::time::Duration;
///
/// // Submit a mutation (returns an Operation handle)
/// let submitted = client.post("/tenants", &body).await?;
///
/// let resolved = await_operation(
///     &client,
///     submitted["id"].as_str().unwrap(),
///     Some(Duration::from_secs(600)),
///     Duration::from_secs(2),
///     Some(Box::new(|event| println!("{event:?}"))),
/// )
/// .await?;
/// ```
pub async fn await_operation<C>(
    client: &C,
    operation_id: &str,
    timeout: Option<Duration>,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Operation>
where
    C: OperationsClient + ?Sized,
{
    let start = Instant::now();
    let mut last_seen: Option<Operation> = None;

    emit(
        &on_progress,
        ProgressEvent::Started {
            operation_id: operation_id.to_string(),
        },
    );

    loop {
        let elapsed = start.elapsed();
        if let Some(timeout) = timeout
            && elapsed > timeout
        {
            return Err(CoreError::OperationTimeout {
                id: operation_id.to_string(),
                timeout,
            });
        }

        let operation = match client.get_operation(operation_id).await {
            Ok(operation) => operation,
            // A structured API error keeps its own type so callers matching
            // on ApiError still can.
            Err(ClientError::Api(err)) => return Err(CoreError::Api(err)),
            Err(ClientError::Transport(source)) => {
                return Err(CoreError::OperationUnconfirmed {
                    operation: last_seen
                        .unwrap_or_else(|| Operation::placeholder(operation_id)),
                    source,
                });
            }
            Err(err) => {
                return Err(CoreError::OperationUnconfirmed {
                    operation: last_seen
                        .unwrap_or_else(|| Operation::placeholder(operation_id)),
                    source: Box::new(err),
                });
            }
        };

        emit(
            &on_progress,
            ProgressEvent::Polling {
                operation_id: operation.id.clone(),
                status: operation.status,
                elapsed,
            },
        );

        match operation.status {
            OperationStatus::Succeeded => {
                emit(
                    &on_progress,
                    ProgressEvent::Completed {
                        operation_id: operation.id.clone(),
                    },
                );
                return Ok(operation);
            }
            OperationStatus::Failed => {
                let error = operation.error_message();
                emit(
                    &on_progress,
                    ProgressEvent::Failed {
                        operation_id: operation.id.clone(),
                        error,
                    },
                );
                return Err(CoreError::OperationFailed { operation });
            }
            // Pending and Aborting both resolve on the backend's schedule.
            OperationStatus::Pending | OperationStatus::Aborting => {
                let delay = operation
                    .retry_in
                    .map(Duration::from_millis)
                    .unwrap_or(interval);
                debug!(
                    operation = %operation.id,
                    status = %operation.status,
                    ?delay,
                    "operation still in flight"
                );
                last_seen = Some(operation);
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Helper to emit progress events
fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
