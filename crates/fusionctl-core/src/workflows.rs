//! Submit-and-await workflows.
//!
//! Every mutating endpoint answers with an operation handle; these helpers
//! compose the submission with the poll so callers get a resolved outcome
//! in one call. Resource payloads stay untyped - the backend owns their
//! schema.

use std::time::Duration;

use serde_json::Value;

use crate::client::FusionClient;
use crate::error::{CoreError, Result};
use crate::operation::Operation;
use crate::progress::{ProgressCallback, await_operation};

/// Extract the operation handle from a mutating call's response body.
#[must_use]
pub fn operation_handle(response: &Value) -> Option<String> {
    response
        .get("id")
        .or_else(|| response.get("operation").and_then(|o| o.get("id")))
        .and_then(Value::as_str)
        .map(String::from)
}

/// Create a resource and wait for the operation to resolve.
///
/// This workflow:
/// 1. POSTs the request (returns an operation handle)
/// 2. Polls the operation until a terminal state
///
/// # Example
///
/// ```rust,ignore
/// use fusionctl_core::create_and_await;
/// use serde_json::json;
/// use std::time::Duration;
///
/// let operation = create_and_await(
///     &client,
///     "/tenants/default/tenant-spaces",
///     &json!({"name": "staging"}),
///     Some(Duration::from_secs(600)),
///     Duration::from_secs(2),
///     None,
/// )
/// .await?;
/// ```
pub async fn create_and_await(
    client: &FusionClient,
    path: &str,
    body: &Value,
    timeout: Option<Duration>,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Operation> {
    let submitted = client.post(path, body).await?;
    let operation_id = require_handle(&submitted)?;
    await_operation(client, &operation_id, timeout, interval, on_progress).await
}

/// Update a resource and wait for the operation to resolve.
pub async fn update_and_await(
    client: &FusionClient,
    path: &str,
    body: &Value,
    timeout: Option<Duration>,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Operation> {
    let submitted = client.patch(path, body).await?;
    let operation_id = require_handle(&submitted)?;
    await_operation(client, &operation_id, timeout, interval, on_progress).await
}

/// Delete a resource and wait for the operation to resolve.
pub async fn delete_and_await(
    client: &FusionClient,
    path: &str,
    timeout: Option<Duration>,
    interval: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Operation> {
    let submitted = client.delete(path).await?;
    let operation_id = require_handle(&submitted)?;
    await_operation(client, &operation_id, timeout, interval, on_progress).await
}

fn require_handle(response: &Value) -> Result<String> {
    operation_handle(response)
        .ok_or_else(|| CoreError::Validation("no operation handle in response".to_string()))
}
