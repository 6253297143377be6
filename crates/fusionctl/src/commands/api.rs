//! Raw REST access to the Fusion API.
//!
//! Mutating verbs answer with an operation handle; `--wait` turns the
//! fire-and-forget response into a resolved outcome.

use serde_json::Value;
use tracing::debug;

use fusionctl_core::operation_handle;

use crate::cli::{AsyncOperationArgs, HttpMethod, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::{FusionCtlError, Result as CliResult};
use crate::output::print_output;

#[allow(clippy::too_many_arguments)]
pub async fn handle_api_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    method: &HttpMethod,
    path: &str,
    data: Option<&str>,
    async_ops: &AsyncOperationArgs,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    let body = data.map(read_json_data).transpose()?;
    let path = normalize_path(path);
    debug!(?method, %path, "issuing raw API request");

    let response = client
        .request(http_method(method), &path, body.as_ref())
        .await
        .map_err(FusionCtlError::from)?;

    // Mutating calls answer with an operation handle; honor --wait.
    if async_ops.wait && *method != HttpMethod::Get {
        if let Some(operation_id) = operation_handle(&response) {
            return crate::commands::operation::wait_for_operation(
                conn_mgr,
                profile_name,
                &operation_id,
                async_ops.wait_timeout,
                async_ops.wait_interval,
                output_format,
            )
            .await;
        }
        debug!("--wait requested but response carried no operation handle");
    }

    let format = match output_format {
        OutputFormat::Yaml => crate::output::OutputFormat::Yaml,
        OutputFormat::Table => crate::output::OutputFormat::Table,
        OutputFormat::Auto | OutputFormat::Json => crate::output::OutputFormat::Json,
    };
    print_output(&response, format, query)?;

    if let Some(operation_id) = operation_handle(&response)
        && *method != HttpMethod::Get
        && !async_ops.wait
        && matches!(output_format, OutputFormat::Auto)
    {
        eprintln!("To wait for completion, run: fusionctl operation wait {operation_id}");
    }

    Ok(())
}

fn http_method(method: &HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Parse a request body given inline (`{...}`) or as a file (`@body.json`).
fn read_json_data(raw: &str) -> CliResult<Value> {
    let content = if let Some(file) = raw.strip_prefix('@') {
        std::fs::read_to_string(file).map_err(|e| FusionCtlError::FileError {
            path: file.to_string(),
            message: e.to_string(),
        })?
    } else {
        raw.to_string()
    };
    serde_json::from_str(&content).map_err(|e| FusionCtlError::InvalidInput {
        message: format!("invalid JSON body: {e}"),
    })
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
