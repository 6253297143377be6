//! Operation tracking commands, including `wait` with a progress spinner.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use fusionctl_core::{
    Operation, OperationsClient, ProgressEvent, await_operation,
};

use crate::cli::{OperationCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::{FusionCtlError, Result as CliResult};
use crate::output::print_output;

pub async fn handle_operation_command(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    cmd: &OperationCommands,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    match cmd {
        OperationCommands::Get { id } => {
            handle_get(conn_mgr, profile_name, id, output_format, query).await
        }
        OperationCommands::List { limit } => {
            handle_list(conn_mgr, profile_name, *limit, output_format, query).await
        }
        OperationCommands::Wait {
            id,
            wait_timeout,
            wait_interval,
        } => {
            wait_for_operation(
                conn_mgr,
                profile_name,
                id,
                *wait_timeout,
                *wait_interval,
                output_format,
            )
            .await
        }
    }
}

async fn handle_get(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    id: &str,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;
    let operation = client.get_operation(id).await.map_err(FusionCtlError::from)?;

    match output_format {
        OutputFormat::Auto | OutputFormat::Table => print_operation_details(&operation),
        OutputFormat::Json => {
            print_output(&operation, crate::output::OutputFormat::Json, query)?;
        }
        OutputFormat::Yaml => {
            print_output(&operation, crate::output::OutputFormat::Yaml, query)?;
        }
    }
    Ok(())
}

async fn handle_list(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    limit: u32,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;
    let operations = client
        .list_operations(Some(limit))
        .await
        .map_err(FusionCtlError::from)?;

    let format = match output_format {
        OutputFormat::Json => crate::output::OutputFormat::Json,
        OutputFormat::Yaml => crate::output::OutputFormat::Yaml,
        OutputFormat::Auto | OutputFormat::Table => crate::output::OutputFormat::Table,
    };
    print_output(&operations, format, query)?;
    Ok(())
}

/// Wait for an operation to settle, rendering progress as a spinner.
pub async fn wait_for_operation(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    operation_id: &str,
    timeout_secs: u64,
    interval_secs: u64,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;
    let timeout = Duration::from_secs(timeout_secs);
    let interval = Duration::from_secs(interval_secs);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap(),
    );
    pb.set_message(format!("Waiting for operation {}", operation_id));

    let pb_clone = pb.clone();
    let progress_callback = Some(Box::new(move |event: ProgressEvent| match &event {
        ProgressEvent::Started { operation_id } => {
            pb_clone.set_message(format!("Operation {} submitted", operation_id));
        }
        ProgressEvent::Polling {
            operation_id,
            status,
            ..
        } => {
            pb_clone.set_message(format!(
                "Operation {}: {}",
                operation_id,
                format_operation_status(&status.to_string())
            ));
        }
        ProgressEvent::Completed { operation_id } => {
            pb_clone.finish_with_message(format!(
                "Operation {}: {}",
                operation_id,
                format_operation_status("Succeeded")
            ));
        }
        ProgressEvent::Failed {
            operation_id,
            error,
        } => {
            pb_clone.finish_with_message(format!("Operation {} failed: {}", operation_id, error));
        }
    }) as fusionctl_core::ProgressCallback);

    let result =
        await_operation(&client, operation_id, Some(timeout), interval, progress_callback).await;

    match result {
        Ok(operation) => {
            match output_format {
                OutputFormat::Auto | OutputFormat::Table => print_operation_details(&operation),
                OutputFormat::Json => {
                    print_output(&operation, crate::output::OutputFormat::Json, None)?;
                }
                OutputFormat::Yaml => {
                    print_output(&operation, crate::output::OutputFormat::Yaml, None)?;
                }
            }
            Ok(())
        }
        Err(e) => {
            pb.finish_with_message(format!("Operation {} did not complete", operation_id));
            Err(FusionCtlError::from(e))
        }
    }
}

/// Format operation status for display with status icons
fn format_operation_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "succeeded" => format!("\u{2713} {}", status), // checkmark
        "failed" => format!("\u{2717} {}", status),    // x mark
        "aborting" => format!("\u{2298} {}", status),  // circle slash
        "pending" => format!("\u{21bb} {}", status),   // arrow circle
        _ => status.to_string(),
    }
}

/// Print detailed operation information
fn print_operation_details(operation: &Operation) {
    println!("\nOperation Details:");
    println!("------------------");
    println!("ID: {}", operation.id);
    println!("Status: {}", operation.status);

    if let Some(request_type) = &operation.request_type {
        println!("Request: {}", request_type);
    }
    if let Some(retry_in) = operation.retry_in {
        println!("Retry in: {}ms", retry_in);
    }
    if let Some(created) = operation.created_at {
        println!("Created: {}", created);
    }
    if let Some(updated) = operation.updated_at {
        println!("Updated: {}", updated);
    }

    if let Some(error) = &operation.error {
        if let Some(message) = &error.message {
            println!("Error: {}", message);
        }
        if let Some(code) = &error.pure_code {
            println!("Error Code: {}", code);
        }
        if let Some(http_code) = error.http_code {
            println!("Error HTTP Status: {}", http_code);
        }
    }
}
