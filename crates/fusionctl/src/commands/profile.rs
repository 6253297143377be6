//! Profile management command implementations

use colored::Colorize;
use serde_json::json;
use tracing::debug;

use fusionctl_core::{Config, Profile};

use crate::cli::{OutputFormat, ProfileCommands};
use crate::connection::ConnectionManager;
use crate::error::{FusionCtlError, Result as CliResult};
use crate::output::print_output;

/// Handle profile management commands
pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    use ProfileCommands::*;

    match profile_cmd {
        List => handle_list(conn_mgr, output_format),
        Path => handle_path(conn_mgr),
        Show { name } => handle_show(conn_mgr, name, output_format),
        Set {
            name,
            api_url,
            api_token,
            insecure,
            ca_cert,
        } => handle_set(
            conn_mgr,
            name,
            api_url,
            api_token.as_deref(),
            *insecure,
            ca_cert.as_deref(),
        ),
        Remove { name } => handle_remove(conn_mgr, name),
        Default { name } => handle_default(conn_mgr, name),
    }
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    debug!("Listing all configured profiles");
    let profiles = conn_mgr.config.list_profiles();

    match output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let profile_list: Vec<serde_json::Value> = profiles
                .iter()
                .map(|(name, profile)| {
                    json!({
                        "name": name,
                        "api_url": profile.api_url,
                        "insecure": profile.insecure,
                        "has_token": profile.api_token.is_some(),
                        "is_default": conn_mgr.config.default_profile.as_deref()
                            == Some(name.as_str()),
                    })
                })
                .collect();

            let output_data = json!({
                "config_path": config_path_string(conn_mgr),
                "profiles": profile_list,
                "count": profiles.len(),
            });

            let fmt = match output_format {
                OutputFormat::Yaml => crate::output::OutputFormat::Yaml,
                _ => crate::output::OutputFormat::Json,
            };
            print_output(&output_data, fmt, None)?;
        }
        _ => {
            if let Some(path) = config_path_string(conn_mgr) {
                println!("Configuration file: {path}");
                println!();
            }

            if profiles.is_empty() {
                println!("No profiles configured.");
                println!("Use 'fusionctl profile set' to create a profile.");
                return Ok(());
            }

            for (name, profile) in profiles {
                let marker = if conn_mgr.config.default_profile.as_deref() == Some(name.as_str())
                {
                    format!(" {}", "(default)".green())
                } else {
                    String::new()
                };
                println!("  {}{} - {}", name, marker, profile.api_url);
            }
        }
    }
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager) -> CliResult<()> {
    match config_path_string(conn_mgr) {
        Some(path) => println!("{path}"),
        None => println!("No configuration file location available"),
    }
    Ok(())
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    let profile = conn_mgr
        .config
        .profiles
        .get(name)
        .ok_or_else(|| FusionCtlError::ProfileNotFound {
            name: name.to_string(),
        })?;

    match output_format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let output_data = json!({
                "name": name,
                "api_url": profile.api_url,
                "insecure": profile.insecure,
                "ca_cert": profile.ca_cert,
                "has_token": profile.api_token.is_some(),
            });
            let fmt = match output_format {
                OutputFormat::Yaml => crate::output::OutputFormat::Yaml,
                _ => crate::output::OutputFormat::Json,
            };
            print_output(&output_data, fmt, None)?;
        }
        _ => {
            println!("Profile: {name}");
            println!("API URL: {}", profile.api_url);
            println!(
                "API token: {}",
                if profile.api_token.is_some() {
                    "configured"
                } else {
                    "not set"
                }
            );
            println!("Insecure: {}", profile.insecure);
            if let Some(ca_cert) = &profile.ca_cert {
                println!("CA certificate: {ca_cert}");
            }
        }
    }
    Ok(())
}

fn handle_set(
    conn_mgr: &ConnectionManager,
    name: &str,
    api_url: &str,
    api_token: Option<&str>,
    insecure: bool,
    ca_cert: Option<&str>,
) -> CliResult<()> {
    debug!("Setting profile '{}' [credentials redacted]", name);
    let mut config = conn_mgr.config.clone();
    config.set_profile(
        name.to_string(),
        Profile {
            api_url: api_url.to_string(),
            api_token: api_token.map(String::from),
            insecure,
            ca_cert: ca_cert.map(String::from),
        },
    );

    // The first profile becomes the default automatically.
    if config.default_profile.is_none() && config.profiles.len() == 1 {
        config.default_profile = Some(name.to_string());
    }

    conn_mgr.save_config(&config)?;
    println!("Profile '{name}' saved");
    Ok(())
}

fn handle_remove(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    let mut config = conn_mgr.config.clone();
    if config.remove_profile(name).is_none() {
        return Err(FusionCtlError::ProfileNotFound {
            name: name.to_string(),
        });
    }
    conn_mgr.save_config(&config)?;
    println!("Profile '{name}' removed");
    Ok(())
}

fn handle_default(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    let mut config = conn_mgr.config.clone();
    if !config.profiles.contains_key(name) {
        return Err(FusionCtlError::ProfileNotFound {
            name: name.to_string(),
        });
    }
    config.default_profile = Some(name.to_string());
    conn_mgr.save_config(&config)?;
    println!("Default profile set to '{name}'");
    Ok(())
}

fn config_path_string(conn_mgr: &ConnectionManager) -> Option<String> {
    conn_mgr
        .config_path
        .as_ref()
        .map(|p| p.display().to_string())
        .or_else(|| {
            Config::config_path()
                .ok()
                .map(|p| p.display().to_string())
        })
}
