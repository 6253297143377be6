//! CLI structure and command definitions
//!
//! Defines the command-line interface using clap with two layers:
//! 1. Raw API access (`api` commands)
//! 2. Human-friendly interface (`operation`/`profile` commands)

use clap::{Args, Parser, Subcommand};

/// Fusion management CLI for Pure Storage control planes
#[derive(Parser, Debug)]
#[command(name = "fusionctl")]
#[command(version, about = "Fusion management CLI for Pure Storage control planes")]
#[command(long_about = "
Fusion management CLI for Pure Storage control planes

Every mutation against Fusion is asynchronous: the API answers with an
operation handle that resolves in the background. fusionctl submits
requests, tracks those operations, and can block until they settle.

EXAMPLES:
    # Set up a profile
    fusionctl profile set lab --api-url https://fusion.lab:8443 --api-token TOKEN

    # Direct API access
    fusionctl api get /arrays
    fusionctl api post /volumes --data '{\"name\":\"vol-1\"}' --wait

    # Track an operation
    fusionctl operation get 8d3d0c80
    fusionctl operation wait 8d3d0c80 --wait-timeout 600

    # Get JSON output for scripting
    fusionctl operation list -o json

    # Filter output with JMESPath
    fusionctl operation list -q '[?status==`Failed`].id'

For more help on a specific command, run:
    fusionctl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "FUSIONCTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "FUSIONCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// JMESPath query to filter output
    #[arg(long, short = 'q', global = true)]
    pub query: Option<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Automatically choose format based on command and context
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable table format
    Table,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Raw API access - direct REST endpoint calls
    #[command(name = "api")]
    #[command(after_help = "EXAMPLES:
    # GET request
    fusionctl api get /arrays

    # POST request with JSON data
    fusionctl api post /volumes --data '{\"name\":\"vol-1\"}'

    # POST request from file, waiting for the operation to settle
    fusionctl api post /volumes --data @volume.json --wait

    # Output as JSON for scripting
    fusionctl api get /tenants -o json
")]
    Api {
        /// HTTP method
        #[arg(value_parser = parse_http_method)]
        method: HttpMethod,

        /// API endpoint path (e.g. /operations)
        path: String,

        /// Request body (JSON string or @file)
        #[arg(long)]
        data: Option<String>,

        #[command(flatten)]
        async_ops: AsyncOperationArgs,
    },

    /// Operation tracking and awaiting
    #[command(subcommand, visible_alias = "op")]
    Operation(OperationCommands),

    /// Profile management
    #[command(subcommand, visible_alias = "prof")]
    #[command(after_help = "EXAMPLES:
    # Create a profile
    fusionctl profile set lab --api-url https://fusion.lab:8443 --api-token TOKEN

    # List all profiles
    fusionctl profile list

    # Show profile details
    fusionctl profile show lab

    # Set the default profile
    fusionctl profile default lab
")]
    Profile(ProfileCommands),

    /// Version information
    #[command(visible_alias = "ver")]
    Version,

    /// Generate shell completions
    #[command(visible_alias = "comp")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Operation subcommands
#[derive(Subcommand, Debug)]
pub enum OperationCommands {
    /// Get operation status
    Get {
        /// Operation ID
        id: String,
    },
    /// List recent operations
    List {
        /// Maximum number of operations to return
        #[arg(long, default_value = "25")]
        limit: u32,
    },
    /// Wait for an operation to reach a terminal state
    Wait {
        /// Operation ID
        id: String,

        /// Maximum time to wait in seconds
        #[arg(long, default_value = "300")]
        wait_timeout: u64,

        /// Fallback polling interval in seconds, used when the server
        /// gives no retry hint
        #[arg(long, default_value = "2")]
        wait_interval: u64,
    },
}

/// Common CLI arguments for mutating calls that return an operation
#[derive(Args, Debug, Clone)]
pub struct AsyncOperationArgs {
    /// Wait for the returned operation to complete
    #[arg(long)]
    pub wait: bool,

    /// Maximum time to wait in seconds
    #[arg(long, default_value = "300", requires = "wait")]
    pub wait_timeout: u64,

    /// Fallback polling interval in seconds
    #[arg(long, default_value = "2", requires = "wait")]
    pub wait_interval: u64,
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// List configured profiles
    List,
    /// Show the configuration file path
    Path,
    /// Show profile details
    Show {
        /// Profile name
        name: String,
    },
    /// Create or update a profile
    Set {
        /// Profile name
        name: String,

        /// Fusion API endpoint, e.g. https://fusion.example.com
        #[arg(long)]
        api_url: String,

        /// Bearer token used to authenticate API calls
        #[arg(long)]
        api_token: Option<String>,

        /// Skip TLS certificate verification
        #[arg(long)]
        insecure: bool,

        /// Path to a custom CA certificate
        #[arg(long)]
        ca_cert: Option<String>,
    },
    /// Remove a profile
    Remove {
        /// Profile name
        name: String,
    },
    /// Set the default profile
    Default {
        /// Profile name
        name: String,
    },
}

/// Shells supported for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// HTTP methods accepted by the `api` command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

fn parse_http_method(s: &str) -> Result<HttpMethod, String> {
    match s.to_lowercase().as_str() {
        "get" => Ok(HttpMethod::Get),
        "post" => Ok(HttpMethod::Post),
        "put" => Ok(HttpMethod::Put),
        "patch" => Ok(HttpMethod::Patch),
        "delete" => Ok(HttpMethod::Delete),
        _ => Err(format!(
            "invalid HTTP method '{s}' (expected get, post, put, patch, or delete)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_method_case_insensitive() {
        assert_eq!(parse_http_method("GET").unwrap(), HttpMethod::Get);
        assert_eq!(parse_http_method("Patch").unwrap(), HttpMethod::Patch);
        assert_eq!(parse_http_method("delete").unwrap(), HttpMethod::Delete);
    }

    #[test]
    fn test_parse_http_method_rejects_unknown() {
        let err = parse_http_method("head").unwrap_err();
        assert!(err.contains("invalid HTTP method"));
    }

    #[test]
    fn test_cli_asserts() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
