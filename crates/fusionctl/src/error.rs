//! Error types for fusionctl
//!
//! Defines structured error types using thiserror for better error handling
//! and user experience.

use colored::Colorize;
use thiserror::Error;

use fusionctl_core::{ApiError, ClientError, ConfigError, CoreError};

/// Main error type for the fusionctl application
#[derive(Error, Debug)]
pub enum FusionCtlError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profile configured. Use 'fusionctl profile set' to configure a profile.")]
    NoProfileConfigured,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("File error for '{path}': {message}")]
    FileError { path: String, message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for fusionctl operations
pub type Result<T> = std::result::Result<T, FusionCtlError>;

impl FusionCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            FusionCtlError::ProfileNotFound { name } => vec![
                "List available profiles: fusionctl profile list".to_string(),
                format!("Create profile '{}': fusionctl profile set {} --api-url <url>", name, name),
                "Check profile name spelling".to_string(),
            ],
            FusionCtlError::NoProfileConfigured => vec![
                "Create a profile: fusionctl profile set lab --api-url https://fusion.lab:8443 --api-token <token>".to_string(),
                "Or set FUSION_API_URL and FUSION_API_TOKEN in the environment".to_string(),
                "View profile documentation: fusionctl profile --help".to_string(),
            ],
            FusionCtlError::AuthenticationFailed { .. } => vec![
                "Check your token: fusionctl profile show <profile>".to_string(),
                "Verify the API token has not expired".to_string(),
                "Ensure the API endpoint URL is correct".to_string(),
            ],
            FusionCtlError::ConnectionError { message }
                if message.contains("certificate") || message.contains("SSL") =>
            {
                vec![
                    "Try --insecure in the profile for self-signed certificates".to_string(),
                    "Update the profile: fusionctl profile set <name> --api-url <url> --insecure".to_string(),
                    "Check that the endpoint URL is correct and reachable".to_string(),
                ]
            }
            FusionCtlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the endpoint URL is correct: fusionctl profile show <profile>".to_string(),
                "Ensure firewall allows connections to the control plane".to_string(),
            ],
            FusionCtlError::ApiError { message } if message.contains("404") => vec![
                "Verify the resource ID is correct".to_string(),
                "List available resources to find the correct ID".to_string(),
                "Check that you're using the correct profile".to_string(),
            ],
            FusionCtlError::OperationFailed { .. } => vec![
                "Inspect the operation: fusionctl operation get <id>".to_string(),
                "The backend rejected the mutation; fix the request and resubmit".to_string(),
            ],
            FusionCtlError::Timeout { .. } => vec![
                "The operation may still complete; check it with 'fusionctl operation get <id>'".to_string(),
                "Raise the bound with --wait-timeout".to_string(),
            ],
            FusionCtlError::InvalidInput { .. } => vec![
                "Check the command syntax: fusionctl <command> --help".to_string(),
                "Verify input file format is correct (JSON)".to_string(),
            ],
            FusionCtlError::FileError { path, .. } => vec![
                format!("Check that file exists: {}", path),
                "Verify file permissions are correct".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Render the error with cargo-style tips for stderr.
    pub fn display_with_suggestions(&self) -> String {
        let mut out = format!("{}{} {}", "error".red().bold(), ":".bold(), self);
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("\n\n{}{}", "tips".yellow().bold(), ":".bold()));
            for suggestion in suggestions {
                out.push_str(&format!("\n  {suggestion}"));
            }
        }
        out
    }
}

impl From<ApiError> for FusionCtlError {
    fn from(err: ApiError) -> Self {
        if err.is_unauthorized() {
            FusionCtlError::AuthenticationFailed {
                message: err.to_string(),
            }
        } else {
            FusionCtlError::ApiError {
                message: err.to_string(),
            }
        }
    }
}

impl From<ClientError> for FusionCtlError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api(api) => FusionCtlError::from(api),
            ClientError::Transport(source) => FusionCtlError::ConnectionError {
                message: source.to_string(),
            },
            ClientError::InvalidConfig(message) => FusionCtlError::Configuration(message),
        }
    }
}

impl From<CoreError> for FusionCtlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => FusionCtlError::from(api),
            CoreError::OperationFailed { operation } => FusionCtlError::OperationFailed {
                message: format!("operation '{}': {}", operation.id, operation.error_message()),
            },
            CoreError::OperationUnconfirmed { operation, source } => {
                FusionCtlError::ConnectionError {
                    message: format!(
                        "operation '{}' could not be confirmed: {}",
                        operation.id, source
                    ),
                }
            }
            CoreError::OperationTimeout { id, timeout } => FusionCtlError::Timeout {
                message: format!(
                    "operation '{}' did not settle within {} seconds",
                    id,
                    timeout.as_secs()
                ),
            },
            CoreError::Transport(source) => FusionCtlError::ConnectionError {
                message: source.to_string(),
            },
            CoreError::Validation(message) => FusionCtlError::InvalidInput { message },
            CoreError::Config(message) => FusionCtlError::Configuration(message),
        }
    }
}

impl From<ConfigError> for FusionCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => FusionCtlError::ProfileNotFound { name },
            ConfigError::NoProfiles { .. } => FusionCtlError::NoProfileConfigured,
            other => FusionCtlError::Configuration(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for FusionCtlError {
    fn from(err: serde_json::Error) -> Self {
        FusionCtlError::OutputError {
            message: format!("JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for FusionCtlError {
    fn from(err: std::io::Error) -> Self {
        FusionCtlError::OutputError {
            message: format!("IO error: {err}"),
        }
    }
}

impl From<anyhow::Error> for FusionCtlError {
    fn from(err: anyhow::Error) -> Self {
        FusionCtlError::Configuration(err.to_string())
    }
}
