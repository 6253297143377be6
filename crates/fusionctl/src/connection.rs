//! Connection management for the Fusion API client

use fusionctl_core::{Config, FusionClient};
use tracing::{debug, info, trace};

use crate::error::{FusionCtlError, Result as CliResult};

/// User agent string for fusionctl HTTP requests
const FUSIONCTL_USER_AGENT: &str = concat!("fusionctl/", env!("CARGO_PKG_VERSION"));

/// Connection manager for creating authenticated clients
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<std::path::PathBuf>,
}

impl ConnectionManager {
    /// Create a new connection manager with the given configuration
    #[allow(dead_code)] // Used by binary target
    pub fn new(config: Config) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    /// Create a new connection manager with a custom config path
    pub fn with_config_path(config: Config, config_path: Option<std::path::PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Save the configuration to the appropriate location
    pub fn save_config(&self, config: &Config) -> CliResult<()> {
        if let Some(ref path) = self.config_path {
            config.save_to_path(path).map_err(FusionCtlError::from)
        } else {
            config.save().map_err(FusionCtlError::from)
        }
    }

    /// Create a Fusion client from profile credentials with environment
    /// variable override support
    ///
    /// When --config-file is explicitly specified, environment variables are
    /// ignored to provide true configuration isolation. This allows testing
    /// with isolated configs and follows the principle of "explicit wins"
    /// (CLI args > env vars > defaults).
    pub fn create_client(&self, profile_name: Option<&str>) -> CliResult<FusionClient> {
        debug!("Creating Fusion client");
        trace!("Profile name: {:?}", profile_name);

        let use_env_vars = self.config_path.is_none();
        debug!(
            "Config path: {:?}, use_env_vars: {}",
            self.config_path, use_env_vars
        );
        if !use_env_vars {
            info!("--config-file specified explicitly, ignoring environment variables");
        }

        let env_url = if use_env_vars {
            std::env::var("FUSION_API_URL").ok()
        } else {
            None
        };
        let env_token = if use_env_vars {
            std::env::var("FUSION_API_TOKEN").ok()
        } else {
            None
        };
        let env_insecure = if use_env_vars {
            std::env::var("FUSION_INSECURE").ok()
        } else {
            None
        };
        let env_ca_cert = if use_env_vars {
            std::env::var("FUSION_CA_CERT").ok()
        } else {
            None
        };

        let (final_url, final_token, final_insecure, final_ca_cert) = if let Some(url) = &env_url {
            // Environment provides the endpoint; take everything from there.
            info!("Using Fusion credentials from environment variables");
            let insecure = parse_bool_flag(env_insecure.as_deref());
            (url.clone(), env_token.clone(), insecure, env_ca_cert.clone())
        } else {
            let resolved_profile_name = self.config.resolve_profile(profile_name)?;
            info!("Using Fusion profile: {}", resolved_profile_name);

            let profile = self
                .config
                .profiles
                .get(&resolved_profile_name)
                .ok_or_else(|| FusionCtlError::ProfileNotFound {
                    name: resolved_profile_name.clone(),
                })?;

            // Allow partial environment variable overrides
            let has_overrides =
                env_token.is_some() || env_insecure.is_some() || env_ca_cert.is_some();

            let url = profile.api_url.clone();
            let token = env_token.or_else(|| profile.api_token.clone());
            let insecure = env_insecure
                .as_deref()
                .map(|v| parse_bool_flag(Some(v)))
                .unwrap_or(profile.insecure);
            let ca_cert = env_ca_cert.or_else(|| profile.ca_cert.clone());

            if has_overrides {
                debug!("Applied partial environment variable overrides");
            }

            (url, token, insecure, ca_cert)
        };

        info!("Connecting to Fusion API: {}", final_url);
        debug!(
            "Token: {}",
            if final_token.is_some() {
                "configured"
            } else {
                "not set"
            }
        );
        debug!("Insecure mode: {}", final_insecure);

        let mut builder = FusionClient::builder()
            .base_url(&final_url)
            .user_agent(FUSIONCTL_USER_AGENT);

        if let Some(ref token) = final_token {
            builder = builder.api_token(token);
            trace!("Token added to client builder");
        }
        if final_insecure {
            builder = builder.insecure(true);
            debug!("TLS certificate verification disabled");
        }
        if let Some(ref ca_cert_path) = final_ca_cert {
            builder = builder.ca_cert(ca_cert_path);
            debug!("Using custom CA certificate: {}", ca_cert_path);
        }

        let client = builder.build().map_err(FusionCtlError::from)?;
        debug!("Fusion client created successfully");
        Ok(client)
    }
}

fn parse_bool_flag(value: Option<&str>) -> bool {
    value
        .map(|s| s.to_lowercase() == "true" || s == "1")
        .unwrap_or(false)
}
