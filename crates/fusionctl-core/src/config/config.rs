//! Configuration management for fusionctl.
//!
//! Handles configuration loading from files and environment variables.
//! Configuration is stored in TOML format with support for multiple named
//! profiles, each pointing at one Fusion control plane.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when none is passed explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    /// Fusion API endpoint, e.g. `https://fusion.example.com`
    pub api_url: String,
    /// Bearer token used to authenticate API calls. Optional so it can come
    /// from `FUSION_API_TOKEN` instead of sitting in the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Skip TLS certificate verification (self-signed lab deployments)
    #[serde(default)]
    pub insecure: bool,
    /// Path to a custom CA certificate for TLS verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<String>,
}

impl Config {
    /// Resolve the profile name to use for a command.
    ///
    /// Resolution order:
    /// 1. Explicitly specified profile (existence checked at lookup time)
    /// 2. `default_profile` from the config file
    /// 3. First configured profile, sorted alphabetically
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(profile_name) = explicit_profile {
            return Ok(profile_name.to_string());
        }

        if let Some(ref default) = self.default_profile {
            return Ok(default.clone());
        }

        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        match names.first() {
            Some(name) => Ok((*name).to_string()),
            None => Err(ConfigError::NoProfiles {
                suggestion: "Use 'fusionctl profile set' to create a profile.".to_string(),
            }),
        }
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        // Expand environment variables in the config content
        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile by name
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, this supports both the standard macOS path and Linux-style
    /// ~/.config path:
    /// 1. Check ~/.config/fusionctl/config.toml (preferred for consistency)
    /// 2. Fall back to ~/Library/Application Support/com.purestorage.fusionctl/config.toml
    ///
    /// On Linux: ~/.config/fusionctl/config.toml
    /// On Windows: %APPDATA%\purestorage\fusionctl\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let home_dir = base_dirs.home_dir();
                let linux_style_path = home_dir
                    .join(".config")
                    .join("fusionctl")
                    .join("config.toml");

                if linux_style_path.exists() {
                    return Ok(linux_style_path);
                }

                if linux_style_path
                    .parent()
                    .map(|p| p.exists())
                    .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs = ProjectDirs::from("com", "purestorage", "fusionctl")
            .ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default} syntax. This allows configs to
    /// reference environment variables while keeping static fallbacks:
    ///
    /// ```toml
    /// api_token = "${FUSION_API_TOKEN}"
    /// api_url = "${FUSION_API_URL:-https://fusion.example.com}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        // Unset variables stay as-is so unused profiles don't break loading
        let expanded =
            shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok());
        expanded.to_string()
    }
}
