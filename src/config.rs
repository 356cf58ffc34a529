//! Configuration Management
//!
//! Provider-level settings: credentials, API domain, scheme and client timeout.
//! Values come from (highest first) explicit settings, a JSON config file, then
//! `ZENLAYERCLOUD_*` environment variables, then defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_DOMAIN: &str = "console.zenlayer.com";
pub const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 600;

pub const ENV_ACCESS_KEY_ID: &str = "ZENLAYERCLOUD_ACCESS_KEY_ID";
pub const ENV_ACCESS_KEY_PASSWORD: &str = "ZENLAYERCLOUD_ACCESS_KEY_PASSWORD";
pub const ENV_DOMAIN: &str = "ZENLAYERCLOUD_DOMAIN";
pub const ENV_SCHEME: &str = "ZENLAYERCLOUD_SCHEME";
pub const ENV_CLIENT_TIMEOUT: &str = "ZENLAYERCLOUD_CLIENT_TIMEOUT";

/// API scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "HTTP" => Some(Self::Http),
            "HTTPS" => Some(Self::Https),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Provider configuration
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub access_key_password: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub scheme: Option<Scheme>,
    /// Client timeout in seconds
    #[serde(default)]
    pub client_timeout: Option<u64>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_password", &self.access_key_password.as_ref().map(|_| "***"))
            .field("domain", &self.domain)
            .field("scheme", &self.scheme)
            .field("client_timeout", &self.client_timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("zenlayercloud").join("config.json"))
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load the default config file if present, otherwise an empty config
    pub fn load_default() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Fill unset values from `ZENLAYERCLOUD_*` environment variables
    pub fn with_env(mut self) -> Result<Self> {
        if self.access_key_id.is_none() {
            self.access_key_id = env_non_empty(ENV_ACCESS_KEY_ID);
        }
        if self.access_key_password.is_none() {
            self.access_key_password = env_non_empty(ENV_ACCESS_KEY_PASSWORD);
        }
        if self.domain.is_none() {
            self.domain = env_non_empty(ENV_DOMAIN);
        }
        if self.scheme.is_none() {
            if let Some(raw) = env_non_empty(ENV_SCHEME) {
                self.scheme = Some(Scheme::from_str(&raw).ok_or_else(|| {
                    Error::validation(format!("{ENV_SCHEME} must be HTTP or HTTPS, got {raw:?}"))
                })?);
            }
        }
        if self.client_timeout.is_none() {
            if let Some(raw) = env_non_empty(ENV_CLIENT_TIMEOUT) {
                self.client_timeout = Some(raw.parse().map_err(|_| {
                    Error::validation(format!(
                        "{ENV_CLIENT_TIMEOUT} must be a number of seconds, got {raw:?}"
                    ))
                })?);
            }
        }
        Ok(self)
    }

    /// Check that credentials are present
    pub fn validate(&self) -> Result<()> {
        if self.access_key_id.as_deref().map_or(true, str::is_empty) {
            return Err(Error::validation(format!(
                "access_key_id is required (or set {ENV_ACCESS_KEY_ID})"
            )));
        }
        if self.access_key_password.as_deref().map_or(true, str::is_empty) {
            return Err(Error::validation(format!(
                "access_key_password is required (or set {ENV_ACCESS_KEY_PASSWORD})"
            )));
        }
        if self.client_timeout == Some(0) {
            return Err(Error::validation("client_timeout must be greater than zero"));
        }
        Ok(())
    }

    pub fn effective_domain(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string())
    }

    pub fn effective_scheme(&self) -> Scheme {
        self.scheme.unwrap_or_default()
    }

    pub fn effective_client_timeout(&self) -> Duration {
        Duration::from_secs(self.client_timeout.unwrap_or(DEFAULT_CLIENT_TIMEOUT_SECS))
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
