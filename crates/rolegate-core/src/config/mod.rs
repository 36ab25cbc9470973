//! Configuration types for rolegate.
//!
//! A single `rolegate.yaml` holds the token authority settings and the
//! resource server table. Every field has a default, so an empty file (or no
//! file at all) reproduces the stock localhost deployment.
//!
//! ```yaml
//! auth:
//!   issuer: https://dev-issuer.com
//!   private_key_file: mcp_auth/private.pem
//!   public_key_file: mcp_auth/public.pem
//!   token_ttl: 1h
//! servers:
//!   crm:
//!     address: http://localhost:8003/mcp
//!     audience: rolegate:crm
//!     listen: 127.0.0.1:8003
//! ```

pub mod auth;
pub mod servers;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use auth::AuthConfig;
pub use servers::{ServerConfig, ServersConfig};

/// Complete rolegate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolegateConfig {
    /// Token authority settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Resource server table.
    #[serde(default)]
    pub servers: ServersConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RolegateConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given and present, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) if p.exists() => Self::from_file(p),
            Some(p) => Err(ConfigError::Config(format!(
                "configuration file not found: {}",
                p.display()
            ))),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.issuer.trim().is_empty() {
            return Err(ConfigError::Config("auth.issuer must not be empty".into()));
        }
        self.auth.token_ttl()?;
        for descriptor in self.servers.descriptors() {
            let server = self.servers.get(descriptor.id);
            if server.audience.trim().is_empty() {
                return Err(ConfigError::Config(format!(
                    "servers.{}.audience must not be empty",
                    descriptor.id
                )));
            }
        }
        Ok(())
    }
}
