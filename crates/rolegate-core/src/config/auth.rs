//! Token authority configuration.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding `auth.private_key_file`.
pub const PRIVATE_KEY_FILE_ENV: &str = "ROLEGATE_PRIVATE_KEY_FILE";

/// Environment variable overriding `auth.public_key_file`.
pub const PUBLIC_KEY_FILE_ENV: &str = "ROLEGATE_PUBLIC_KEY_FILE";

/// Configuration for the token authority and every verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Value of the `iss` claim minted and expected.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// PEM file holding the private signing key (issuer side only).
    #[serde(default = "default_private_key_file")]
    pub private_key_file: PathBuf,

    /// PEM file holding the public verification key.
    #[serde(default = "default_public_key_file")]
    pub public_key_file: PathBuf,

    /// Lifetime of newly minted tokens (e.g. "1h", "30m"). `None` mints
    /// tokens without an expiry.
    #[serde(default = "default_token_ttl")]
    pub token_ttl: Option<String>,

    /// Clock skew tolerated when checking `iat`/`exp`, in seconds.
    #[serde(default)]
    pub leeway_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            private_key_file: default_private_key_file(),
            public_key_file: default_public_key_file(),
            token_ttl: default_token_ttl(),
            leeway_seconds: 0,
        }
    }
}

impl AuthConfig {
    /// Private key path, honouring the environment override.
    pub fn resolve_private_key_file(&self) -> PathBuf {
        std::env::var_os(PRIVATE_KEY_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.private_key_file.clone())
    }

    /// Public key path, honouring the environment override.
    pub fn resolve_public_key_file(&self) -> PathBuf {
        std::env::var_os(PUBLIC_KEY_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.public_key_file.clone())
    }

    /// Parsed token lifetime.
    pub fn token_ttl(&self) -> Result<Option<Duration>, ConfigError> {
        self.token_ttl
            .as_deref()
            .map(|raw| {
                humantime::parse_duration(raw.trim()).map_err(|e| {
                    ConfigError::Config(format!("invalid auth.token_ttl '{}': {}", raw, e))
                })
            })
            .transpose()
    }
}

fn default_issuer() -> String {
    "https://dev-issuer.com".to_string()
}

fn default_private_key_file() -> PathBuf {
    PathBuf::from("mcp_auth/private.pem")
}

fn default_public_key_file() -> PathBuf {
    PathBuf::from("mcp_auth/public.pem")
}

fn default_token_ttl() -> Option<String> {
    Some("1h".to_string())
}
