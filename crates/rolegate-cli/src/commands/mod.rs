//! CLI command implementations for rolegate.

pub mod keys;
pub mod policy;
pub mod serve;
pub mod session;
pub mod token;

use crate::IdentityArgs;
use anyhow::Context;
use rolegate_core::RolegateConfig;
use rolegate_runtime::Identity;
use rolegate_token::{ClaimMap, KeyPair, PublicKey};
use serde_json::Value;

/// Load the signing keypair named by the configuration.
pub fn load_keypair(config: &RolegateConfig) -> anyhow::Result<KeyPair> {
    let private = config.auth.resolve_private_key_file();
    let public = config.auth.resolve_public_key_file();
    KeyPair::load(&private, &public).with_context(|| {
        format!(
            "Failed to load signing keys ({}, {}). Run `rolegate keys generate` first",
            private.display(),
            public.display()
        )
    })
}

/// Load the verification key named by the configuration.
pub fn load_public_key(config: &RolegateConfig) -> anyhow::Result<PublicKey> {
    let path = config.auth.resolve_public_key_file();
    PublicKey::load(&path)
        .with_context(|| format!("Failed to load public key from {}", path.display()))
}

/// Parse `key=value`. The value is taken as JSON when it parses, otherwise
/// as a plain string.
pub fn parse_claim(raw: &str) -> anyhow::Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid claim '{}': expected KEY=VALUE", raw))?;
    let key = key.trim();
    anyhow::ensure!(!key.is_empty(), "Invalid claim '{}': empty key", raw);

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

impl IdentityArgs {
    pub fn to_identity(&self) -> anyhow::Result<Identity> {
        let mut extra = ClaimMap::new();
        for raw in &self.claims {
            let (key, value) = parse_claim(raw)?;
            extra.insert(key, value);
        }

        let mut identity = Identity::new(&self.subject, &self.role);
        identity.id = self.id.clone();
        identity.name = self.name.clone();
        identity.extra = extra;
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_claim_values() {
        assert_eq!(parse_claim("dept=sales").unwrap(), ("dept".into(), json!("sales")));
        assert_eq!(parse_claim("level=3").unwrap(), ("level".into(), json!(3)));
        assert_eq!(parse_claim("tags=[\"a\",\"b\"]").unwrap().1, json!(["a", "b"]));
        assert_eq!(parse_claim("note=a=b").unwrap(), ("note".into(), json!("a=b")));
        assert_eq!(parse_claim("empty=").unwrap().1, json!(""));
    }

    #[test]
    fn test_parse_claim_rejects_malformed() {
        assert!(parse_claim("no-separator").is_err());
        assert!(parse_claim("=value").is_err());
    }

    #[test]
    fn test_identity_from_args() {
        let args = IdentityArgs {
            subject: "alice".into(),
            role: "Manager".into(),
            id: Some("123".into()),
            name: None,
            claims: vec!["dept=sales".into()],
        };
        let identity = args.to_identity().unwrap();
        assert_eq!(identity.subject, "alice");
        assert_eq!(identity.role, "Manager");
        assert_eq!(identity.id.as_deref(), Some("123"));
        assert_eq!(identity.extra["dept"], "sales");
    }
}
