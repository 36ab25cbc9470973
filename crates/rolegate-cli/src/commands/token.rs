//! Token management commands.
//!
//! `rolegate token mint` - Mint a signed token.
//! `rolegate token verify` - Verify a token and print its claims.
//! `rolegate token inspect` - Decode a token without verifying it.

use crate::IdentityArgs;
use anyhow::Context;
use rolegate_core::{RolegateConfig, ServerId};
use rolegate_token::{TokenIssuer, TokenVerifier, inspect_unverified};
use std::time::Duration;

/// Audience used when none is given on the command line.
fn default_audience(config: &RolegateConfig) -> String {
    config.servers.get(ServerId::HrManagement).audience
}

/// Token lifetime from `--expires`, `--no-expiry` or the configured ttl.
fn validity(
    config: &RolegateConfig,
    expires: Option<&str>,
    no_expiry: bool,
) -> anyhow::Result<Option<Duration>> {
    if no_expiry {
        return Ok(None);
    }
    match expires {
        Some(raw) => humantime::parse_duration(raw.trim())
            .map(Some)
            .with_context(|| format!("Invalid --expires '{}'", raw)),
        None => Ok(config.auth.token_ttl()?),
    }
}

/// Mint a token for `identity`.
pub fn mint(
    config: &RolegateConfig,
    identity: &IdentityArgs,
    audience: Option<String>,
    expires: Option<String>,
    no_expiry: bool,
) -> anyhow::Result<()> {
    let issuer = TokenIssuer::new(super::load_keypair(config)?);
    let identity = identity.to_identity()?;
    let audience = audience.unwrap_or_else(|| default_audience(config));
    let validity = validity(config, expires.as_deref(), no_expiry)?;

    let issued = issuer
        .issue(
            &identity.subject,
            &config.auth.issuer,
            &audience,
            identity.additional_claims(),
            validity,
        )
        .context("Failed to mint token")?;

    for key in &issued.overridden_claims {
        eprintln!("⚠️  Ignored --claim {}: reserved claim", key);
    }
    println!("{}", issued.token);
    Ok(())
}

/// Verify a token against the configured public key.
pub fn verify(config: &RolegateConfig, token: &str, audience: Option<String>) -> anyhow::Result<()> {
    let public_key = super::load_public_key(config)?;
    let audience = audience.unwrap_or_else(|| default_audience(config));
    let verifier = TokenVerifier::new(public_key, config.auth.issuer.clone(), audience)
        .with_leeway(config.auth.leeway_seconds);

    match verifier.verify(token.trim()) {
        Ok(claims) => {
            println!("✔ Token is valid");
            println!();
            println!("{}", serde_json::to_string_pretty(&claims)?);
            Ok(())
        }
        Err(e) => {
            println!("✘ Token rejected: {} ({})", e, e.kind());
            anyhow::bail!("verification failed: {}", e.kind())
        }
    }
}

/// Print a token's header and payload without checking anything.
pub fn inspect(token: &str) -> anyhow::Result<()> {
    let info = inspect_unverified(token).context("Failed to decode token")?;

    println!("Header:");
    println!("  alg: {}", info.algorithm);
    if let Some(typ) = &info.token_type {
        println!("  typ: {}", typ);
    }
    println!();
    println!("Claims (UNVERIFIED):");
    println!("{}", serde_json::to_string_pretty(&info.claims)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_token::{ClaimMap, testing};
    use tempfile::TempDir;

    fn config_with_keys(dir: &TempDir) -> RolegateConfig {
        let mut config = RolegateConfig::default();
        config.auth.private_key_file = dir.path().join("private.pem");
        config.auth.public_key_file = dir.path().join("public.pem");
        std::fs::write(&config.auth.private_key_file, testing::PRIVATE_KEY_PEM).unwrap();
        std::fs::write(&config.auth.public_key_file, testing::PUBLIC_KEY_PEM).unwrap();
        config
    }

    fn token_for(audience: &str) -> String {
        let mut claims = ClaimMap::new();
        claims.insert("role".into(), "Manager".into());
        TokenIssuer::new(testing::keypair())
            .issue("alice", "https://dev-issuer.com", audience, claims, None)
            .unwrap()
            .token
    }

    #[test]
    fn test_verify_uses_configured_key_and_audience() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_keys(&dir);

        verify(&config, &token_for("rolegate:hr_management"), None).unwrap();
        verify(&config, &token_for("rolegate:crm"), Some("rolegate:crm".into())).unwrap();
        assert!(verify(&config, &token_for("rolegate:crm"), None).is_err());
    }

    #[test]
    fn test_mint_requires_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RolegateConfig::default();
        config.auth.private_key_file = dir.path().join("missing.pem");
        config.auth.public_key_file = dir.path().join("missing.pub.pem");
        let identity = IdentityArgs {
            subject: "alice".into(),
            role: "Manager".into(),
            id: None,
            name: None,
            claims: vec![],
        };

        assert!(mint(&config, &identity, None, None, false).is_err());

        let config = config_with_keys(&dir);
        mint(&config, &identity, None, Some("5m".into()), false).unwrap();
    }

    #[test]
    fn test_validity_sources() {
        let mut config = RolegateConfig::default();
        config.auth.token_ttl = Some("1h".into());

        assert_eq!(
            validity(&config, None, false).unwrap(),
            Some(Duration::from_secs(3600))
        );
        assert_eq!(
            validity(&config, Some("30m"), false).unwrap(),
            Some(Duration::from_secs(1800))
        );
        assert_eq!(validity(&config, None, true).unwrap(), None);
        assert!(validity(&config, Some("soon"), false).is_err());
    }

    #[test]
    fn test_default_audience_is_hr() {
        let config = RolegateConfig::default();
        assert_eq!(default_audience(&config), "rolegate:hr_management");
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(inspect("not-a-token").is_err());
    }
}
