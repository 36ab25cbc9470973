//! Key management commands.
//!
//! `rolegate keys generate` - Generate an RSA signing keypair.

use anyhow::Context;
use rolegate_token::KeyPair;
use std::fs;
use std::path::Path;

pub const PRIVATE_KEY_FILE: &str = "private.pem";
pub const PUBLIC_KEY_FILE: &str = "public.pem";

/// Generate a keypair and write it into `output`.
pub fn generate(output: &Path, bits: usize, force: bool) -> anyhow::Result<()> {
    let private_path = output.join(PRIVATE_KEY_FILE);
    let public_path = output.join(PUBLIC_KEY_FILE);

    if !force && (private_path.exists() || public_path.exists()) {
        anyhow::bail!(
            "Keys already exist in {}. Pass --force to replace them",
            output.display()
        );
    }

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let keypair = KeyPair::generate_with_bits(bits).context("Failed to generate keypair")?;
    keypair
        .persist(&private_path, &public_path)
        .context("Failed to write keypair")?;

    println!("✔ Generated RSA-{} keypair:", bits);
    println!("  Private key: {}", private_path.display());
    println!("  Public key:  {}", public_path.display());
    println!();
    println!("⚠️  Keep your private key secure! Never commit it to version control.");
    println!();
    println!("Point rolegate at them with auth.private_key_file / auth.public_key_file, or:");
    println!("  export ROLEGATE_PRIVATE_KEY_FILE={}", private_path.display());
    println!("  export ROLEGATE_PUBLIC_KEY_FILE={}", public_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_token::{MIN_KEY_BITS, PublicKey};
    use tempfile::tempdir;

    #[test]
    fn test_generate_keys_to_files() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("mcp_auth");
        generate(&output, MIN_KEY_BITS, false).unwrap();

        let private = output.join(PRIVATE_KEY_FILE);
        let public = output.join(PUBLIC_KEY_FILE);
        let pair = KeyPair::load(&private, &public).unwrap();
        assert_eq!(pair.public_key().bits(), MIN_KEY_BITS);
        assert_eq!(PublicKey::load(&public).unwrap(), *pair.public_key());
    }

    #[test]
    fn test_generate_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        generate(dir.path(), MIN_KEY_BITS, false).unwrap();
        let before = fs::read_to_string(dir.path().join(PUBLIC_KEY_FILE)).unwrap();

        assert!(generate(dir.path(), MIN_KEY_BITS, false).is_err());
        assert_eq!(fs::read_to_string(dir.path().join(PUBLIC_KEY_FILE)).unwrap(), before);

        generate(dir.path(), MIN_KEY_BITS, true).unwrap();
        assert_ne!(fs::read_to_string(dir.path().join(PUBLIC_KEY_FILE)).unwrap(), before);
    }

    #[test]
    fn test_generate_rejects_weak_keys() {
        let dir = tempdir().unwrap();
        assert!(generate(dir.path(), 1024, false).is_err());
        assert!(!dir.path().join(PRIVATE_KEY_FILE).exists());
    }
}
