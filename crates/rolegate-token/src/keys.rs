//! RSA keypair management.
//!
//! Keys are exchanged as PEM: PKCS#8 (`BEGIN PRIVATE KEY`) for the private
//! half and SPKI (`BEGIN PUBLIC KEY`) for the public half. PKCS#1 input is
//! accepted on load.

use crate::error::TokenError;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Smallest modulus accepted for signing or verification.
pub const MIN_KEY_BITS: usize = 2048;

/// Modulus size used by [`KeyPair::generate`].
pub const DEFAULT_KEY_BITS: usize = 2048;

/// The public, verification-only half of a keypair.
#[derive(Clone)]
pub struct PublicKey {
    inner: RsaPublicKey,
    pem: String,
    decoding_key: DecodingKey,
}

impl PublicKey {
    fn from_rsa(inner: RsaPublicKey) -> Result<Self, TokenError> {
        check_strength(inner.size() * 8)?;
        let pem = inner
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| TokenError::KeyMaterialCorrupt(format!("public key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| TokenError::KeyMaterialCorrupt(format!("public key: {}", e)))?;
        Ok(Self {
            inner,
            pem,
            decoding_key,
        })
    }

    /// Parse a PEM-encoded public key (SPKI or PKCS#1).
    pub fn from_pem(pem: &str) -> Result<Self, TokenError> {
        let inner = RsaPublicKey::from_public_key_pem(pem.trim())
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem.trim()))
            .map_err(|e| TokenError::KeyMaterialCorrupt(format!("public key: {}", e)))?;
        Self::from_rsa(inner)
    }

    /// Load a public key from a PEM file.
    pub fn load(path: &Path) -> Result<Self, TokenError> {
        Self::from_pem(&read_key_file(path)?)
    }

    /// SPKI PEM encoding, suitable for distribution.
    pub fn to_pem(&self) -> &str {
        &self.pem
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.inner.size() * 8
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("bits", &self.bits())
            .finish()
    }
}

/// An RSA keypair for signing (private half) and verifying (public half).
///
/// Immutable once built. The private half never leaves this type except
/// through [`KeyPair::persist`].
#[derive(Clone)]
pub struct KeyPair {
    private: RsaPrivateKey,
    encoding_key: EncodingKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generate a fresh 2048-bit keypair. Nothing is written to disk.
    pub fn generate() -> Result<Self, TokenError> {
        Self::generate_with_bits(DEFAULT_KEY_BITS)
    }

    /// Generate a fresh keypair with the given modulus size.
    pub fn generate_with_bits(bits: usize) -> Result<Self, TokenError> {
        check_strength(bits)?;
        let private = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| TokenError::KeyMaterialCorrupt(format!("key generation failed: {}", e)))?;
        tracing::debug!(bits, "Generated RSA keypair");
        Self::from_private(private)
    }

    fn from_private(private: RsaPrivateKey) -> Result<Self, TokenError> {
        private
            .validate()
            .map_err(|e| TokenError::KeyMaterialCorrupt(format!("private key: {}", e)))?;
        let pem = private
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| TokenError::KeyMaterialCorrupt(format!("private key: {}", e)))?;
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| TokenError::KeyMaterialCorrupt(format!("private key: {}", e)))?;
        let public = PublicKey::from_rsa(RsaPublicKey::from(&private))?;
        Ok(Self {
            private,
            encoding_key,
            public,
        })
    }

    /// Build a keypair from a PEM private key, deriving the public half.
    pub fn from_private_key_pem(pem: &str) -> Result<Self, TokenError> {
        Self::from_private(parse_private_pem(pem)?)
    }

    /// Build a keypair from both PEM halves, checking that they belong together.
    pub fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self, TokenError> {
        let pair = Self::from_private_key_pem(private_pem)?;
        let public = PublicKey::from_pem(public_pem)?;
        if public != pair.public {
            return Err(TokenError::KeyMaterialCorrupt(
                "public key does not match private key".to_string(),
            ));
        }
        Ok(pair)
    }

    /// Load a keypair from two PEM files.
    pub fn load(private_path: &Path, public_path: &Path) -> Result<Self, TokenError> {
        let private_pem = read_key_file(private_path)?;
        let public_pem = read_key_file(public_path)?;
        let pair = Self::from_pem(&private_pem, &public_pem)?;
        tracing::info!(
            private_key = %private_path.display(),
            public_key = %public_path.display(),
            bits = pair.public.bits(),
            "Loaded signing keypair"
        );
        Ok(pair)
    }

    /// Write both halves to disk.
    ///
    /// Each half is written to a temporary file in its target directory and
    /// renamed into place. If the second rename fails the first target is
    /// restored to its previous content (or removed), so a mismatched pair
    /// is never left behind.
    pub fn persist(&self, private_path: &Path, public_path: &Path) -> Result<(), TokenError> {
        let private_pem = self
            .private
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| TokenError::PersistenceError(format!("encode private key: {}", e)))?;

        let private_tmp = stage(private_path, private_pem.as_bytes(), 0o600)?;
        let public_tmp = stage(public_path, self.public.to_pem().as_bytes(), 0o644)?;

        let previous_private = fs::read(private_path).ok();

        private_tmp
            .persist(private_path)
            .map_err(|e| persistence_error(private_path, e.error))?;

        if let Err(e) = public_tmp.persist(public_path) {
            let restored = match &previous_private {
                Some(bytes) => fs::write(private_path, bytes),
                None => fs::remove_file(private_path),
            };
            if let Err(rollback) = restored {
                tracing::error!(
                    path = %private_path.display(),
                    error = %rollback,
                    "Failed to roll back private key after public key write failed"
                );
            }
            return Err(persistence_error(public_path, e.error));
        }

        tracing::info!(
            private_key = %private_path.display(),
            public_key = %public_path.display(),
            "Persisted signing keypair"
        );
        Ok(())
    }

    /// The distributable public half.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

fn check_strength(bits: usize) -> Result<(), TokenError> {
    if bits < MIN_KEY_BITS {
        return Err(TokenError::KeyMaterialCorrupt(format!(
            "{}-bit RSA key is below the {}-bit minimum",
            bits, MIN_KEY_BITS
        )));
    }
    Ok(())
}

fn parse_private_pem(pem: &str) -> Result<RsaPrivateKey, TokenError> {
    RsaPrivateKey::from_pkcs8_pem(pem.trim())
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem.trim()))
        .map_err(|e| TokenError::KeyMaterialCorrupt(format!("private key: {}", e)))
}

fn read_key_file(path: &Path) -> Result<String, TokenError> {
    if !path.exists() {
        return Err(TokenError::KeyMaterialNotFound {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TokenError::KeyMaterialNotFound {
            path: path.display().to_string(),
        },
        _ => TokenError::KeyMaterialCorrupt(format!("{}: {}", path.display(), e)),
    })
}

fn stage(target: &Path, contents: &[u8], mode: u32) -> Result<NamedTempFile, TokenError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| persistence_error(target, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| persistence_error(target, e))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| persistence_error(target, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(mode))
            .map_err(|e| persistence_error(target, e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(tmp)
}

fn persistence_error(path: &Path, err: std::io::Error) -> TokenError {
    TokenError::PersistenceError(format!("{}: {}", path.display(), err))
}
