//! Error types for key management and token handling.

use thiserror::Error;

/// Errors that can occur while managing keys or issuing/verifying tokens.
///
/// Key lifecycle errors (`KeyMaterial*`, `PersistenceError`) are fatal for a
/// process that needs the key. The verification errors are per-call and are
/// expected to be turned into a rejection at the call boundary.
#[derive(Debug, Error)]
pub enum TokenError {
    /// A key file does not exist.
    #[error("key material not found: {path}")]
    KeyMaterialNotFound { path: String },

    /// Key content could not be parsed, is too weak, or the halves disagree.
    #[error("key material corrupt: {0}")]
    KeyMaterialCorrupt(String),

    /// Writing the keypair failed; no partially-written pair is left behind.
    #[error("failed to persist keypair: {0}")]
    PersistenceError(String),

    /// Token could not be built or signed.
    #[error("failed to sign token: {0}")]
    SigningError(String),

    /// Signature does not verify against the public key.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token is not a well-formed JWS or is missing required claims.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// `iss` claim differs from the expected issuer.
    #[error("issuer mismatch: expected '{expected}', got '{actual}'")]
    IssuerMismatch { expected: String, actual: String },

    /// `aud` claim does not contain the expected audience.
    #[error("audience mismatch: expected '{expected}', got '{actual}'")]
    AudienceMismatch { expected: String, actual: String },

    /// Current time is outside `[iat, exp]`.
    #[error("token outside its validity window (iat={issued_at}, exp={expires_at:?}, now={now})")]
    TokenExpired {
        issued_at: i64,
        expires_at: Option<i64>,
        now: i64,
    },
}

impl TokenError {
    /// Stable machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::KeyMaterialNotFound { .. } => "KeyMaterialNotFound",
            TokenError::KeyMaterialCorrupt(_) => "KeyMaterialCorrupt",
            TokenError::PersistenceError(_) => "PersistenceError",
            TokenError::SigningError(_) => "SigningError",
            TokenError::InvalidSignature => "InvalidSignature",
            TokenError::MalformedToken(_) => "MalformedToken",
            TokenError::IssuerMismatch { .. } => "IssuerMismatch",
            TokenError::AudienceMismatch { .. } => "AudienceMismatch",
            TokenError::TokenExpired { .. } => "TokenExpired",
        }
    }

    /// Whether this failure belongs to a single call rather than the process.
    pub fn is_per_call(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidSignature
                | TokenError::MalformedToken(_)
                | TokenError::IssuerMismatch { .. }
                | TokenError::AudienceMismatch { .. }
                | TokenError::TokenExpired { .. }
        )
    }
}
