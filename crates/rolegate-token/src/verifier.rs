//! Token verification.

use crate::claims::Claims;
use crate::error::TokenError;
use crate::keys::PublicKey;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation};

/// Verifies tokens for one issuer/audience pair.
///
/// Holds only immutable data; share it freely between tasks.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    public_key: PublicKey,
    issuer: String,
    audience: String,
    leeway_seconds: u64,
}

impl TokenVerifier {
    /// Create a verifier expecting `issuer` and `audience`.
    pub fn new(public_key: PublicKey, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            public_key,
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_seconds: 0,
        }
    }

    /// Tolerate this much clock skew on `iat`/`exp`.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Expected issuer.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Expected audience.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Verify `token` and return its claims. See [`verify`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        verify_at(
            token,
            &self.public_key,
            &self.issuer,
            &self.audience,
            self.leeway_seconds,
            Utc::now().timestamp(),
        )
    }
}

/// Verify `token` against `public_key` and the expected issuer/audience.
///
/// Checks run in a fixed order and the first failure is returned:
/// signature (`InvalidSignature`), payload structure (`MalformedToken`),
/// issuer (`IssuerMismatch`), audience (`AudienceMismatch`), validity window
/// (`TokenExpired`). On success the claims are returned unaltered.
pub fn verify(
    token: &str,
    public_key: &PublicKey,
    expected_issuer: &str,
    expected_audience: &str,
) -> Result<Claims, TokenError> {
    verify_at(
        token,
        public_key,
        expected_issuer,
        expected_audience,
        0,
        Utc::now().timestamp(),
    )
}

pub(crate) fn verify_at(
    token: &str,
    public_key: &PublicKey,
    expected_issuer: &str,
    expected_audience: &str,
    leeway_seconds: u64,
    now: i64,
) -> Result<Claims, TokenError> {
    // Signature and structure only; claim checks below keep their own order.
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token.trim(), public_key.decoding_key(), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => TokenError::MalformedToken(e.to_string()),
            _ => TokenError::InvalidSignature,
        })?;
    let claims = data.claims;

    if claims.sub.is_empty() {
        return Err(TokenError::MalformedToken("empty 'sub' claim".to_string()));
    }

    if claims.iss != expected_issuer {
        return Err(TokenError::IssuerMismatch {
            expected: expected_issuer.to_string(),
            actual: claims.iss,
        });
    }

    if !claims.aud.contains(expected_audience) {
        return Err(TokenError::AudienceMismatch {
            expected: expected_audience.to_string(),
            actual: claims.aud.to_string(),
        });
    }

    let leeway = i64::try_from(leeway_seconds).unwrap_or(i64::MAX);
    let not_yet_valid = now.saturating_add(leeway) < claims.iat;
    let expired = claims
        .exp
        .is_some_and(|exp| now.saturating_sub(leeway) > exp);
    if not_yet_valid || expired {
        return Err(TokenError::TokenExpired {
            issued_at: claims.iat,
            expires_at: claims.exp,
            now,
        });
    }

    tracing::debug!(
        subject = %claims.sub,
        audience = %expected_audience,
        role = %claims.role,
        "Token verified"
    );
    Ok(claims)
}

/// Header and payload of a token, decoded without any verification.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// `alg` from the header.
    pub algorithm: String,
    /// `typ` from the header.
    pub token_type: Option<String>,
    /// Raw claim payload.
    pub claims: serde_json::Value,
}

/// Decode a token for inspection. Nothing here is trustworthy.
pub fn inspect_unverified(token: &str) -> Result<TokenInfo, TokenError> {
    let token = token.trim();
    let header =
        jsonwebtoken::decode_header(token).map_err(|e| TokenError::MalformedToken(e.to_string()))?;

    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| TokenError::MalformedToken("missing payload segment".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenError::MalformedToken(format!("payload: {}", e)))?;
    let claims = serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::MalformedToken(format!("payload: {}", e)))?;

    Ok(TokenInfo {
        algorithm: format!("{:?}", header.alg),
        token_type: header.typ,
        claims,
    })
}
