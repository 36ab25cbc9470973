//! Token issuance.

use crate::claims::{Audience, ClaimMap, Claims, RESERVED_CLAIMS, claim_to_string};
use crate::error::TokenError;
use crate::keys::KeyPair;
use chrono::Utc;
use jsonwebtoken::{Algorithm, Header};
use std::sync::Arc;
use std::time::Duration;

/// A freshly minted token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWS (`header.payload.signature`).
    pub token: String,
    /// The claims that were signed.
    pub claims: Claims,
    /// Additional claim keys that collided with reserved claims and were
    /// dropped in favour of the reserved value.
    pub overridden_claims: Vec<String>,
}

/// Mints RS256 tokens with the authority's private key.
///
/// Cheap to clone; the keypair is shared read-only.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keypair: Arc<KeyPair>,
}

impl TokenIssuer {
    /// Create an issuer that signs with `keypair`.
    pub fn new(keypair: KeyPair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }

    /// Create an issuer from an already shared keypair.
    pub fn from_shared(keypair: Arc<KeyPair>) -> Self {
        Self { keypair }
    }

    /// The keypair this issuer signs with.
    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    /// Mint a token. See [`issue`].
    pub fn issue(
        &self,
        subject: &str,
        issuer: &str,
        audience: &str,
        additional_claims: ClaimMap,
        validity: Option<Duration>,
    ) -> Result<IssuedToken, TokenError> {
        issue(
            &self.keypair,
            subject,
            issuer,
            audience,
            additional_claims,
            validity,
        )
    }
}

/// Mint a token signed with `keypair`.
///
/// `role`, `id` and `name` in `additional_claims` become typed claims; any
/// other key is carried as an extra claim. Keys naming a reserved claim
/// (`sub`, `iss`, `aud`, `iat`, `exp`, `nbf`, `jti`) are dropped: the values
/// derived from the arguments always win, and every dropped key is listed in
/// [`IssuedToken::overridden_claims`].
///
/// `validity` of `None` mints a token without `exp`.
pub fn issue(
    keypair: &KeyPair,
    subject: &str,
    issuer: &str,
    audience: &str,
    additional_claims: ClaimMap,
    validity: Option<Duration>,
) -> Result<IssuedToken, TokenError> {
    for (name, value) in [("subject", subject), ("issuer", issuer), ("audience", audience)] {
        if value.trim().is_empty() {
            return Err(TokenError::SigningError(format!("{} must not be empty", name)));
        }
    }

    let iat = Utc::now().timestamp();
    let exp = validity
        .map(|v| {
            i64::try_from(v.as_secs())
                .ok()
                .and_then(|secs| iat.checked_add(secs))
                .ok_or_else(|| TokenError::SigningError("validity window overflows".to_string()))
        })
        .transpose()?;

    let mut claims = Claims {
        sub: subject.to_string(),
        iss: issuer.to_string(),
        aud: Audience::One(audience.to_string()),
        iat,
        exp,
        jti: Some(uuid::Uuid::new_v4().to_string()),
        role: String::new(),
        id: None,
        name: None,
        extra: ClaimMap::new(),
    };

    let mut overridden_claims = Vec::new();
    for (key, value) in additional_claims {
        if RESERVED_CLAIMS.contains(&key.as_str()) {
            overridden_claims.push(key);
            continue;
        }
        match key.as_str() {
            "role" => claims.role = claim_to_string(&value),
            "id" => claims.id = Some(claim_to_string(&value)),
            "name" => claims.name = Some(claim_to_string(&value)),
            _ => {
                claims.extra.insert(key, value);
            }
        }
    }

    if !overridden_claims.is_empty() {
        tracing::warn!(
            subject = %subject,
            dropped = ?overridden_claims,
            "Additional claims collided with reserved claims; reserved values kept"
        );
    }

    let header = Header::new(Algorithm::RS256);
    let token = jsonwebtoken::encode(&header, &claims, keypair.encoding_key())
        .map_err(|e| TokenError::SigningError(e.to_string()))?;

    tracing::info!(
        subject = %claims.sub,
        audience = %audience,
        role = %claims.role,
        expires_at = ?claims.exp,
        "Issued token"
    );

    Ok(IssuedToken {
        token,
        claims,
        overridden_claims,
    })
}
