//! # rolegate-token
//!
//! RSA key management and RS256 bearer tokens for rolegate.
//!
//! - [`KeyPair`] / [`PublicKey`]: generate, load and atomically persist the
//!   signing authority's keys.
//! - [`TokenIssuer`]: mint signed tokens carrying a subject, issuer,
//!   audience, validity window and the caller's role claims.
//! - [`TokenVerifier`]: check signature, issuer, audience and validity, in
//!   that order, and hand back the claims.
//!
//! ## Example
//!
//! ```ignore
//! use rolegate_token::{ClaimMap, KeyPair, TokenIssuer, TokenVerifier};
//!
//! let keypair = KeyPair::generate()?;
//! let issuer = TokenIssuer::new(keypair.clone());
//! let issued = issuer.issue("alice", "https://dev-issuer.com", "rolegate:crm", ClaimMap::new(), None)?;
//!
//! let verifier = TokenVerifier::new(keypair.public_key().clone(), "https://dev-issuer.com", "rolegate:crm");
//! let claims = verifier.verify(&issued.token)?;
//! ```

pub mod claims;
pub mod error;
pub mod issuer;
pub mod keys;
pub mod verifier;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use claims::{Audience, ClaimMap, Claims, RESERVED_CLAIMS};
pub use error::TokenError;
pub use issuer::{IssuedToken, TokenIssuer, issue};
pub use keys::{DEFAULT_KEY_BITS, KeyPair, MIN_KEY_BITS, PublicKey};
pub use verifier::{TokenInfo, TokenVerifier, inspect_unverified, verify};
